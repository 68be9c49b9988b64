//! glslopc is the command-line front-end for glslop. It reads a shader operation test script,
//! builds the shader programs for every applicable configuration, and optionally prints or
//! syntax-checks them. To generate programs from Rust code, see the documentation for the
//! `glslop` crate.
//!
//! # Installation
//!
//! Compile glslop from source and install it using `cargo install --force --path glslop_cli`.
//!
//! # Command-line usage
//!
//! ```bash
//! glslopc 0.1.0
//! Vincent Tavernier <vince.tavernier@gmail.com>
//! GLSL shader operation test synthesizer
//!
//! USAGE:
//!     glslopc [FLAGS] [OPTIONS] <script>
//!
//! FLAGS:
//!         --check      Check that the generated shaders parse
//!         --debug      Print the generated shaders and their bindings
//!     -h, --help       Prints help information
//!     -q, --quiet      Quiet mode
//!     -V, --version    Prints version information
//!     -v, --verbose    Verbose mode. Repeat to increase verbosity
//!
//! OPTIONS:
//!         --action <action>                Only use this output action (compare, out or hybrid)
//!         --delivery <delivery>            Only deliver outputs this way (xfb or color)
//!         --glsl-version <glsl-version>    Target GLSL version, e.g. 130
//!         --input <input>                  Only deliver inputs this way (uniform or in)
//!         --stage <stage>                  Only run the snippet in this stage (vs, gs or fs)
//!
//! ARGS:
//!     <script>    Test script
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Print the programs running `atan.shader_test` in the geometry stage with GLSL 1.50
//! glslopc --debug --stage gs --glsl-version 150 atan.shader_test
//!
//! # Check that every configuration of `atan.shader_test` produces parseable shaders
//! glslopc -v --check atan.shader_test
//! ```

use glslop::api::cli::*;

fn main() -> anyhow::Result<()> {
    glslop::api::cli::main(Opts::from_args())
}
