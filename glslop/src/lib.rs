//! glslop is a synthesizer for multi-stage GLSL test programs.
//!
//! Given a test snippet with typed inputs and outputs, it builds the vertex, geometry and
//! fragment shaders needed to run the snippet in one stage, feed it inputs through uniforms or
//! shader inputs, and get its outputs back through transform feedback or a color buffer.
//! Signals are routed across the stages in between with pass-through code, and every
//! generated identifier is unique across the program.
//!
//! # Example
//!
//! ```
//! use glslop::{plan, Options, OutputAction, Stage, TestScript};
//!
//! let test: TestScript = "
//! [signature]
//! in float x
//! out float theta
//!
//! [snippet]
//! theta = x;
//! "
//! .parse()
//! .unwrap();
//!
//! let opts = Options::builder()
//!     .stage(Stage::Geometry)
//!     .output_action(OutputAction::Out)
//!     .build()
//!     .unwrap();
//!
//! let pipeline = plan(150, &opts, &test).unwrap();
//! assert!(pipeline.shader(Stage::Geometry).contains("theta = x;"));
//! ```

#[macro_use]
extern crate log;

pub use glsl_lang;

pub mod api;

mod error;
pub use error::*;

pub mod compile;
pub use compile::{CompileOutcome, CompileService, SyntaxCheck};

pub mod names;
pub use names::NameAllocator;

pub mod options;
pub use options::{InputDelivery, Options, OptionsBuilder, OutputAction, OutputDelivery};

pub mod pipeline;
pub use pipeline::{Direction, Pipeline};

pub mod plan;
pub use plan::{plan, Incompatibility};

pub mod script;
pub use script::{TestScript, TestVector, Value};

pub mod shader;
pub use shader::StageBuilder;

pub mod signal;
pub use signal::{Provenance, Signal, SignalSet, Synthetic};

pub mod stage;
pub use stage::Stage;

pub mod types;
pub use types::{BaseType, TypeDesc, TypeInfo};
