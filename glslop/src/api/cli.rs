//! Command-line interface to glslop

use std::path::PathBuf;

pub use anyhow;
pub use structopt::StructOpt;

use crate::compile::{CompileService, SyntaxCheck};
use crate::options::{InputDelivery, Options, OutputAction, OutputDelivery};
use crate::pipeline::Pipeline;
use crate::script::TestScript;
use crate::stage::Stage;

/// Version used when neither the command line nor the script asks for one
pub const DEFAULT_GLSL_VERSION: u32 = 110;

/// Command-line arguments structure
#[derive(StructOpt)]
#[structopt(name = "glslopc", about = "GLSL shader operation test synthesizer", author)]
pub struct Opts {
    /// Verbose mode. Repeat to increase verbosity
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    /// Quiet mode
    #[structopt(short, long)]
    quiet: bool,

    /// Target GLSL version, e.g. 130 (defaults to the script requirement, or 110)
    #[structopt(long)]
    glsl_version: Option<u32>,

    /// Only run the snippet in this stage (vs, gs or fs)
    #[structopt(long)]
    stage: Option<Stage>,

    /// Only deliver inputs this way (uniform or in)
    #[structopt(long)]
    input: Option<InputDelivery>,

    /// Only use this output action (compare, out or hybrid)
    #[structopt(long)]
    action: Option<OutputAction>,

    /// Only deliver outputs this way (xfb or color)
    #[structopt(long)]
    delivery: Option<OutputDelivery>,

    /// Check that the generated shaders parse
    #[structopt(long)]
    check: bool,

    /// Print the generated shaders and their bindings
    #[structopt(long)]
    debug: bool,

    /// Test script
    script: PathBuf,
}

impl Opts {
    fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }

        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    fn accepts(&self, options: &Options) -> bool {
        self.stage.map(|s| s == options.stage).unwrap_or(true)
            && self
                .input
                .map(|i| i == options.input_delivery)
                .unwrap_or(true)
            && self
                .action
                .map(|a| a == options.output_action)
                .unwrap_or(true)
            && self
                .delivery
                .map(|d| d == options.output_delivery)
                .unwrap_or(true)
    }
}

fn print_pipeline(options: &Options, pipeline: &Pipeline, test: &TestScript) {
    println!("# {}", options);
    print!("{}", pipeline);

    for signal in pipeline.inputs() {
        println!("attribute {} {}", signal.ty, signal.name);
    }

    for signal in pipeline.uniforms() {
        println!("uniform {} {}", signal.ty, signal.name);
    }

    for signal in pipeline.outputs() {
        println!("output {} {}", signal.ty, signal.name);
    }

    for (i, vector) in test.test_vectors.iter().enumerate() {
        println!("[vector {}]", i);

        for signal in pipeline.inputs().iter().chain(pipeline.uniforms().iter()) {
            if let Some(value) = vector.value_for(signal.provenance) {
                println!("{} {}", signal.name, value);
            }
        }
    }

    println!();
}

/// Entry point for the glslopc front-end
///
/// # Parameters
///
/// * `opts`: command-line options
pub fn main(opts: Opts) -> anyhow::Result<()> {
    env_logger::builder()
        .format_timestamp(None)
        .filter_level(opts.log_level())
        .try_init()
        .ok();

    let test = TestScript::load(&opts.script)?;

    let version = opts
        .glsl_version
        .or(test.requirements.glsl_version)
        .unwrap_or(DEFAULT_GLSL_VERSION);

    if let Some(required) = test.requirements.glsl_version {
        if version < required {
            warn!(
                "GLSL version {} is below the {} required by {}",
                version,
                required,
                opts.script.display()
            );
        }
    }

    let mut planned = 0;
    let mut skipped = 0;
    let mut failed = Vec::new();

    for options in Options::all().filter(|o| opts.accepts(o)) {
        let pipeline = match crate::plan(version, &options, &test) {
            Ok(pipeline) => pipeline,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        planned += 1;

        if opts.debug {
            print_pipeline(&options, &pipeline, &test);
        }

        if opts.check {
            let outcome = SyntaxCheck.compile_and_link(&pipeline.sources());

            if !outcome.success {
                for diagnostic in &outcome.diagnostics {
                    error!("{}: {}", options, diagnostic);
                }

                failed.push(options);
            }
        }
    }

    info!(
        "{} configurations planned, {} skipped, {} failed",
        planned,
        skipped,
        failed.len()
    );

    if planned == 0 {
        anyhow::bail!("no configuration can run {}", opts.script.display());
    }

    if !failed.is_empty() {
        anyhow::bail!(
            "{} configurations failed to compile: {}",
            failed.len(),
            failed
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(())
}
