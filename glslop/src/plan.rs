//! Turning a test script and a set of options into a shader program

use thiserror::Error;

use crate::options::{Options, OutputAction, OutputDelivery};
use crate::pipeline::Pipeline;
use crate::script::TestScript;
use crate::stage::Stage;

/// Reason why a combination of options cannot run a test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Incompatibility {
    #[error("hybrid output action needs a stage before the fragment stage")]
    HybridInFragment,
    #[error("transform feedback cannot capture fragment shader outputs")]
    XfbFromFragment,
    #[error("hybrid output action needs the fragment stage, which is absent with transform feedback")]
    XfbHybrid,
}

/// Check that `opts` can run a test at all
pub fn check(opts: &Options) -> Result<(), Incompatibility> {
    if opts.output_action == OutputAction::Hybrid && opts.stage == Stage::Fragment {
        return Err(Incompatibility::HybridInFragment);
    }

    if opts.output_delivery == OutputDelivery::Xfb {
        if opts.stage == Stage::Fragment {
            return Err(Incompatibility::XfbFromFragment);
        }

        if opts.output_action == OutputAction::Hybrid {
            return Err(Incompatibility::XfbHybrid);
        }
    }

    Ok(())
}

/// Build the shader program running `test` according to `opts`
///
/// # Parameters
///
/// * `version`: target GLSL version
/// * `opts`: stage, input delivery, output action and output delivery
/// * `test`: test script providing the signature and the snippet
///
/// # Errors
///
/// Returns an [Incompatibility] if the options cannot run a test. No program is built in that
/// case.
pub fn plan(version: u32, opts: &Options, test: &TestScript) -> Result<Pipeline, Incompatibility> {
    if let Err(reason) = check(opts) {
        info!("skipping {}: {}", opts, reason);
        return Err(reason);
    }

    let mut stages = vec![Stage::Vertex, opts.stage];
    if opts.output_delivery == OutputDelivery::Color {
        stages.push(Stage::Fragment);
    }

    let mut pipeline = Pipeline::new(version, stages, &test.inputs, &test.outputs);

    let mut snippet = String::from("/* TEST SNIPPET BEGIN */\n");
    snippet.push_str(&test.snippet);
    if !snippet.ends_with('\n') {
        snippet.push('\n');
    }
    snippet.push_str("/* TEST SNIPPET END */\n");

    pipeline.add_snippet(opts.stage, &snippet);
    pipeline.route_inputs_or_uniforms(opts.stage, &test.inputs, opts.input_delivery);

    match opts.output_action {
        OutputAction::Compare => {
            pipeline.add_locals(opts.stage, &test.outputs);
            pipeline.add_comparison_logic(opts.stage, &test.outputs, opts);
        }
        OutputAction::Out => {
            pipeline.route_outputs(opts.stage, &test.outputs);
        }
        OutputAction::Hybrid => {
            let arriving = pipeline.route_data(opts.stage, Stage::Fragment, &test.outputs);
            pipeline.add_comparison_logic(Stage::Fragment, &arriving, opts);
        }
    }

    pipeline.route_position();

    info!(
        "planned {} at version {}: {} inputs, {} uniforms, {} outputs",
        opts,
        version,
        pipeline.inputs().len(),
        pipeline.uniforms().len(),
        pipeline.outputs().len()
    );

    Ok(pipeline)
}
