//! End-to-end program planning tests

mod common;

use glslop::{
    plan, Incompatibility, InputDelivery, Options, OutputAction, OutputDelivery, Provenance,
    Stage, Synthetic,
};

fn options(
    stage: Stage,
    input_delivery: InputDelivery,
    output_action: OutputAction,
    output_delivery: OutputDelivery,
) -> Options {
    Options::builder()
        .stage(stage)
        .input_delivery(input_delivery)
        .output_action(output_action)
        .output_delivery(output_delivery)
        .build()
        .expect("failed to build options")
}

#[test]
fn vertex_out_color() {
    common::init();

    let test = common::identity_script();
    let opts = options(
        Stage::Vertex,
        InputDelivery::In,
        OutputAction::Out,
        OutputDelivery::Color,
    );

    let pipeline = plan(130, &opts, &test).expect("failed to plan");

    // Color delivery needs rasterization
    assert_eq!(
        pipeline.stages().collect::<Vec<_>>(),
        vec![Stage::Vertex, Stage::Fragment]
    );

    common::verify_source(
        pipeline.shader(Stage::Vertex),
        r#"#version 130
in vec2 x;
in vec4 pos;
out vec2 theta;
void main()
{
   /* TEST SNIPPET BEGIN */
   theta = x;
   /* TEST SNIPPET END */
   gl_Position = pos;
}
"#,
    );

    common::verify_source(
        pipeline.shader(Stage::Fragment),
        r#"#version 130
in vec2 theta;
out vec2 theta0;
void main()
{
   theta0 = theta;
}
"#,
    );

    assert_eq!(common::names(pipeline.inputs()), vec!["x", "pos"]);
    assert_eq!(common::names(pipeline.outputs()), vec!["theta0"]);
    assert!(pipeline.uniforms().is_empty());
}

#[test]
fn vertex_out_color_legacy() {
    common::init();

    let test = common::identity_script();
    let opts = options(
        Stage::Vertex,
        InputDelivery::In,
        OutputAction::Out,
        OutputDelivery::Color,
    );

    let pipeline = plan(110, &opts, &test).expect("failed to plan");

    common::verify_source(
        pipeline.shader(Stage::Vertex),
        r#"#version 110
attribute vec2 x;
attribute vec4 pos;
varying vec2 theta;
void main()
{
   /* TEST SNIPPET BEGIN */
   theta = x;
   /* TEST SNIPPET END */
   gl_Position = pos;
}
"#,
    );

    common::verify_source(
        pipeline.shader(Stage::Fragment),
        r#"#version 110
varying vec2 theta;
void main()
{
   vec2 theta0;
   theta0 = theta;
   gl_FragColor = vec4(theta0, 0.0, 1.0);
}
"#,
    );
}

#[test]
fn vertex_compare_uniform() {
    common::init();

    let test = common::identity_script();
    let opts = options(
        Stage::Vertex,
        InputDelivery::Uniform,
        OutputAction::Compare,
        OutputDelivery::Color,
    );

    let pipeline = plan(130, &opts, &test).expect("failed to plan");

    common::verify_source(
        pipeline.shader(Stage::Vertex),
        r#"#version 130
in vec4 pos;
out vec4 color;
uniform vec2 x;
uniform float tolerance;
uniform vec2 expected_theta;
void main()
{
   vec2 theta;
   /* TEST SNIPPET BEGIN */
   theta = x;
   /* TEST SNIPPET END */
   color = vec4(0.0, 1.0, 0.0, 1.0);
   if (tolerance == 0.0) {
      if (theta != expected_theta)
         color = vec4(1.0, 0.0, 0.0, 1.0);
   } else {
      if (distance(theta, expected_theta) > tolerance)
         color = vec4(1.0, 0.0, 0.0, 1.0);
   }
   gl_Position = pos;
}
"#,
    );

    let uniforms = pipeline.uniforms();
    assert_eq!(common::names(uniforms), vec!["x", "tolerance", "expected_theta"]);
    assert_eq!(uniforms[0].provenance, Provenance::Input(0));
    assert_eq!(
        uniforms[1].provenance,
        Provenance::Synthetic(Synthetic::Tolerance)
    );
    assert_eq!(uniforms[2].provenance, Provenance::Output(0));

    // Uniform values come from the test vectors
    let vector = &test.test_vectors[0];
    assert_eq!(
        vector.value_for(uniforms[2].provenance),
        Some(glslop::Value::Float(vec![1.0, 2.0]))
    );
}

#[test]
fn geometry_out_color() {
    common::init();

    let test = common::identity_script();
    let opts = options(
        Stage::Geometry,
        InputDelivery::In,
        OutputAction::Out,
        OutputDelivery::Color,
    );

    let pipeline = plan(150, &opts, &test).expect("failed to plan");

    common::verify_source(
        pipeline.shader(Stage::Vertex),
        r#"#version 150
in vec2 x1;
in vec4 pos1;
out vec2 x0;
out vec4 pos0;
void main()
{
   x0 = x1;
   pos0 = pos1;
}
"#,
    );

    common::verify_source(
        pipeline.shader(Stage::Geometry),
        r#"#version 150
layout(triangles) in;
layout(triangle_strip, max_vertices = 3) out;
in vec2[3] x0;
in vec4[3] pos0;
out vec2 theta;
void main()
{
   int i;
   vec2 x;
   vec4 pos;
   for (i = 0; i < 3; ++i) {
      pos = pos0[i];
      x = x0[i];
      /* TEST SNIPPET BEGIN */
      theta = x;
      /* TEST SNIPPET END */
      gl_Position = pos;
      EmitVertex();
   }
}
"#,
    );

    assert_eq!(common::names(pipeline.inputs()), vec!["x1", "pos1"]);
    assert_eq!(pipeline.iterator().map(|i| i.name.as_str()), Some("i"));
}

#[test]
fn hybrid_compares_in_fragment_stage() {
    common::init();

    let test = common::identity_script();
    let opts = options(
        Stage::Vertex,
        InputDelivery::Uniform,
        OutputAction::Hybrid,
        OutputDelivery::Color,
    );

    let pipeline = plan(130, &opts, &test).expect("failed to plan");

    let vertex = pipeline.stage(Stage::Vertex);
    assert_eq!(common::names(vertex.outputs()), vec!["theta"]);
    assert!(vertex.uniforms().find_name("x").is_some());

    let fragment = pipeline.stage(Stage::Fragment);
    assert_eq!(common::names(fragment.inputs()), vec!["theta"]);
    assert_eq!(common::names(fragment.outputs()), vec!["color"]);
    assert_eq!(
        common::names(fragment.uniforms()),
        vec!["tolerance", "expected_theta"]
    );
    assert!(fragment
        .body()
        .contains("if (distance(theta, expected_theta) > tolerance)"));

    assert_eq!(common::names(pipeline.outputs()), vec!["color"]);
}

#[test]
fn xfb_has_no_fragment_stage() {
    common::init();

    let test = common::identity_script();
    let opts = options(
        Stage::Geometry,
        InputDelivery::Uniform,
        OutputAction::Out,
        OutputDelivery::Xfb,
    );

    let pipeline = plan(150, &opts, &test).expect("failed to plan");

    assert!(!pipeline.is_present(Stage::Fragment));
    assert_eq!(common::names(pipeline.outputs()), vec!["theta"]);
    assert_eq!(common::names(pipeline.uniforms()), vec!["x"]);
}

#[test]
fn integer_comparisons_are_exact() {
    common::init();

    let test: glslop::TestScript = "
[signature]
in int a
out int b

[snippet]
b = a + 1;
"
    .parse()
    .expect("failed to parse test script");

    let opts = options(
        Stage::Fragment,
        InputDelivery::In,
        OutputAction::Compare,
        OutputDelivery::Color,
    );

    let pipeline = plan(130, &opts, &test).expect("failed to plan");
    let source = pipeline.shader(Stage::Fragment);

    assert!(source.contains("flat in int a;\n"));
    assert!(source.contains("   if (b != expected_b)\n      color = vec4(1.0, 0.0, 0.0, 1.0);\n"));
    assert!(!source.contains("distance"));

    // Fragment inputs are fed through the vertex stage
    let vertex = pipeline.shader(Stage::Vertex);
    assert!(vertex.contains("flat out int a;\n"));
    assert!(vertex.contains("   a = a0;\n"));
}

#[test]
fn reserved_names_are_not_reused() {
    common::init();

    let test: glslop::TestScript = "
[signature]
in float color
out float tolerance

[snippet]
tolerance = color;
"
    .parse()
    .expect("failed to parse test script");

    let opts = options(
        Stage::Vertex,
        InputDelivery::Uniform,
        OutputAction::Compare,
        OutputDelivery::Color,
    );

    let pipeline = plan(130, &opts, &test).expect("failed to plan");
    let source = pipeline.shader(Stage::Vertex);

    assert!(source.contains("uniform float tolerance0;\n"));
    assert!(source.contains("out vec4 color0;\n"));
    assert!(source.contains("if (tolerance0 == 0.0) {\n"));
}

#[test]
fn incompatible_options() {
    common::init();

    let test = common::identity_script();
    let check = |stage, action, delivery| {
        plan(
            130,
            &options(stage, InputDelivery::Uniform, action, delivery),
            &test,
        )
        .map(|_| ())
    };

    assert_eq!(
        check(Stage::Fragment, OutputAction::Hybrid, OutputDelivery::Color),
        Err(Incompatibility::HybridInFragment)
    );
    assert_eq!(
        check(Stage::Fragment, OutputAction::Out, OutputDelivery::Xfb),
        Err(Incompatibility::XfbFromFragment)
    );
    assert_eq!(
        check(Stage::Vertex, OutputAction::Hybrid, OutputDelivery::Xfb),
        Err(Incompatibility::XfbHybrid)
    );
    assert_eq!(
        check(Stage::Geometry, OutputAction::Compare, OutputDelivery::Xfb),
        Ok(())
    );
}

#[test]
fn every_compatible_configuration_parses() {
    common::init();

    let test = common::identity_script();
    let check = glslop::SyntaxCheck;

    let mut planned = 0;
    for version in &[110, 130, 150] {
        for opts in Options::all() {
            if let Ok(pipeline) = plan(*version, &opts, &test) {
                let outcome = glslop::CompileService::compile_and_link(&check, &pipeline.sources());
                assert!(
                    outcome.success,
                    "{} at {}: {:?}",
                    opts,
                    version,
                    outcome.diagnostics
                );
                planned += 1;
            }
        }
    }

    // 36 combinations, 12 of which are incompatible
    assert_eq!(Options::all().count(), 36);
    assert_eq!(planned, 3 * 24);
}
