//! Stage source rendering tests

mod common;

use glslop::shader::indent;
use glslop::{Provenance, Signal, SignalSet, StageBuilder, Stage, TypeInfo};

fn vertex_builder() -> StageBuilder {
    common::init();

    let mut builder = StageBuilder::new(Stage::Vertex);
    builder.add_inputs(&common::inputs(&[("vec2", "x"), ("int", "n")]));
    builder.add_outputs(&common::outputs(&[("vec2", "theta"), ("int", "count")]));
    builder.add_uniforms(&common::inputs(&[("float", "scale")]));
    builder.append_body("theta = x * scale;\ncount = n;\n");
    builder
}

#[test]
fn vertex_modern() {
    common::verify_source(
        vertex_builder().render(150),
        r#"#version 150
in vec2 x;
in int n;
out vec2 theta;
flat out int count;
uniform float scale;
void main()
{
   theta = x * scale;
   count = n;
}
"#,
    );
}

#[test]
fn vertex_legacy() {
    common::verify_source(
        vertex_builder().render(110),
        r#"#version 110
attribute vec2 x;
attribute int n;
varying vec2 theta;
varying int count;
uniform float scale;
void main()
{
   theta = x * scale;
   count = n;
}
"#,
    );
}

#[test]
fn versions_only_differ_in_qualifiers() {
    let builder = vertex_builder();
    let modern = builder.render(150);
    let legacy = builder.render(110);

    let strip = |source: &str| {
        source
            .lines()
            .skip(1)
            .map(|line| {
                line.trim_start_matches("flat ")
                    .replace("attribute ", "in ")
                    .replace("varying ", "out ")
            })
            .collect::<Vec<_>>()
    };

    assert_ne!(modern, legacy);
    assert_eq!(strip(&modern), strip(&legacy));
}

#[test]
fn fragment_modern_flat_inputs() {
    common::init();

    let mut builder = StageBuilder::new(Stage::Fragment);
    builder.pass_through(
        &common::inputs(&[("ivec2", "a"), ("vec4", "b")]),
        &common::outputs(&[("ivec2", "a0"), ("vec4", "b0")]),
    );

    common::verify_source(
        builder.render(130),
        r#"#version 130
flat in ivec2 a;
in vec4 b;
out ivec2 a0;
out vec4 b0;
void main()
{
   a0 = a;
   b0 = b;
}
"#,
    );
}

#[test]
fn fragment_legacy_writes_frag_color() {
    common::init();

    let mut builder = StageBuilder::new(Stage::Fragment);
    builder.pass_through(
        &common::inputs(&[("vec2", "theta"), ("float", "extra")]),
        &common::outputs(&[("vec2", "theta0"), ("float", "extra0")]),
    );

    common::verify_source(
        builder.render(120),
        r#"#version 120
varying vec2 theta;
varying float extra;
void main()
{
   vec2 theta0;
   float extra0;
   theta0 = theta;
   extra0 = extra;
   gl_FragColor = vec4(theta0, 0.0, 1.0);
}
"#,
    );
}

#[test]
fn fragment_legacy_vec4_color_is_not_widened() {
    common::init();

    let mut builder = StageBuilder::new(Stage::Fragment);
    builder.pass_through(
        &common::inputs(&[("vec4", "color")]),
        &common::outputs(&[("vec4", "color0")]),
    );

    assert!(builder
        .render(110)
        .contains("   gl_FragColor = color0;\n"));
}

#[test]
fn geometry_loop() {
    common::init();

    let iterator = Signal::new(
        Provenance::Synthetic(glslop::Synthetic::GeomIterator),
        TypeInfo::int(),
        "i",
    );

    let mut builder = StageBuilder::geometry(iterator);
    builder.pass_through(
        &common::inputs(&[("vec4", "pos"), ("uint", "id")]),
        &common::outputs(&[("vec4", "pos0"), ("uint", "id0")]),
    );
    builder.append_body("gl_Position = pos0;\n");

    common::verify_source(
        builder.render(150),
        r#"#version 150
layout(triangles) in;
layout(triangle_strip, max_vertices = 3) out;
in vec4[3] pos;
flat in uint[3] id;
out vec4 pos0;
flat out uint id0;
void main()
{
   int i;
   for (i = 0; i < 3; ++i) {
      pos0 = pos[i];
      id0 = id[i];
      gl_Position = pos0;
      EmitVertex();
   }
}
"#,
    );

    let legacy = builder.render(120);
    assert!(!legacy.contains("layout"));
    assert!(legacy.contains("varying in vec4[3] pos;\n"));
    assert!(legacy.contains("varying out vec4 pos0;\n"));
}

#[test]
fn rendering_is_repeatable() {
    let builder = vertex_builder();
    assert_eq!(builder.render(130), builder.render(130));
}

#[test]
fn empty_stage() {
    common::init();

    common::verify_source(
        StageBuilder::new(Stage::Vertex).render(110),
        "#version 110\nvoid main()\n{\n}\n",
    );
}

#[test]
fn prepended_statements_run_first() {
    common::init();

    let mut builder = StageBuilder::new(Stage::Vertex);
    builder.append_body("b = 2;\n");
    builder.prepend_body("a = 1;\n");

    assert_eq!(builder.body(), "a = 1;\nb = 2;\n");
}

#[test]
fn indent_skips_blank_lines() {
    assert_eq!(indent("a;\n\nif (b)\n   c;", 1), "   a;\n\n   if (b)\n      c;\n");
    assert_eq!(indent("", 2), "");
}

#[test]
#[should_panic(expected = "mismatched pass-through")]
fn pass_through_needs_matching_sets() {
    let mut builder = StageBuilder::new(Stage::Vertex);
    builder.pass_through(&common::inputs(&[("float", "a")]), &SignalSet::new());
}
