//! Per-stage shader source builder

use crate::signal::{Signal, SignalSet};
use crate::stage::Stage;

/// First GLSL version using `in`/`out` storage qualifiers
pub const MODERN_VERSION: u32 = 130;

/// First GLSL version with layout qualifiers for geometry shader primitives
pub const GEOMETRY_LAYOUT_VERSION: u32 = 150;

/// Number of vertices per input primitive of the geometry stage
pub const GEOMETRY_VERTICES: usize = 3;

const INDENT: &str = "   ";

/// Storage qualifier flavor of a GLSL version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `attribute`/`varying`, before GLSL 1.30
    Legacy,
    /// `in`/`out`, GLSL 1.30 and later
    Modern,
}

impl Dialect {
    /// Dialect used by the given `#version` number
    pub fn for_version(version: u32) -> Self {
        if version >= MODERN_VERSION {
            Self::Modern
        } else {
            Self::Legacy
        }
    }
}

/// Keywords used to declare the inputs and outputs of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Qualifiers {
    /// Storage qualifier for inputs
    pub input: &'static str,
    /// Storage qualifier for outputs, `None` if outputs go to built-in variables
    pub output: Option<&'static str>,
    /// Non floating-point inputs need the `flat` qualifier
    pub input_flat: bool,
    /// Non floating-point outputs need the `flat` qualifier
    pub output_flat: bool,
}

impl Qualifiers {
    /// Qualifiers for `stage` in the given dialect
    pub fn new(dialect: Dialect, stage: Stage) -> Self {
        match (dialect, stage) {
            (Dialect::Modern, stage) => Self {
                input: "in",
                output: Some("out"),
                // Integer varyings can't be interpolated
                input_flat: stage != Stage::Vertex,
                output_flat: stage != Stage::Fragment,
            },
            (Dialect::Legacy, Stage::Vertex) => Self {
                input: "attribute",
                output: Some("varying"),
                input_flat: false,
                output_flat: false,
            },
            (Dialect::Legacy, Stage::Geometry) => Self {
                input: "varying in",
                output: Some("varying out"),
                input_flat: false,
                output_flat: false,
            },
            (Dialect::Legacy, Stage::Fragment) => Self {
                input: "varying",
                output: None,
                input_flat: false,
                output_flat: false,
            },
        }
    }
}

/// Indent every non-empty line of `input` by `depth` levels
pub fn indent(input: &str, depth: usize) -> String {
    let prefix = INDENT.repeat(depth);
    let mut s = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        if line.trim().is_empty() {
            s.push_str(line.trim_start_matches(|c| c == ' ' || c == '\t'));
        } else {
            s.push_str(&prefix);
            s.push_str(line);
        }
    }

    if !s.is_empty() && !s.ends_with('\n') {
        s.push('\n');
    }

    s
}

/// Expression converting `signal` to the `vec4` expected by `gl_FragColor`
fn to_frag_color(signal: &Signal) -> String {
    let info = signal.ty.info;
    if info.is_floating() && info.components == 4 {
        return signal.name.to_string();
    }

    let mut s = format!("vec4({}", signal.name);
    for i in info.components..4 {
        s.push_str(if i == 3 { ", 1.0" } else { ", 0.0" });
    }
    s.push(')');
    s
}

/// Builder for the source of a single shader stage
#[derive(Debug, Clone)]
pub struct StageBuilder {
    stage: Stage,
    /// Global input declarations
    inputs: SignalSet,
    /// Global output declarations
    outputs: SignalSet,
    /// Uniform declarations
    uniforms: SignalSet,
    /// Variables declared at the top of main()
    locals: SignalSet,
    /// Statements of main()
    body: String,
    /// Loop counter wrapping the body of a geometry stage
    iterator: Option<Signal>,
}

impl StageBuilder {
    /// Create an empty builder for `stage`
    ///
    /// # Panics
    ///
    /// Panics if `stage` is the geometry stage, which needs an iterator.
    pub fn new(stage: Stage) -> Self {
        assert!(
            stage != Stage::Geometry,
            "geometry stages are created with StageBuilder::geometry"
        );

        Self {
            stage,
            inputs: SignalSet::new(),
            outputs: SignalSet::new(),
            uniforms: SignalSet::new(),
            locals: SignalSet::new(),
            body: String::new(),
            iterator: None,
        }
    }

    /// Create an empty geometry stage builder
    ///
    /// # Parameters
    ///
    /// * `iterator`: integer signal counting the vertices of the input primitive. It is
    /// declared as a local of the stage.
    pub fn geometry(iterator: Signal) -> Self {
        let mut locals = SignalSet::new();
        locals.push(iterator.clone());

        Self {
            stage: Stage::Geometry,
            inputs: SignalSet::new(),
            outputs: SignalSet::new(),
            uniforms: SignalSet::new(),
            locals,
            body: String::new(),
            iterator: Some(iterator),
        }
    }

    /// Stage this builder generates code for
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Declared inputs
    pub fn inputs(&self) -> &SignalSet {
        &self.inputs
    }

    /// Declared outputs
    pub fn outputs(&self) -> &SignalSet {
        &self.outputs
    }

    /// Declared uniforms
    pub fn uniforms(&self) -> &SignalSet {
        &self.uniforms
    }

    /// Declared locals
    pub fn locals(&self) -> &SignalSet {
        &self.locals
    }

    /// Statements of main(), without the geometry loop
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Geometry loop counter, if this is a geometry stage
    pub fn iterator(&self) -> Option<&Signal> {
        self.iterator.as_ref()
    }

    /// Declare `signals` as inputs of this stage
    ///
    /// Inputs of the geometry stage are declared as per-vertex arrays.
    ///
    /// # Panics
    ///
    /// Panics if a geometry input is already an array.
    pub fn add_inputs(&mut self, signals: &SignalSet) {
        if self.iterator.is_some() {
            self.inputs
                .extend(signals.iter().map(|s| s.make_array(GEOMETRY_VERTICES)));
        } else {
            self.inputs.append(signals);
        }
    }

    /// Declare `signals` as outputs of this stage
    pub fn add_outputs(&mut self, signals: &SignalSet) {
        self.outputs.append(signals);
    }

    /// Declare `signals` as uniforms of this stage
    pub fn add_uniforms(&mut self, signals: &SignalSet) {
        self.uniforms.append(signals);
    }

    /// Declare `signals` as locals of this stage
    pub fn add_locals(&mut self, signals: &SignalSet) {
        self.locals.append(signals);
    }

    /// Append statements to the body
    pub fn append_body(&mut self, snippet: &str) {
        self.body.push_str(snippet);
    }

    /// Insert statements before everything already in the body
    pub fn prepend_body(&mut self, snippet: &str) {
        self.body.insert_str(0, snippet);
    }

    /// Declare `inputs` and `outputs`, and append one `output = input;` statement per pair
    ///
    /// In the geometry stage, inputs are indexed by the loop counter.
    pub fn pass_through(&mut self, inputs: &SignalSet, outputs: &SignalSet) {
        assert_eq!(inputs.len(), outputs.len(), "mismatched pass-through");

        self.add_inputs(inputs);
        self.add_outputs(outputs);

        let mut s = String::new();
        for (input, output) in inputs.iter().zip(outputs.iter()) {
            match &self.iterator {
                Some(iterator) => {
                    s.push_str(&format!("{} = {}[{}];\n", output.name, input.name, iterator.name))
                }
                None => s.push_str(&format!("{} = {};\n", output.name, input.name)),
            }
        }

        self.body.push_str(&s);
    }

    /// Render the complete source for this stage
    ///
    /// # Parameters
    ///
    /// * `version`: GLSL version for the `#version` directive, also selects the qualifiers
    pub fn render(&self, version: u32) -> String {
        let dialect = Dialect::for_version(version);
        let qualifiers = Qualifiers::new(dialect, self.stage);

        let mut s = format!("#version {}\n", version);

        if self.stage == Stage::Geometry && version >= GEOMETRY_LAYOUT_VERSION {
            s.push_str("layout(triangles) in;\n");
            s.push_str(&format!(
                "layout(triangle_strip, max_vertices = {}) out;\n",
                GEOMETRY_VERTICES
            ));
        }

        // Global declarations
        s.push_str(
            &self
                .inputs
                .declarations(Some(qualifiers.input), qualifiers.input_flat),
        );

        // Outputs without a qualifier are written to gl_FragColor
        let color_outputs = match qualifiers.output {
            Some(output) => {
                s.push_str(&self.outputs.declarations(Some(output), qualifiers.output_flat));
                None
            }
            None => Some(&self.outputs),
        };

        s.push_str(&self.uniforms.declarations(Some("uniform"), false));

        // Entry point
        s.push_str("void main()\n{\n");
        s.push_str(&indent(&self.locals.declarations(None, false), 1));

        if let Some(outputs) = color_outputs {
            s.push_str(&indent(&outputs.declarations(None, false), 1));
        }

        match &self.iterator {
            Some(iterator) => {
                let i = &iterator.name;
                s.push_str(&format!(
                    "{}for ({} = 0; {} < {}; ++{}) {{\n",
                    INDENT, i, i, GEOMETRY_VERTICES, i
                ));
                s.push_str(&indent(&self.body, 2));
                s.push_str(&format!("{}{}EmitVertex();\n", INDENT, INDENT));
                s.push_str(&format!("{}}}\n", INDENT));
            }
            None => s.push_str(&indent(&self.body, 1)),
        }

        if let Some(outputs) = color_outputs {
            let mut it = outputs.iter();
            if let Some(color) = it.next() {
                s.push_str(&format!("{}gl_FragColor = {};\n", INDENT, to_frag_color(color)));
            }

            for dropped in it {
                warn!(
                    "{} cannot be written by a GLSL {} fragment shader",
                    dropped.name, version
                );
            }
        }

        s.push_str("}\n");
        s
    }
}
