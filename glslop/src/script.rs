//! Parser for shader operation test scripts
//!
//! A script describes the requirements, signature, snippet and test vectors of a test:
//!
//! ```text
//! [require]
//! GLSL >= 1.10
//!
//! [signature]
//! in vec2 x
//! in vec2 y
//! out vec2 theta
//!
//! [snippet]
//! theta = atan(x, y);
//!
//! [test]
//! tolerance abs 0.0001
//! tolerance rel 0.001
//! x 0.0 0.0
//! y 1e-10 1e-10
//! theta 0.0 3.1415927
//!
//! y 0.1 -0.1
//! theta 0.0 3.1415927
//! ```
//!
//! Test vectors are separated by blank lines, and values that are not given are carried over
//! from the previous vector. The tolerance of a vector is `max(size * rel, abs)` where `size` is
//! the root-mean-square of the expected floating-point outputs.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::signal::{Provenance, Signal, SignalSet, Synthetic};
use crate::types::{BaseType, TypeInfo};
use crate::{Error, Result};

/// Default relative and absolute tolerance
pub const DEFAULT_TOLERANCE: f32 = 1e-5;

/// Value of a signal in a test vector
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Floating-point components
    Float(Vec<f32>),
    /// Signed integer components
    Int(Vec<i32>),
    /// Unsigned integer components
    Uint(Vec<u32>),
    /// Boolean components
    Bool(Vec<bool>),
}

impl Value {
    /// Zero value of the given type
    pub fn zero(ty: &TypeInfo) -> Self {
        match ty.base_type {
            BaseType::Float => Self::Float(vec![0.0; ty.components]),
            BaseType::Int => Self::Int(vec![0; ty.components]),
            BaseType::Uint => Self::Uint(vec![0; ty.components]),
            BaseType::Bool => Self::Bool(vec![false; ty.components]),
        }
    }

    /// Parse exactly `ty.components` whitespace-separated components
    pub fn parse(ty: &TypeInfo, text: &str) -> Option<Self> {
        let tokens: Vec<_> = text.split_whitespace().collect();
        if tokens.len() != ty.components {
            return None;
        }

        fn all<T: FromStr>(tokens: &[&str]) -> Option<Vec<T>> {
            tokens.iter().map(|t| t.parse().ok()).collect()
        }

        match ty.base_type {
            BaseType::Float => all(&tokens).map(Self::Float),
            BaseType::Int => all(&tokens).map(Self::Int),
            BaseType::Uint => all(&tokens).map(Self::Uint),
            BaseType::Bool => tokens
                .iter()
                .map(|t| match *t {
                    "true" | "1" => Some(true),
                    "false" | "0" => Some(false),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(Self::Bool),
        }
    }

    /// Floating-point components, if this is a floating-point value
    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            Self::Float(v) => Some(&v[..]),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", item)?;
            }
            Ok(())
        }

        match self {
            Self::Float(v) => join(f, v),
            Self::Int(v) => join(f, v),
            Self::Uint(v) => join(f, v),
            Self::Bool(v) => join(f, v),
        }
    }
}

/// Input values, expected output values and tolerance for one run of the snippet
#[derive(Debug, Clone, PartialEq)]
pub struct TestVector {
    /// Values of the signature inputs, by declaration index
    pub inputs: Vec<Value>,
    /// Expected values of the signature outputs, by declaration index
    pub outputs: Vec<Value>,
    /// Allowed distance between actual and expected floating-point outputs
    pub tolerance: f32,
}

impl TestVector {
    /// Value that must be fed to a generated signal with the given provenance
    ///
    /// Signature inputs get their input value, signature outputs (used for the `expected_*`
    /// signals of the comparison logic) get their expected value, and tolerance signals get
    /// the tolerance of this vector.
    pub fn value_for(&self, provenance: Provenance) -> Option<Value> {
        match provenance {
            Provenance::Input(i) => self.inputs.get(i).cloned(),
            Provenance::Output(i) => self.outputs.get(i).cloned(),
            Provenance::Synthetic(Synthetic::Tolerance) => Some(Value::Float(vec![self.tolerance])),
            _ => None,
        }
    }
}

/// Conditions required to run a test
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Requirements {
    /// Minimum GLSL version, e.g. 130 for `GLSL >= 1.30`
    pub glsl_version: Option<u32>,
    /// Minimum GL version, e.g. 320 for `GL >= 3.2`
    pub gl_version: Option<u32>,
    /// Required extensions
    pub extensions: Vec<String>,
}

/// A parsed test script
#[derive(Default, Debug, Clone, PartialEq)]
pub struct TestScript {
    /// Conditions required to run the test
    pub requirements: Requirements,
    /// Inputs of the snippet
    pub inputs: SignalSet,
    /// Outputs of the snippet
    pub outputs: SignalSet,
    /// GLSL statements computing the outputs from the inputs
    pub snippet: String,
    /// Values to test the snippet with
    pub test_vectors: Vec<TestVector>,
}

impl TestScript {
    /// Parse a test script from its source text
    pub fn parse(source: &str) -> Result<Self> {
        let mut parser = ScriptParser::default();

        for (i, line) in source.lines().enumerate() {
            parser.process_line(i + 1, line)?;
        }

        parser.finish()
    }

    /// Load and parse the test script at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("loading test script {}", path.display());
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Find a signature input or output by name
    pub fn find_signal(&self, name: &str) -> Option<&Signal> {
        self.inputs
            .find_name(name)
            .or_else(|| self.outputs.find_name(name))
    }
}

impl FromStr for TestScript {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Require,
    Signature,
    Snippet,
    Test,
}

impl Default for Section {
    fn default() -> Self {
        Self::None
    }
}

#[derive(Default)]
struct ScriptParser {
    script: TestScript,
    section: Section,
    snippet: Option<String>,
    seen_snippet: bool,
    current: Option<TestVector>,
    pending: bool,
    tolerance_abs: Option<f32>,
    tolerance_rel: Option<f32>,
}

/// Parse a `X.Y` version into `X * 100 + Y`, with `Y` on two digits
fn parse_version(text: &str) -> Option<u32> {
    let mut parts = text.splitn(2, '.');
    let major: u32 = parts.next()?.parse().ok()?;
    let minor = parts.next().unwrap_or("0");
    let minor_value: u32 = minor.parse().ok()?;

    let minor_value = match minor.len() {
        1 => minor_value * 10,
        2 => minor_value,
        _ => return None,
    };

    Some(major * 100 + minor_value)
}

/// Append a zero value for every signal of `signals` past the end of `values`
fn zero_fill(values: &mut Vec<Value>, signals: &SignalSet) {
    let known = values.len();
    values.extend(signals.iter().skip(known).map(|s| Value::zero(s.ty.info)));
}

fn rms(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = values.fold((0.0f32, 0usize), |(sum, count), v| (sum + v * v, count + 1));

    if count == 0 {
        0.0
    } else {
        (sum / count as f32).sqrt()
    }
}

impl ScriptParser {
    fn process_line(&mut self, line_number: usize, raw: &str) -> Result<()> {
        // Comments and trailing whitespace are only stripped outside of the snippet
        let line = if raw.starts_with('[') || self.section != Section::Snippet {
            let end = raw.find('#').unwrap_or_else(|| raw.len());
            raw[..end].trim_end()
        } else {
            raw
        };

        if line.starts_with('[') {
            let section = match line {
                "[require]" => Section::Require,
                "[signature]" => Section::Signature,
                "[snippet]" => Section::Snippet,
                "[test]" => Section::Test,
                other => {
                    return Err(Error::UnknownSection {
                        line: line_number,
                        section: other.to_owned(),
                    })
                }
            };

            return self.enter_section(line_number, section);
        }

        match self.section {
            Section::None => {
                if !line.trim().is_empty() {
                    return Err(Error::TextBeforeSection {
                        line: line_number,
                        text: line.to_owned(),
                    });
                }
            }
            Section::Require => {
                if !line.trim().is_empty() {
                    self.process_requirement(line_number, line)?;
                }
            }
            Section::Signature => {
                if !line.trim().is_empty() {
                    self.process_signature(line_number, line)?;
                }
            }
            Section::Snippet => {
                let snippet = self.snippet.get_or_insert_with(String::new);
                snippet.push_str(line);
                snippet.push('\n');
            }
            Section::Test => self.process_test(line_number, line)?,
        }

        Ok(())
    }

    fn enter_section(&mut self, line_number: usize, section: Section) -> Result<()> {
        self.leave_section();

        if section == Section::Snippet {
            if self.seen_snippet {
                return Err(Error::DuplicateSnippet { line: line_number });
            }

            self.seen_snippet = true;
        }

        if section == Section::Test {
            self.fit_vector();
        }

        trace!("entering section {:?} at line {}", section, line_number);
        self.section = section;
        Ok(())
    }

    /// Size the current test vector after the signature
    ///
    /// Values already set are kept, signals declared since the previous `[test]` section
    /// start at zero.
    fn fit_vector(&mut self) {
        let current = self.current.get_or_insert_with(|| TestVector {
            inputs: Vec::new(),
            outputs: Vec::new(),
            tolerance: 0.0,
        });

        zero_fill(&mut current.inputs, &self.script.inputs);
        zero_fill(&mut current.outputs, &self.script.outputs);
    }

    fn leave_section(&mut self) {
        match self.section {
            Section::Snippet => {
                self.script.snippet = self.snippet.take().unwrap_or_default();
            }
            Section::Test => self.flush_vector(),
            _ => {}
        }
    }

    fn finish(mut self) -> Result<TestScript> {
        self.leave_section();
        Ok(self.script)
    }

    fn process_requirement(&mut self, line_number: usize, line: &str) -> Result<()> {
        let tokens: Vec<_> = line.split_whitespace().collect();

        match tokens[..] {
            ["GLSL", ">=", version] => {
                self.script.requirements.glsl_version =
                    Some(parse_version(version).ok_or_else(|| Error::syntax(line_number, line))?);
            }
            ["GL", ">=", version] => {
                self.script.requirements.gl_version =
                    Some(parse_version(version).ok_or_else(|| Error::syntax(line_number, line))?);
            }
            [extension] => self.script.requirements.extensions.push(extension.to_owned()),
            _ => return Err(Error::syntax(line_number, line)),
        }

        Ok(())
    }

    fn process_signature(&mut self, line_number: usize, line: &str) -> Result<()> {
        let tokens: Vec<_> = line.split_whitespace().collect();

        let (is_input, type_name, name) = match tokens[..] {
            ["in", type_name, name] => (true, type_name, name),
            ["out", type_name, name] => (false, type_name, name),
            _ => return Err(Error::syntax(line_number, line)),
        };

        let ty = TypeInfo::lookup(type_name)?;

        if self.script.find_signal(name).is_some() {
            return Err(Error::DuplicateSignal {
                line: line_number,
                name: name.to_owned(),
            });
        }

        if is_input {
            let provenance = Provenance::Input(self.script.inputs.len());
            self.script.inputs.push(Signal::new(provenance, ty, name));
        } else {
            let provenance = Provenance::Output(self.script.outputs.len());
            self.script.outputs.push(Signal::new(provenance, ty, name));
        }

        Ok(())
    }

    fn process_test(&mut self, line_number: usize, line: &str) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            self.flush_vector();
            return Ok(());
        }

        self.pending = true;

        let (name, rest) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], line[pos..].trim_start()),
            None => (line, ""),
        };

        if name == "tolerance" {
            let tokens: Vec<_> = rest.split_whitespace().collect();
            let (kind, value) = match tokens[..] {
                [kind, value] => (kind, value.parse::<f32>().ok()),
                _ => return Err(Error::syntax(line_number, line)),
            };

            let value = value.ok_or_else(|| Error::syntax(line_number, line))?;
            match kind {
                "abs" => self.tolerance_abs = Some(value),
                "rel" => self.tolerance_rel = Some(value),
                _ => return Err(Error::syntax(line_number, line)),
            }

            return Ok(());
        }

        let signal = self
            .script
            .find_signal(name)
            .ok_or_else(|| Error::UndeclaredSignal {
                line: line_number,
                name: name.to_owned(),
            })?;

        let value =
            Value::parse(signal.ty.info, rest).ok_or_else(|| Error::syntax(line_number, line))?;

        let provenance = signal.provenance;
        if let Some(current) = self.current.as_mut() {
            match provenance {
                Provenance::Input(i) => current.inputs[i] = value,
                Provenance::Output(i) => current.outputs[i] = value,
                _ => unreachable!("signature signals are inputs or outputs"),
            }
        }

        Ok(())
    }

    fn flush_vector(&mut self) {
        if !self.pending {
            return;
        }

        self.pending = false;

        if let Some(current) = self.current.as_mut() {
            let size = rms(
                current
                    .outputs
                    .iter()
                    .filter_map(Value::as_floats)
                    .flat_map(|v| v.iter().copied()),
            );

            let rel = self.tolerance_rel.unwrap_or(DEFAULT_TOLERANCE);
            let abs = self.tolerance_abs.unwrap_or(DEFAULT_TOLERANCE);
            current.tolerance = (size * rel).max(abs);

            trace!("test vector #{}: {:?}", self.script.test_vectors.len(), current);
            self.script.test_vectors.push(current.clone());
        }
    }
}
