//! Compilation of generated shader programs

use std::borrow::Cow;
use std::collections::BTreeMap;

use glsl_lang::{ast, parse::DefaultParse};

use crate::stage::Stage;

/// Result of compiling and linking a program
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CompileOutcome {
    /// `true` if every stage compiled and the program linked
    pub success: bool,
    /// Messages reported by the compiler, one per failing stage
    pub diagnostics: Vec<String>,
}

impl CompileOutcome {
    /// Successful outcome without diagnostics
    pub fn ok() -> Self {
        Self {
            success: true,
            diagnostics: Vec::new(),
        }
    }
}

/// A shader compiler able to build a program from per-stage sources
pub trait CompileService {
    /// Compile every stage in `sources` and link them into a program
    fn compile_and_link(&self, sources: &BTreeMap<Stage, String>) -> CompileOutcome;
}

/// Compile service that only checks that every stage parses as GLSL
///
/// Semantics (declarations, types, interface matching) are not checked.
#[derive(Default, Debug, Clone, Copy)]
pub struct SyntaxCheck;

/// Storage qualifiers that may end a qualifier-only declaration
const INTERFACE_QUALIFIERS: [&str; 3] = ["in", "out", "uniform"];

/// Rewrite qualifier-only declarations such as `layout(triangles) in;` into variable
/// declarations carrying the same qualifiers, which the parser accepts
///
/// Lines are rewritten in place so parse errors keep their line numbers.
fn complete_qualifier_declarations(source: &str) -> Cow<'_, str> {
    let is_qualifier_only = |line: &str| {
        let line = line.trim();
        line.starts_with("layout")
            && line
                .rfind(')')
                .map(|end| line[end + 1..].trim_end_matches(';').trim())
                .map_or(false, |rest| {
                    line.ends_with(';') && INTERFACE_QUALIFIERS.contains(&rest)
                })
    };

    if !source.lines().any(is_qualifier_only) {
        return Cow::Borrowed(source);
    }

    let mut s = String::with_capacity(source.len());
    for (i, line) in source.split_inclusive('\n').enumerate() {
        let content = line.trim_end_matches(|c| c == '\n' || c == '\r');

        if is_qualifier_only(content) {
            trace!("checking qualifier-only declaration {:?}", content);
            let declaration = content.trim_end().trim_end_matches(';');
            s.push_str(&format!("{} int glslop_qualifiers_{};", declaration, i));
            s.push_str(&line[content.len()..]);
        } else {
            s.push_str(line);
        }
    }

    Cow::Owned(s)
}

impl SyntaxCheck {
    /// Check a single shader source
    ///
    /// Interface qualifier declarations (`layout(triangles) in;`) are checked through an
    /// equivalent variable declaration.
    pub fn check(&self, source: &str) -> Result<(), String> {
        ast::TranslationUnit::parse(&complete_qualifier_declarations(source))
            .map(|_| ())
            .map_err(|err| err.to_string())
    }
}

impl CompileService for SyntaxCheck {
    fn compile_and_link(&self, sources: &BTreeMap<Stage, String>) -> CompileOutcome {
        let mut outcome = CompileOutcome::ok();

        for (stage, source) in sources {
            match self.check(source) {
                Ok(()) => trace!("{} shader parsed successfully", stage),
                Err(message) => {
                    debug!("{} shader failed to parse: {}", stage, message);
                    outcome.success = false;
                    outcome
                        .diagnostics
                        .push(format!("{} shader: {}", stage, message));
                }
            }
        }

        outcome
    }
}
