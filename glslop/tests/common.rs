#![allow(dead_code)]

use glslop::{Provenance, Signal, SignalSet, TestScript, TypeInfo};

// Code from pretty_assertions
// Shader sources are compared as plain strings so diffs show line by line

macro_rules! assert_source_eq {
    ($left:expr , $right:expr $(,)?) => ({
        match (&($left), &($right)) {
            (left_val, right_val) => {
                let left_val: &str = left_val.as_ref();
                let right_val: &str = right_val.as_ref();
                if left_val != right_val {
                    panic!("assertion failed: `(left == right)`\
                          \n\
                          \n{}\
                          \n",
                           pretty_assertions::Comparison::new(&SourceDiff(left_val), &SourceDiff(right_val)))
                }
            }
        }
    });
}

/// Debug-formats a shader source as its raw text, so pretty_assertions diffs it by line
pub struct SourceDiff<'s>(pub &'s str);

impl std::fmt::Debug for SourceDiff<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Compare a generated source with the expected text, showing a line diff on mismatch
pub fn verify_source(actual: impl AsRef<str>, expected: &str) {
    let actual = actual.as_ref();
    eprintln!(">>> generated: \n{}", actual);
    assert_source_eq!(actual, expected);
}

pub fn init() {
    env_logger::builder()
        .format_timestamp(None)
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init()
        .ok();
}

/// Build a signal set from `(type, name)` pairs, tagged as signature inputs
pub fn inputs(decls: &[(&str, &str)]) -> SignalSet {
    decls
        .iter()
        .enumerate()
        .map(|(i, (ty, name))| {
            Signal::new(
                Provenance::Input(i),
                TypeInfo::lookup(ty).expect("unknown type"),
                *name,
            )
        })
        .collect()
}

/// Build a signal set from `(type, name)` pairs, tagged as signature outputs
pub fn outputs(decls: &[(&str, &str)]) -> SignalSet {
    decls
        .iter()
        .enumerate()
        .map(|(i, (ty, name))| {
            Signal::new(
                Provenance::Output(i),
                TypeInfo::lookup(ty).expect("unknown type"),
                *name,
            )
        })
        .collect()
}

/// Test script used by most end-to-end tests
///
/// `[test]` follows the snippet directly, blank lines would be kept in the snippet.
pub const IDENTITY_SCRIPT: &str = "
[require]
GLSL >= 1.10

[signature]
in vec2 x
out vec2 theta

[snippet]
theta = x;
[test]
x 1.0 2.0
theta 1.0 2.0
";

pub fn identity_script() -> TestScript {
    TestScript::parse(IDENTITY_SCRIPT).expect("failed to parse test script")
}

pub fn names(set: &SignalSet) -> Vec<&str> {
    set.names().collect()
}
