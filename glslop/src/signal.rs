//! Signal descriptors and ordered signal sets

use std::ops::Deref;

use glsl_lang::ast::SmolStr;

use crate::types::TypeDesc;

/// Kind of a signal synthesized by the pipeline itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Synthetic {
    /// Loop counter driving the geometry stage
    GeomIterator,
    /// Comparison tolerance
    Tolerance,
    /// Pass/fail color written by the comparison logic
    ColorResult,
    /// Vertex position fed to `gl_Position`
    PositionResult,
}

/// Where the value of a signal comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Input of the test signature, by declaration index
    Input(usize),
    /// Output of the test signature, by declaration index
    Output(usize),
    /// Stage-local variable
    Local,
    /// Placeholder that is never emitted
    Unused,
    /// Helper generated by the pipeline
    Synthetic(Synthetic),
}

impl Provenance {
    /// `true` for signals coming from the test signature inputs
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }

    /// `true` for signals coming from the test signature outputs
    pub fn is_output(&self) -> bool {
        matches!(self, Self::Output(_))
    }
}

/// A named, typed value flowing into, out of or within a shader stage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signal {
    /// Role of this signal
    pub provenance: Provenance,
    /// Type of this signal
    pub ty: TypeDesc,
    /// Identifier used in the generated source
    pub name: SmolStr,
    /// Base name used when deriving new names for this signal
    pub hint: SmolStr,
}

impl Signal {
    /// Create a signal whose hint is its own name
    pub fn new(provenance: Provenance, ty: impl Into<TypeDesc>, name: impl Into<SmolStr>) -> Self {
        let name = name.into();

        Self {
            provenance,
            ty: ty.into(),
            hint: name.clone(),
            name,
        }
    }

    /// Create a signal with a separate naming hint
    pub fn with_hint(
        provenance: Provenance,
        ty: impl Into<TypeDesc>,
        name: impl Into<SmolStr>,
        hint: impl Into<SmolStr>,
    ) -> Self {
        Self {
            provenance,
            ty: ty.into(),
            name: name.into(),
            hint: hint.into(),
        }
    }

    /// `true` if the components of this signal are floating-point values
    pub fn is_floating(&self) -> bool {
        self.ty.info.is_floating()
    }

    /// Array version of this signal, with the same name, hint and provenance
    ///
    /// # Panics
    ///
    /// Panics if this signal is already an array.
    pub fn make_array(&self, size: usize) -> Self {
        Self {
            provenance: self.provenance,
            ty: self.ty.array_of(size),
            name: self.name.clone(),
            hint: self.hint.clone(),
        }
    }

    /// Write the declaration of this signal, terminated by a newline
    ///
    /// # Parameters
    ///
    /// * `out`: string to append to
    /// * `qualifier`: storage qualifier, if any
    /// * `needs_flat`: add `flat` if this is not a floating-point signal
    pub fn write_declaration(&self, out: &mut String, qualifier: Option<&str>, needs_flat: bool) {
        if needs_flat && !self.is_floating() {
            out.push_str("flat ");
        }

        if let Some(qualifier) = qualifier {
            out.push_str(qualifier);
            out.push(' ');
        }

        out.push_str(&format!("{} {};\n", self.ty, self.name));
    }
}

/// Ordered collection of signals
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SignalSet(Vec<Signal>);

impl SignalSet {
    /// Create an empty signal set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a signal at the end of this set
    pub fn push(&mut self, signal: Signal) {
        self.0.push(signal);
    }

    /// Add all the signals of `other` at the end of this set
    pub fn append(&mut self, other: &SignalSet) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Find a signal by name
    pub fn find_name(&self, name: &str) -> Option<&Signal> {
        self.0.iter().find(|s| s.name.as_str() == name)
    }

    /// Iterate over the names of this set, in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.name.as_str())
    }

    /// Render the global or local declarations for this set
    ///
    /// # Parameters
    ///
    /// * `qualifier`: storage qualifier (`in`, `varying`, `uniform`...), `None` for locals
    /// * `needs_flat`: add `flat` to non floating-point signals
    pub fn declarations(&self, qualifier: Option<&str>, needs_flat: bool) -> String {
        let mut s = String::new();
        for signal in &self.0 {
            signal.write_declaration(&mut s, qualifier, needs_flat);
        }
        s
    }
}

impl Deref for SignalSet {
    type Target = [Signal];

    fn deref(&self) -> &Self::Target {
        &self.0[..]
    }
}

impl From<Vec<Signal>> for SignalSet {
    fn from(signals: Vec<Signal>) -> Self {
        Self(signals)
    }
}

impl std::iter::FromIterator<Signal> for SignalSet {
    fn from_iter<T: IntoIterator<Item = Signal>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Signal> for SignalSet {
    fn extend<T: IntoIterator<Item = Signal>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl IntoIterator for SignalSet {
    type Item = Signal;
    type IntoIter = std::vec::IntoIter<Signal>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SignalSet {
    type Item = &'a Signal;
    type IntoIter = std::slice::Iter<'a, Signal>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
