//! Identifier allocation for generated shader code

use glsl_lang::ast::SmolStr;
use indexmap::IndexSet;

/// Tracks every identifier used by a pipeline and mints fresh ones on demand
#[derive(Default, Debug, Clone)]
pub struct NameAllocator {
    /// Used identifiers, in reservation order
    used: IndexSet<SmolStr>,
}

impl NameAllocator {
    /// Create an allocator with no reserved name
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` as used, so it will never be returned by [allocate](#method.allocate)
    pub fn reserve(&mut self, name: &str) {
        if self.used.insert(name.into()) {
            trace!("reserved name: {}", name);
        }
    }

    /// `true` if `name` is already in use
    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Generate a name that hasn't been used yet, by taking `hint` and appending an integer if
    /// necessary
    pub fn allocate(&mut self, hint: &str) -> SmolStr {
        if !self.used.contains(hint) {
            let name = SmolStr::from(hint);
            self.used.insert(name.clone());
            return name;
        }

        let mut suffix = 0usize;
        let name = loop {
            let candidate = SmolStr::from(format!("{}{}", hint, suffix));
            if !self.used.contains(&candidate) {
                break candidate;
            }

            suffix += 1;
        };

        debug!("allocated {} for hint {}", name, hint);
        self.used.insert(name.clone());
        name
    }

    /// Iterate over the used names, in reservation order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.used.iter().map(|s| s.as_str())
    }

    /// Number of used names
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// `true` if no name has been reserved
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
