//! Shader pipeline stages

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A shader pipeline stage, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Vertex shader
    Vertex,
    /// Geometry shader
    Geometry,
    /// Fragment shader
    Fragment,
}

impl Stage {
    /// All stages, in pipeline order
    pub const ALL: [Stage; 3] = [Stage::Vertex, Stage::Geometry, Stage::Fragment];

    /// Human-readable name of this stage
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Geometry => "geometry",
            Self::Fragment => "fragment",
        }
    }

    /// Short name used on the command line
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Vertex => "vs",
            Self::Geometry => "gs",
            Self::Fragment => "fs",
        }
    }

    /// Stage immediately after this one in pipeline order, present or not
    pub fn successor(self) -> Option<Stage> {
        match self {
            Self::Vertex => Some(Self::Geometry),
            Self::Geometry => Some(Self::Fragment),
            Self::Fragment => None,
        }
    }

    /// Stage immediately before this one in pipeline order, present or not
    pub fn predecessor(self) -> Option<Stage> {
        match self {
            Self::Vertex => None,
            Self::Geometry => Some(Self::Vertex),
            Self::Fragment => Some(Self::Geometry),
        }
    }

    /// Stages strictly between `self` and `other`, in pipeline order
    pub fn between(self, other: Stage) -> impl DoubleEndedIterator<Item = Stage> {
        let (lo, hi) = if self <= other {
            (self, other)
        } else {
            (other, self)
        };

        Self::ALL
            .iter()
            .copied()
            .filter(move |stage| lo < *stage && *stage < hi)
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|stage| stage.short_name() == s || stage.name() == s)
            .ok_or_else(|| Error::unknown_option("stage", s))
    }
}
