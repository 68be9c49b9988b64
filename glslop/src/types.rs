//! Type registry for signature types

use std::fmt;

use crate::{Error, Result};

/// Scalar kind underlying a GLSL type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    /// 32-bit float
    Float,
    /// Signed 32-bit integer
    Int,
    /// Unsigned 32-bit integer
    Uint,
    /// Boolean
    Bool,
}

/// Static description of a scalar or vector GLSL type
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// GLSL type name
    pub name: &'static str,
    /// Scalar kind of the components
    pub base_type: BaseType,
    /// Number of components, between 1 and 4
    pub components: usize,
}

macro_rules! known_types {
    ($($name:literal => $base:ident * $n:literal),* $(,)?) => {
        static KNOWN_TYPES: &[TypeInfo] = &[
            $(TypeInfo { name: $name, base_type: BaseType::$base, components: $n },)*
        ];
    };
}

// TODO: matrix types, they need a column-wise distance in the comparison logic
known_types! {
    "float" => Float * 1, "vec2" => Float * 2, "vec3" => Float * 3, "vec4" => Float * 4,
    "int" => Int * 1, "ivec2" => Int * 2, "ivec3" => Int * 3, "ivec4" => Int * 4,
    "uint" => Uint * 1, "uvec2" => Uint * 2, "uvec3" => Uint * 3, "uvec4" => Uint * 4,
    "bool" => Bool * 1, "bvec2" => Bool * 2, "bvec3" => Bool * 3, "bvec4" => Bool * 4,
}

impl TypeInfo {
    /// Find the type registered under `name`
    ///
    /// # Errors
    ///
    /// [Error::UnknownType] if `name` is not a supported GLSL type.
    pub fn lookup(name: &str) -> Result<&'static TypeInfo> {
        KNOWN_TYPES
            .iter()
            .find(|ty| ty.name == name)
            .ok_or_else(|| Error::UnknownType(name.to_owned()))
    }

    /// Iterate over every registered type
    pub fn all() -> impl Iterator<Item = &'static TypeInfo> {
        KNOWN_TYPES.iter()
    }

    /// `true` if the components are floating-point values
    pub fn is_floating(&self) -> bool {
        self.base_type == BaseType::Float
    }

    fn builtin(name: &str) -> &'static TypeInfo {
        // Only called with names from the table above
        KNOWN_TYPES
            .iter()
            .find(|ty| ty.name == name)
            .unwrap_or_else(|| panic!("{} is not a registered type", name))
    }

    /// The `int` type
    pub fn int() -> &'static TypeInfo {
        Self::builtin("int")
    }

    /// The `float` type
    pub fn float() -> &'static TypeInfo {
        Self::builtin("float")
    }

    /// The `vec4` type
    pub fn vec4() -> &'static TypeInfo {
        Self::builtin("vec4")
    }
}

/// Type of a signal: a registered type, optionally as a fixed-size array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDesc {
    /// Element type
    pub info: &'static TypeInfo,
    /// Array size, 0 if this is not an array
    pub array_size: usize,
}

impl TypeDesc {
    /// Non-array type
    pub fn new(info: &'static TypeInfo) -> Self {
        Self {
            info,
            array_size: 0,
        }
    }

    /// Array of `size` elements of `self`
    ///
    /// # Panics
    ///
    /// Panics if `self` is already an array: GLSL 1.x has no arrays of arrays.
    pub fn array_of(self, size: usize) -> Self {
        assert!(self.array_size == 0, "cannot make an array of {}", self);
        assert!(size > 0, "array size must be positive");

        Self {
            info: self.info,
            array_size: size,
        }
    }

    /// `true` if this is an array type
    pub fn is_array(&self) -> bool {
        self.array_size > 0
    }
}

impl From<&'static TypeInfo> for TypeDesc {
    fn from(info: &'static TypeInfo) -> Self {
        Self::new(info)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.array_size == 0 {
            write!(f, "{}", self.info.name)
        } else {
            write!(f, "{}[{}]", self.info.name, self.array_size)
        }
    }
}
