//! Typed option values and their textual encoding.
//!
//! Book files store every option value as a pair of attributes, a type tag and
//! a text value. This module owns both directions of that mapping. Decoding is
//! strict: an unknown tag or a value that does not parse as its tag is an
//! error, never a silent fallback to a string.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced when a stored `(type, value)` pair cannot be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown option type `{0}`")]
    UnknownType(String),

    #[error("`{value}` is not a valid {tag} value")]
    InvalidValue { tag: TypeTag, value: String },
}

/// Type tag written next to every encoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Str,
    Int,
    Float,
    Bool,
}

impl TypeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Str => "str",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Bool => "bool",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "str" | "unicode" => Ok(TypeTag::Str),
            "int" => Ok(TypeTag::Int),
            "float" => Ok(TypeTag::Float),
            "bool" => Ok(TypeTag::Bool),
            other => Err(DecodeError::UnknownType(other.to_string())),
        }
    }
}

/// A single primitive option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    pub fn tag(&self) -> TypeTag {
        match self {
            Scalar::Str(_) => TypeTag::Str,
            Scalar::Int(_) => TypeTag::Int,
            Scalar::Float(_) => TypeTag::Float,
            Scalar::Bool(_) => TypeTag::Bool,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self).1)
    }
}

/// The value of one named option: either a scalar or an ordered list of scalars.
///
/// Lists may mix element types; each element keeps its own tag on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl OptionValue {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            OptionValue::Scalar(s) => Some(s),
            OptionValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            OptionValue::List(items) => Some(items),
            OptionValue::Scalar(_) => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, OptionValue::List(_))
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Scalar(s) => fmt::Display::fmt(s, f),
            OptionValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<Scalar> for OptionValue {
    fn from(value: Scalar) -> Self {
        OptionValue::Scalar(value)
    }
}

impl From<Vec<Scalar>> for OptionValue {
    fn from(items: Vec<Scalar>) -> Self {
        OptionValue::List(items)
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident($conv:expr)),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant($conv(value))
                }
            }

            impl From<$ty> for OptionValue {
                fn from(value: $ty) -> Self {
                    OptionValue::Scalar(Scalar::from(value))
                }
            }
        )*
    };
}

scalar_from! {
    String => Str(|v| v),
    &str => Str(|v: &str| v.to_string()),
    i64 => Int(|v| v),
    i32 => Int(i64::from),
    u32 => Int(i64::from),
    f64 => Float(|v| v),
    bool => Bool(|v| v),
}

/// Encode a scalar into its `(type tag, text)` pair.
pub fn encode(value: &Scalar) -> (TypeTag, String) {
    let text = match value {
        Scalar::Str(s) => s.clone(),
        Scalar::Int(v) => v.to_string(),
        Scalar::Float(v) => format_float(*v),
        Scalar::Bool(true) => "True".to_string(),
        Scalar::Bool(false) => "False".to_string(),
    };
    (value.tag(), text)
}

/// Decode a stored `(type tag, text)` pair back into a scalar.
pub fn decode(tag: &str, text: &str) -> Result<Scalar, DecodeError> {
    let tag: TypeTag = tag.parse()?;
    let invalid = || DecodeError::InvalidValue {
        tag,
        value: text.to_string(),
    };

    match tag {
        TypeTag::Str => Ok(Scalar::Str(text.to_string())),
        TypeTag::Int => text.trim().parse().map(Scalar::Int).map_err(|_| invalid()),
        TypeTag::Float => text.trim().parse().map(Scalar::Float).map_err(|_| invalid()),
        TypeTag::Bool => match text.trim() {
            "True" | "true" | "1" => Ok(Scalar::Bool(true)),
            "False" | "false" | "0" => Ok(Scalar::Bool(false)),
            _ => Err(invalid()),
        },
    }
}

/// Integral floats keep a trailing `.0` so the text still reads as a float.
fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}
