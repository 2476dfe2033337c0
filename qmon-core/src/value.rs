use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;
use uuid::Uuid;

use crate::identity::ObjectIdentity;

/// One dynamically-typed QMF attribute value, as delivered by the broker
/// client library inside an object update.
///
/// The console never builds these itself outside of tests; it only reads
/// them back out through the typed accessors below, which fail with a
/// [`CoercionError`] when the requested representation does not fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f32),
    Double(f64),
    Str(String),
    Uuid(Uuid),
    ObjectRef(ObjectIdentity),
    Map(BTreeMap<String, AttributeValue>),
    List(Vec<AttributeValue>),
}

/// Failure to represent an [`AttributeValue`] as a requested scalar type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    #[error("cannot represent {kind} value as {requested}")]
    WrongType {
        kind: &'static str,
        requested: &'static str,
    },

    #[error("{kind} value {value} out of range for {requested}")]
    OutOfRange {
        kind: &'static str,
        value: String,
        requested: &'static str,
    },
}

impl AttributeValue {
    /// Name of this value's dynamic type, for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AttributeValue::Null => "null",
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Int(_) => "int",
            AttributeValue::Uint(_) => "uint",
            AttributeValue::Float(_) => "float",
            AttributeValue::Double(_) => "double",
            AttributeValue::Str(_) => "string",
            AttributeValue::Uuid(_) => "uuid",
            AttributeValue::ObjectRef(_) => "object-id",
            AttributeValue::Map(_) => "map",
            AttributeValue::List(_) => "list",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, AttributeValue::Bool(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, AttributeValue::Map(_))
    }

    pub fn is_uuid(&self) -> bool {
        matches!(self, AttributeValue::Uuid(_))
    }

    pub fn is_object_ref(&self) -> bool {
        matches!(self, AttributeValue::ObjectRef(_))
    }

    pub fn as_bool(&self) -> Result<bool, CoercionError> {
        match self {
            AttributeValue::Bool(b) => Ok(*b),
            other => Err(other.wrong_type("bool")),
        }
    }

    pub fn as_i32(&self) -> Result<i32, CoercionError> {
        match self {
            AttributeValue::Int(i) => {
                i32::try_from(*i).map_err(|_| self.out_of_range(i.to_string(), "i32"))
            }
            AttributeValue::Uint(u) => {
                i32::try_from(*u).map_err(|_| self.out_of_range(u.to_string(), "i32"))
            }
            other => Err(other.wrong_type("i32")),
        }
    }

    pub fn as_i64(&self) -> Result<i64, CoercionError> {
        match self {
            AttributeValue::Int(i) => Ok(*i),
            AttributeValue::Uint(u) => {
                i64::try_from(*u).map_err(|_| self.out_of_range(u.to_string(), "i64"))
            }
            other => Err(other.wrong_type("i64")),
        }
    }

    pub fn as_u32(&self) -> Result<u32, CoercionError> {
        match self {
            AttributeValue::Int(i) => {
                u32::try_from(*i).map_err(|_| self.out_of_range(i.to_string(), "u32"))
            }
            AttributeValue::Uint(u) => {
                u32::try_from(*u).map_err(|_| self.out_of_range(u.to_string(), "u32"))
            }
            other => Err(other.wrong_type("u32")),
        }
    }

    pub fn as_u64(&self) -> Result<u64, CoercionError> {
        match self {
            AttributeValue::Int(i) => {
                u64::try_from(*i).map_err(|_| self.out_of_range(i.to_string(), "u64"))
            }
            AttributeValue::Uint(u) => Ok(*u),
            other => Err(other.wrong_type("u64")),
        }
    }

    pub fn as_f32(&self) -> Result<f32, CoercionError> {
        match self {
            AttributeValue::Float(f) => Ok(*f),
            AttributeValue::Double(d) => Ok(*d as f32),
            other => Err(other.wrong_type("f32")),
        }
    }

    pub fn as_f64(&self) -> Result<f64, CoercionError> {
        match self {
            AttributeValue::Float(f) => Ok(f64::from(*f)),
            AttributeValue::Double(d) => Ok(*d),
            other => Err(other.wrong_type("f64")),
        }
    }

    fn wrong_type(&self, requested: &'static str) -> CoercionError {
        CoercionError::WrongType {
            kind: self.kind(),
            requested,
        }
    }

    fn out_of_range(&self, value: String, requested: &'static str) -> CoercionError {
        CoercionError::OutOfRange {
            kind: self.kind(),
            value,
            requested,
        }
    }
}

impl Display for AttributeValue {
    /// Native string rendering of any value variant.
    ///
    /// Maps render canonically as `{key:value, key:value}` with keys in
    /// sorted order, lists as `[value, value]`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Int(i) => write!(f, "{}", i),
            AttributeValue::Uint(u) => write!(f, "{}", u),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Double(v) => write!(f, "{}", v),
            AttributeValue::Str(s) => write!(f, "{}", s),
            AttributeValue::Uuid(u) => write!(f, "{}", u),
            AttributeValue::ObjectRef(id) => write!(f, "{}", id),
            AttributeValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                write!(f, "}}")
            }
            AttributeValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}
