use std::fmt;

use crate::error::WireError;

/// A scalar variable value.
///
/// Values are stored as text; this type exists so callers can pass numbers and
/// booleans directly. Booleans render as `1` / `0`, the protocol's convention
/// for flags such as `READY=1`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl Value {
    /// The text form written on the wire.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Int(n) => write!(f, "{n}"),
            Value::UInt(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Bool(true) => f.write_str("1"),
            Value::Bool(false) => f.write_str("0"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::Int(i64::from(value))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::UInt(u64::from(value))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::UInt(value as u64)
    }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = WireError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value as Json;

        match value {
            Json::String(text) => Ok(Value::Text(text.clone())),
            Json::Bool(flag) => Ok(Value::Bool(*flag)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Value::UInt(u))
                } else {
                    Ok(Value::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Json::Null => Err(WireError::NonScalar { kind: "null" }),
            Json::Array(_) => Err(WireError::NonScalar { kind: "array" }),
            Json::Object(_) => Err(WireError::NonScalar { kind: "object" }),
        }
    }
}
