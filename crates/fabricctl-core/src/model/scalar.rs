// Loosely typed YAML scalars.
//
// Operators write `VLAN ID: 100` and `VLAN ID: "100"` interchangeably, so
// scalar fields deserialize through this type and are coerced once.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Integer value, accepting numeric strings.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Str(s) => s.trim().parse().ok(),
            Self::Bool(_) | Self::Float(_) => None,
        }
    }

    /// Boolean value, accepting `true/false/yes/no` strings.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "enable" | "enabled" => Some(true),
                "false" | "no" | "disable" | "disabled" => Some(false),
                _ => None,
            },
            Self::Int(i) => Some(*i != 0),
            Self::Float(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Str(s) if s.trim().is_empty())
    }

    /// JSON form used when flattening property bags.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Value::from(*f),
            Self::Str(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// Controller form: booleans lowercase, everything else verbatim.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn coerces_numeric_strings_and_bools() {
        assert_eq!(Scalar::from(" 100 ").as_i64(), Some(100));
        assert_eq!(Scalar::Int(7).as_i64(), Some(7));
        assert_eq!(Scalar::from("Yes").as_bool(), Some(true));
        assert_eq!(Scalar::Bool(false).to_string(), "false");
        assert_eq!(Scalar::from("abc").as_i64(), None);
    }
}
