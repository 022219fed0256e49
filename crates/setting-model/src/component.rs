//! Classification component codes and the composite setting code.
//!
//! Each of the three components (category, designation, area) resolves to
//! either a configured abbreviation or one of two sentinels:
//!
//! - `UKN`: the establishment identity carried no data at all.
//! - `XxX`: the identity had data but no source could resolve the component.
//!
//! The sentinels are kept distinct in memory and only flattened to strings
//! at serialization boundaries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ModelError;

/// Sentinel for "no placement data".
pub const UNKNOWN_CODE: &str = "UKN";

/// Sentinel for "data present but undeterminable".
pub const UNDETERMINABLE_CODE: &str = "XxX";

/// Separator between components in a composite setting code.
pub const CODE_SEPARATOR: char = '_';

/// A resolved classification component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentCode {
    /// No placement data (`UKN`).
    Unknown,
    /// Lookup failed for an otherwise-present identity (`XxX`).
    Undeterminable,
    /// A configured abbreviation.
    Resolved(String),
}

impl ComponentCode {
    /// Build a component from a raw table value.
    ///
    /// Sentinel strings map back onto their variants so a value read from
    /// an override table round-trips through serialization. Blank values
    /// yield `None`.
    pub fn from_value(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        match trimmed {
            "" => None,
            UNKNOWN_CODE => Some(Self::Unknown),
            UNDETERMINABLE_CODE => Some(Self::Undeterminable),
            other => Some(Self::Resolved(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unknown => UNKNOWN_CODE,
            Self::Undeterminable => UNDETERMINABLE_CODE,
            Self::Resolved(value) => value,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Self::Resolved(_))
    }

    /// The configured abbreviation, if this is not a sentinel.
    pub fn resolved(&self) -> Option<&str> {
        match self {
            Self::Resolved(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(CODE_SEPARATOR) {
            return Err(ModelError::InvalidComponentCode(s.to_string()));
        }
        Self::from_value(s).ok_or_else(|| ModelError::InvalidComponentCode(s.to_string()))
    }
}

impl Serialize for ComponentCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ComponentCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Join the present components into a composite setting code.
///
/// Components are always emitted in category, designation, area order.
pub fn compose_code<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut code = String::new();
    for part in parts.into_iter().flatten() {
        if !code.is_empty() {
            code.push(CODE_SEPARATOR);
        }
        code.push_str(part);
    }
    code
}
