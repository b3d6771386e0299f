//! Violation records emitted by the detector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The rule a violation breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    Speeding,
    Tailgating,
    UnsafeLaneChange,
    RollingStop,
}

impl ViolationKind {
    /// String representation for reports and database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Speeding => "SPEEDING",
            Self::Tailgating => "TAILGATING",
            Self::UnsafeLaneChange => "UNSAFE_LANE_CHANGE",
            Self::RollingStop => "ROLLING_STOP",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ViolationKind {
    type Err = UnknownViolationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SPEEDING" => Ok(Self::Speeding),
            "TAILGATING" => Ok(Self::Tailgating),
            "UNSAFE_LANE_CHANGE" => Ok(Self::UnsafeLaneChange),
            "ROLLING_STOP" => Ok(Self::RollingStop),
            _ => Err(UnknownViolationKind(s.to_string())),
        }
    }
}

impl Serialize for ViolationKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ViolationKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown violation kind strings.
#[derive(Debug, Clone)]
pub struct UnknownViolationKind(pub String);

impl fmt::Display for UnknownViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown violation type: {}", self.0)
    }
}

impl std::error::Error for UnknownViolationKind {}

/// A detected breach of a configured road rule.
///
/// Immutable once created. The `time` field carries the formatted `MM:SS.s`
/// text, which is also the sort and storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// The rule that was breached.
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    /// Formatted `MM:SS.s` time of the triggering event.
    pub time: String,
    /// Human-readable explanation.
    pub details: String,
}
