//! Typed observations from a drive log.

use std::fmt;
use std::str::FromStr;

/// Canonical event kinds for a drive log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Speed,
    FollowDistance,
    LaneChange,
    StopSignDetected,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Speed => "SPEED",
            Self::FollowDistance => "FOLLOW_DISTANCE",
            Self::LaneChange => "LANE_CHANGE",
            Self::StopSignDetected => "STOP_SIGN_DETECTED",
        };
        write!(f, "{s}")
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SPEED" => Ok(Self::Speed),
            "FOLLOW_DISTANCE" => Ok(Self::FollowDistance),
            "LANE_CHANGE" => Ok(Self::LaneChange),
            "STOP_SIGN_DETECTED" => Ok(Self::StopSignDetected),
            _ => Err(UnknownEventKind(s.to_string())),
        }
    }
}

/// Error type for unknown event kind strings.
///
/// An unknown kind is a hard stop: the whole run fails and no violations are
/// returned.
#[derive(Debug, Clone)]
pub struct UnknownEventKind(pub String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind: {}", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}

/// Direction of a lane change. Informational only; the unsafe-lane-change
/// rule does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LEFT" => Ok(Self::Left),
            "RIGHT" => Ok(Self::Right),
            _ => Err(UnknownDirection(s.to_string())),
        }
    }
}

/// Error type for unknown lane-change directions.
#[derive(Debug, Clone)]
pub struct UnknownDirection(pub String);

impl fmt::Display for UnknownDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown direction: {}", self.0)
    }
}

impl std::error::Error for UnknownDirection {}

/// A single timestamped observation from a drive.
///
/// The argument is kind-dependent: a numeric magnitude for `SPEED` and
/// `FOLLOW_DISTANCE`, a direction token for `LANE_CHANGE`, and empty for
/// `STOP_SIGN_DETECTED`. The reader validates arguments against the line
/// grammar; the detector re-parses numeric arguments and fails the run if
/// malformed data reaches it.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Seconds since the start of the drive.
    pub timestamp: f64,
    /// The kind of observation.
    pub kind: EventKind,
    /// Kind-dependent argument text.
    pub argument: String,
}

impl Event {
    /// Creates an event with an owned argument.
    pub fn new(timestamp: f64, kind: EventKind, argument: impl Into<String>) -> Self {
        Self {
            timestamp,
            kind,
            argument: argument.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_kinds() {
        let kinds = [
            EventKind::Speed,
            EventKind::FollowDistance,
            EventKind::LaneChange,
            EventKind::StopSignDetected,
        ];

        for kind in &kinds {
            let s = kind.to_string();
            let parsed: EventKind = s.parse().expect("should parse");
            assert_eq!(parsed, *kind, "roundtrip failed for {kind:?}");
        }
    }

    #[test]
    fn unknown_kind_errors() {
        let result: Result<EventKind, _> = "UNKNOWN".parse();
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "unknown event kind: UNKNOWN");
    }

    #[test]
    fn kind_parsing_is_case_sensitive() {
        assert!("speed".parse::<EventKind>().is_err());
        assert!("Lane_Change".parse::<EventKind>().is_err());
    }

    #[test]
    fn direction_parses_wire_spellings() {
        assert_eq!("LEFT".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!("RIGHT".parse::<Direction>().unwrap(), Direction::Right);
        assert!("UP".parse::<Direction>().is_err());
        assert!("left".parse::<Direction>().is_err());
    }
}
