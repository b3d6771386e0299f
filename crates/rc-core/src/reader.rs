//! Line-oriented drive log reader.
//!
//! Each non-blank line is `TIMESTAMP KIND [ARG]`. The grammar is strict per
//! kind; any deviation fails the whole read with the offending line number.

use thiserror::Error;

use crate::event::{Direction, Event, EventKind, UnknownEventKind};
use crate::timecode::{TimeFormatError, parse_timestamp};

/// Errors from reading a drive log.
#[derive(Debug, Error)]
pub enum LogError {
    /// A line did not have at least a timestamp and a kind.
    #[error("line {line}: bad line: {text:?}")]
    Truncated { line: usize, text: String },

    /// A line's timestamp did not parse.
    #[error("line {line}: {source}")]
    Timestamp {
        line: usize,
        #[source]
        source: TimeFormatError,
    },

    /// A line named an event kind the analyzer does not know.
    #[error("line {line}: {source}")]
    UnknownKind {
        line: usize,
        #[source]
        source: UnknownEventKind,
    },

    /// A line's argument did not match its kind's grammar.
    #[error("line {line}: bad {kind} event: {text:?}")]
    Malformed {
        line: usize,
        kind: EventKind,
        text: String,
    },
}

/// Parses a drive log into an ordered event sequence.
///
/// Blank lines are skipped. Returns the events in input order; callers are
/// responsible for any ordering guarantees beyond that.
pub fn parse_log(input: &str) -> Result<Vec<Event>, LogError> {
    let mut events = Vec::new();

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(LogError::Truncated {
                line,
                text: text.to_string(),
            });
        }

        let timestamp =
            parse_timestamp(tokens[0]).map_err(|source| LogError::Timestamp { line, source })?;
        let kind: EventKind = tokens[1]
            .parse()
            .map_err(|source| LogError::UnknownKind { line, source })?;

        let malformed = || LogError::Malformed {
            line,
            kind,
            text: text.to_string(),
        };

        let argument = match kind {
            EventKind::Speed | EventKind::FollowDistance => {
                if tokens.len() != 3 {
                    return Err(malformed());
                }
                let magnitude: f64 = tokens[2].parse().map_err(|_| malformed())?;
                if !magnitude.is_finite() {
                    return Err(malformed());
                }
                tokens[2]
            }
            EventKind::LaneChange => {
                if tokens.len() != 3 {
                    return Err(malformed());
                }
                let _: Direction = tokens[2].parse().map_err(|_| malformed())?;
                tokens[2]
            }
            EventKind::StopSignDetected => {
                if tokens.len() != 2 {
                    return Err(malformed());
                }
                ""
            }
        };

        events.push(Event::new(timestamp, kind, argument));
    }

    tracing::debug!(events = events.len(), "parsed drive log");
    Ok(events)
}
