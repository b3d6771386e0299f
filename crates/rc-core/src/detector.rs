//! The violation detector: a single stateful pass over an ordered event
//! sequence.
//!
//! The detector never re-sorts its input; callers order events by timestamp
//! before calling. The emitted list is a pure deterministic function of the
//! rules and the event sequence.

use thiserror::Error;

use crate::event::{Event, EventKind};
use crate::scenario::RoadRules;
use crate::timecode::format_seconds;
use crate::violation::{Violation, ViolationKind};

/// Speeds at or below this are treated as still stopped when resolving a
/// stop-sign wait.
const MOVING_THRESHOLD_MPH: f64 = 1.0;

/// Errors from a detection run.
#[derive(Debug, Error)]
pub enum DetectError {
    /// An event carried an argument its kind cannot parse. The upstream
    /// reader validates arguments, so this only fires for events constructed
    /// elsewhere; the run aborts rather than coercing.
    #[error("bad {kind} argument {argument:?} at {time}")]
    BadArgument {
        kind: EventKind,
        argument: String,
        time: String,
    },
}

/// Mutable state carried across one detection pass.
#[derive(Debug, Default)]
struct DetectorState {
    /// Most recently observed following distance, if any.
    last_follow_distance: Option<f64>,
    /// Time of the last stop-sign detection not yet resolved by a qualifying
    /// speed sample.
    stop_wait_origin: Option<f64>,
}

/// Applies the configured road rules to an ordered event sequence.
///
/// Returns violations sorted by formatted time (stable: ties keep emission
/// order). Any malformed numeric argument aborts the whole run with zero
/// violations returned.
pub fn detect(rules: &RoadRules, events: &[Event]) -> Result<Vec<Violation>, DetectError> {
    let mut state = DetectorState::default();
    let mut violations = Vec::new();

    for event in events {
        match event.kind {
            EventKind::Speed => {
                let speed = numeric_argument(event)?;
                if speed > rules.max_speed {
                    violations.push(Violation {
                        kind: ViolationKind::Speeding,
                        time: format_seconds(event.timestamp),
                        details: format!(
                            "{speed:.1} mph in {max:.0} mph zone",
                            max = rules.max_speed
                        ),
                    });
                }

                // A stop-sign wait resolves on the first sample that shows the
                // vehicle moving again, whether or not it resolves early.
                if let Some(origin) = state.stop_wait_origin {
                    if speed > MOVING_THRESHOLD_MPH && event.timestamp > origin {
                        let waited = event.timestamp - origin;
                        if waited < rules.stop_sign_wait {
                            violations.push(Violation {
                                kind: ViolationKind::RollingStop,
                                time: format_seconds(event.timestamp),
                                details: format!(
                                    "Stopped {waited:.1}s; required {required:.1}s",
                                    required = rules.stop_sign_wait
                                ),
                            });
                        }
                        state.stop_wait_origin = None;
                    }
                }
            }
            EventKind::FollowDistance => {
                let distance = numeric_argument(event)?;
                state.last_follow_distance = Some(distance);
                if distance < rules.min_follow_distance {
                    violations.push(Violation {
                        kind: ViolationKind::Tailgating,
                        time: format_seconds(event.timestamp),
                        details: format!(
                            "{distance:.1} m < {min:.1} m",
                            min = rules.min_follow_distance
                        ),
                    });
                }
            }
            EventKind::LaneChange => {
                // Uses the last known following distance, however stale.
                if let Some(distance) = state.last_follow_distance {
                    if distance < rules.min_follow_distance {
                        violations.push(Violation {
                            kind: ViolationKind::UnsafeLaneChange,
                            time: format_seconds(event.timestamp),
                            details: format!(
                                "follow {distance:.1} m < {min:.1} m",
                                min = rules.min_follow_distance
                            ),
                        });
                    }
                }
            }
            EventKind::StopSignDetected => {
                // Only the most recent stop sign matters; an unresolved
                // earlier wait is superseded.
                state.stop_wait_origin = Some(event.timestamp);
            }
        }
    }

    violations.sort_by(|a, b| time_sort_key(&a.time).total_cmp(&time_sort_key(&b.time)));
    tracing::debug!(violations = violations.len(), "detection pass complete");
    Ok(violations)
}

fn numeric_argument(event: &Event) -> Result<f64, DetectError> {
    event
        .argument
        .parse()
        .map_err(|_| DetectError::BadArgument {
            kind: event.kind,
            argument: event.argument.clone(),
            time: format_seconds(event.timestamp),
        })
}

/// Sort key for a formatted time: the digit string with `:` and `.` stripped,
/// read as a number. The formatted text, not the original float timestamp, is
/// the key.
fn time_sort_key(time: &str) -> f64 {
    time.chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or(0.0)
}
