//! Core domain logic for the drive log analyzer.
//!
//! This crate contains the fundamental types and logic for:
//! - Timecode: converting between `MM:SS.s` text and seconds
//! - Log reading: tokenizing drive logs into typed events
//! - Scenario loading: road rules and speed zones from JSON
//! - Detection: the stateful rule pass that finds violations

pub mod detector;
pub mod event;
pub mod report;
pub mod scenario;
pub mod timecode;
pub mod violation;

mod reader;

pub use detector::{DetectError, detect};
pub use event::{Direction, Event, EventKind, UnknownDirection, UnknownEventKind};
pub use reader::{LogError, parse_log};
pub use report::Report;
pub use scenario::{RoadRules, Scenario, ScenarioError, SpeedZone, UNNAMED_SCENARIO};
pub use timecode::{TimeFormatError, format_seconds, parse_timestamp};
pub use violation::{UnknownViolationKind, Violation, ViolationKind};
