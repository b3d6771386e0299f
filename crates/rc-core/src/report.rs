//! Report shaping for one analysis run.

use serde::{Deserialize, Serialize};

use crate::scenario::{Scenario, UNNAMED_SCENARIO};
use crate::violation::Violation;

/// The structured result of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Resolved scenario name.
    pub scenario: String,
    /// Violations in detector order.
    pub violations: Vec<Violation>,
    /// Count of `violations`.
    pub total_violations: usize,
}

impl Report {
    /// Builds a report from an optional scenario and the detected violations.
    ///
    /// A missing scenario behaves exactly like a scenario without a name.
    pub fn build(scenario: Option<&Scenario>, violations: Vec<Violation>) -> Self {
        let name = scenario.map_or(UNNAMED_SCENARIO, Scenario::display_name);
        Self {
            scenario: name.to_string(),
            total_violations: violations.len(),
            violations,
        }
    }
}
