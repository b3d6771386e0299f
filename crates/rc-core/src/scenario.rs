//! Scenario configuration: road rules and optional speed zones.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback label for scenarios without a usable name.
pub const UNNAMED_SCENARIO: &str = "Unnamed";

/// Errors from loading or validating a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The scenario file could not be read.
    #[error("failed to read scenario {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scenario JSON was malformed or missing required fields.
    #[error("invalid scenario: {0}")]
    Json(#[from] serde_json::Error),

    /// A road-rule threshold was outside its allowed range.
    #[error("road_rules.{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Immutable rule thresholds for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadRules {
    /// Speed limit in mph. Must be positive.
    pub max_speed: f64,
    /// Minimum following distance in meters. Must be non-negative.
    pub min_follow_distance: f64,
    /// Required wait at a stop sign in seconds. Must be non-negative.
    pub stop_sign_wait: f64,
}

impl RoadRules {
    fn validate(&self) -> Result<(), ScenarioError> {
        if self.max_speed.is_nan() || self.max_speed <= 0.0 {
            return Err(ScenarioError::OutOfRange {
                field: "max_speed",
                value: self.max_speed,
            });
        }
        if self.min_follow_distance.is_nan() || self.min_follow_distance < 0.0 {
            return Err(ScenarioError::OutOfRange {
                field: "min_follow_distance",
                value: self.min_follow_distance,
            });
        }
        if self.stop_sign_wait.is_nan() || self.stop_sign_wait < 0.0 {
            return Err(ScenarioError::OutOfRange {
                field: "stop_sign_wait",
                value: self.stop_sign_wait,
            });
        }
        Ok(())
    }
}

/// A mile-range speed limit. Loaded and persisted with the scenario; the
/// detector does not consult zones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedZone {
    pub start_mile: f64,
    pub end_mile: f64,
    pub speed_limit: f64,
}

/// Configuration bundle for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub road_rules: RoadRules,
    #[serde(default)]
    pub speed_zones: Vec<SpeedZone>,
}

impl Scenario {
    /// Parses and validates a scenario from JSON text.
    pub fn from_json_str(input: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = serde_json::from_str(input)?;
        scenario.road_rules.validate()?;
        Ok(scenario)
    }

    /// Loads and validates a scenario from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let input = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_json_str(&input)?;
        tracing::debug!(
            path = %path.display(),
            zones = scenario.speed_zones.len(),
            "loaded scenario"
        );
        Ok(scenario)
    }

    /// The scenario name for reporting: trimmed, falling back to
    /// [`UNNAMED_SCENARIO`] when absent or all-whitespace.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNNAMED_SCENARIO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[expect(
        clippy::float_cmp,
        reason = "exact equality intended for parsed thresholds"
    )]
    #[test]
    fn load_valid_scenario() {
        let scenario = Scenario::from_json_str(
            r#"{
                "name": "Campus Drive Westbound",
                "description": "Short run near stop signs and lane change.",
                "road_rules": {
                    "max_speed": 35,
                    "min_follow_distance": 5,
                    "stop_sign_wait": 3
                }
            }"#,
        )
        .unwrap();

        assert_eq!(scenario.road_rules.max_speed, 35.0);
        assert!(scenario.speed_zones.is_empty());
        assert_eq!(scenario.display_name(), "Campus Drive Westbound");
    }

    #[expect(
        clippy::float_cmp,
        reason = "exact equality intended for parsed thresholds"
    )]
    #[test]
    fn load_scenario_with_speed_zones() {
        let scenario = Scenario::from_json_str(
            r#"{
                "road_rules": {
                    "max_speed": 35,
                    "min_follow_distance": 5,
                    "stop_sign_wait": 3
                },
                "speed_zones": [
                    {"start_mile": 0.0, "end_mile": 0.5, "speed_limit": 25},
                    {"start_mile": 0.5, "end_mile": 1.0, "speed_limit": 35}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(scenario.speed_zones.len(), 2);
        assert_eq!(scenario.speed_zones[0].speed_limit, 25.0);
    }

    #[test]
    fn missing_road_rules_is_an_error() {
        let result = Scenario::from_json_str(r#"{"name": "Test Scenario"}"#);
        assert!(matches!(result, Err(ScenarioError::Json(_))));
    }

    #[test]
    fn missing_threshold_keys_are_an_error() {
        let result = Scenario::from_json_str(r#"{"road_rules": {"max_speed": 35}}"#);
        assert!(matches!(result, Err(ScenarioError::Json(_))));
    }

    #[test]
    fn ill_typed_speed_zones_are_an_error() {
        let result = Scenario::from_json_str(
            r#"{
                "road_rules": {
                    "max_speed": 35,
                    "min_follow_distance": 5,
                    "stop_sign_wait": 3
                },
                "speed_zones": "not_a_list"
            }"#,
        );
        assert!(matches!(result, Err(ScenarioError::Json(_))));
    }

    #[test]
    fn out_of_range_thresholds_are_an_error() {
        let negative_limit = r#"{
            "road_rules": {"max_speed": 0, "min_follow_distance": 5, "stop_sign_wait": 3}
        }"#;
        assert!(matches!(
            Scenario::from_json_str(negative_limit),
            Err(ScenarioError::OutOfRange {
                field: "max_speed",
                ..
            })
        ));

        let negative_follow = r#"{
            "road_rules": {"max_speed": 35, "min_follow_distance": -1, "stop_sign_wait": 3}
        }"#;
        assert!(matches!(
            Scenario::from_json_str(negative_follow),
            Err(ScenarioError::OutOfRange {
                field: "min_follow_distance",
                ..
            })
        ));
    }

    #[test]
    fn display_name_falls_back_to_unnamed() {
        let rules = r#""road_rules": {"max_speed": 35, "min_follow_distance": 5, "stop_sign_wait": 3}"#;

        let unnamed = Scenario::from_json_str(&format!("{{{rules}}}")).unwrap();
        assert_eq!(unnamed.display_name(), UNNAMED_SCENARIO);

        let null_name = Scenario::from_json_str(&format!(r#"{{"name": null, {rules}}}"#)).unwrap();
        assert_eq!(null_name.display_name(), UNNAMED_SCENARIO);

        let blank_name =
            Scenario::from_json_str(&format!(r#"{{"name": "   ", {rules}}}"#)).unwrap();
        assert_eq!(blank_name.display_name(), UNNAMED_SCENARIO);

        let padded_name =
            Scenario::from_json_str(&format!(r#"{{"name": "  Night Run  ", {rules}}}"#)).unwrap();
        assert_eq!(padded_name.display_name(), "Night Run");
    }

    #[test]
    fn load_reads_scenario_from_disk() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("scenario.json");
        std::fs::write(
            &path,
            r#"{"road_rules": {"max_speed": 60, "min_follow_distance": 10, "stop_sign_wait": 3}}"#,
        )
        .unwrap();

        let scenario = Scenario::load(&path).unwrap();
        assert_eq!(scenario.display_name(), UNNAMED_SCENARIO);

        let missing = Scenario::load(&temp.path().join("absent.json"));
        assert!(matches!(missing, Err(ScenarioError::Io { .. })));
    }
}
