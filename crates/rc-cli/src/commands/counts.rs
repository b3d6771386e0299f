//! Counts command: violation totals by type for one scenario.

use std::io::Write;

use anyhow::Result;
use serde_json::Value;

use rc_db::Store;

pub fn run<W: Write>(writer: &mut W, store: &Store, scenario_id: i64) -> Result<()> {
    let counts = store.violation_counts(scenario_id)?;
    tracing::debug!(scenario_id, kinds = counts.len(), "counts query");

    let mut map = serde_json::Map::new();
    for entry in counts {
        map.insert(entry.kind, Value::from(entry.count));
    }
    writeln!(writer, "{}", serde_json::to_string_pretty(&Value::Object(map))?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use rc_core::{RoadRules, Scenario, Violation, ViolationKind};

    #[test]
    fn counts_group_by_type() {
        let mut store = Store::open_in_memory().unwrap();
        let scenario = Scenario {
            name: Some("Drive A".to_string()),
            description: None,
            road_rules: RoadRules {
                max_speed: 60.0,
                min_follow_distance: 10.0,
                stop_sign_wait: 3.0,
            },
            speed_zones: Vec::new(),
        };
        let ruleset_id = store.upsert_ruleset(&scenario.road_rules).unwrap();
        let scenario_id = store
            .register_scenario(&scenario, "scenario.json", ruleset_id)
            .unwrap();
        store
            .save_violations(
                scenario_id,
                &[
                    Violation {
                        kind: ViolationKind::Speeding,
                        time: "00:00.0".to_string(),
                        details: "70.0 mph in 60 mph zone".to_string(),
                    },
                    Violation {
                        kind: ViolationKind::Speeding,
                        time: "00:10.0".to_string(),
                        details: "72.0 mph in 60 mph zone".to_string(),
                    },
                    Violation {
                        kind: ViolationKind::Tailgating,
                        time: "00:01.0".to_string(),
                        details: "5.0 m < 10.0 m".to_string(),
                    },
                ],
            )
            .unwrap();

        let mut output = Vec::new();
        run(&mut output, &store, scenario_id).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output.trim_end(), @r#"
        {
          "SPEEDING": 2,
          "TAILGATING": 1
        }
        "#);
    }

    #[test]
    fn counts_of_unknown_scenario_are_empty() {
        let store = Store::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &store, 42).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.trim_end(), "{}");
    }
}
