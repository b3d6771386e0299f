//! Summary command: the most recent violations across all scenarios.

use std::io::Write;

use anyhow::Result;

use rc_db::Store;

pub fn run<W: Write>(writer: &mut W, store: &Store, limit: usize) -> Result<()> {
    let recent = store.recent_violations(limit)?;
    tracing::debug!(limit, returned = recent.len(), "summary query");
    writeln!(writer, "{}", serde_json::to_string_pretty(&recent)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use rc_core::{RoadRules, Scenario, Violation, ViolationKind};

    fn seeded_store() -> Store {
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
                        kind: ViolationKind::Tailgating,
                        time: "00:01.0".to_string(),
                        details: "5.0 m < 10.0 m".to_string(),
                    },
                ],
            )
            .unwrap();
        store
    }

    #[test]
    fn summary_lists_newest_first() {
        let store = seeded_store();
        let mut output = Vec::new();
        run(&mut output, &store, 20).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output.trim_end(), @r#"
        [
          {
            "scenario_id": 1,
            "time": "00:01.0",
            "type": "TAILGATING",
            "details": "5.0 m < 10.0 m"
          },
          {
            "scenario_id": 1,
            "time": "00:00.0",
            "type": "SPEEDING",
            "details": "70.0 mph in 60 mph zone"
          }
        ]
        "#);
    }

    #[test]
    fn summary_respects_the_limit() {
        let store = seeded_store();
        let mut output = Vec::new();
        run(&mut output, &store, 1).unwrap();

        let rows: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0]["type"], "TAILGATING");
    }

    #[test]
    fn summary_of_empty_store_is_an_empty_list() {
        let store = Store::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &store, 20).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.trim_end(), "[]");
    }
}
