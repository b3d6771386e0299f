//! Violations command: one scenario, one violation type, drive order.

use std::io::Write;

use anyhow::Result;

use rc_core::ViolationKind;
use rc_db::Store;

pub fn run<W: Write>(
    writer: &mut W,
    store: &Store,
    scenario_id: i64,
    kind: ViolationKind,
) -> Result<()> {
    let rows = store.violations_by_type(scenario_id, kind.as_str())?;
    tracing::debug!(scenario_id, %kind, returned = rows.len(), "by-type query");
    writeln!(writer, "{}", serde_json::to_string_pretty(&rows)?)?;
    Ok(())
}
