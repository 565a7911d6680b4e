//! YAML export of a household snapshot
//!
//! Same content as the JSON export, for reading by people.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::export::json::HouseholdSnapshot;
use crate::models::HouseholdId;
use crate::storage::Storage;

fn export_err(e: impl ToString) -> LedgerError {
    LedgerError::Export(e.to_string())
}

/// Write the household snapshot as YAML with a short comment header
pub fn export_household_yaml<W: Write>(
    storage: &Storage,
    household_id: HouseholdId,
    writer: &mut W,
) -> LedgerResult<()> {
    let snapshot = HouseholdSnapshot::from_storage(storage, household_id)?;

    writeln!(writer, "# Household ledger export: {}", snapshot.household.name).map_err(export_err)?;
    writeln!(writer, "# Generated: {}", snapshot.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", snapshot.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &snapshot).map_err(export_err)?;

    Ok(())
}

/// Read a YAML snapshot back and validate it
pub fn read_yaml_snapshot(yaml_str: &str) -> LedgerResult<HouseholdSnapshot> {
    let snapshot: HouseholdSnapshot = serde_yaml::from_str(yaml_str).map_err(export_err)?;
    snapshot.validate().map_err(LedgerError::Export)?;
    Ok(snapshot)
}
