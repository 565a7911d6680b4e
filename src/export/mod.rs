//! Household data export
//!
//! - JSON: machine-readable snapshot of one household
//! - YAML: the same snapshot for reading by people
//! - CSV: the household's installments, spreadsheet-compatible

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_installments_csv;
pub use json::{export_household_json, read_json_snapshot, HouseholdSnapshot, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_household_yaml, read_yaml_snapshot};
