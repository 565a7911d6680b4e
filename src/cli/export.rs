//! CLI command for data export
//!
//! Writes the active user's household to a file, by default under the
//! export directory.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::ValueEnum;

use super::today;
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{export_household_json, export_household_yaml, export_installments_csv};
use crate::services::HouseholdService;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (installments only)
    Csv,
    /// JSON format (whole household)
    Json,
    /// YAML format (whole household, human-readable)
    Yaml,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    format: ExportFormat,
    output: Option<PathBuf>,
    pretty: bool,
) -> LedgerResult<()> {
    let user_id = settings.require_active_user()?;
    let household = HouseholdService::new(storage).my_household(user_id)?.household;

    let output = match output {
        Some(path) => path,
        None => {
            let dir = storage.paths().export_dir();
            std::fs::create_dir_all(&dir).map_err(|e| {
                LedgerError::Export(format!("Failed to create {}: {}", dir.display(), e))
            })?;
            dir.join(format!("household-{}.{}", today(), format.extension()))
        }
    };

    let file = File::create(&output).map_err(|e| {
        LedgerError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Csv => {
            let count = export_installments_csv(storage, household.id, &mut writer)?;
            println!("Exported {} installments to: {}", count, output.display());
        }
        ExportFormat::Json => {
            export_household_json(storage, household.id, &mut writer, pretty)?;
            println!("Household exported to: {}", output.display());
        }
        ExportFormat::Yaml => {
            export_household_yaml(storage, household.id, &mut writer)?;
            println!("Household exported to: {}", output.display());
        }
    }

    writer
        .flush()
        .map_err(|e| LedgerError::Export(format!("Failed to write {}: {}", output.display(), e)))?;

    Ok(())
}
