//! User settings for the household ledger
//!
//! Manages preferences including the installment rounding policy, notification
//! de-duplication and the active (authenticated) user of the CLI.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::engine::billing::InstallmentRounding;
use crate::error::LedgerError;
use crate::models::UserId;

/// Notification dispatch preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Drop a notification already sent for the same user, entity, type and
    /// title during this process
    #[serde(default)]
    pub deduplicate: bool,
}

/// User settings for the household ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub installment_rounding: InstallmentRounding,

    #[serde(default)]
    pub notifications: NotificationSettings,

    /// The user the CLI acts as
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_user: Option<UserId>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            installment_rounding: InstallmentRounding::default(),
            notifications: NotificationSettings::default(),
            active_user: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// The active user, or an error telling the CLI user to pick one
    pub fn require_active_user(&self) -> Result<UserId, LedgerError> {
        self.active_user.ok_or_else(|| {
            LedgerError::Config("No active user; run 'household user use <id>' first".into())
        })
    }
}
