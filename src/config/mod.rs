//! Configuration module for the household ledger
//!
//! This module provides configuration management including:
//! - data directory resolution
//! - user settings persistence

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::{NotificationSettings, Settings};
