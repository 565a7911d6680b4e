//! household-equity - shared household finances for two partners
//!
//! This library provides the core of the `household` application: two
//! members share a household, record what they earn and spend, and the
//! crate works out how shared expenses divide under the household's split
//! policy and who owes whom at the end of the month. Credit card
//! installments, category budgets and savings goals sit alongside.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (households, expenses, installments, ...)
//! - `engine`: Pure calculations (splits, equity, billing cycles, thresholds)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `export`: JSON, YAML and CSV export
//! - `cli` and `display`: the command line front end
//!
//! # Example
//!
//! ```rust,ignore
//! use household_equity::config::{paths::LedgerPaths, settings::Settings};
//! use household_equity::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
