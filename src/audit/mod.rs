//! Append-only audit log
//!
//! Every create, update and delete that goes through a service is recorded
//! with before/after snapshots as one JSON line in `audit.log`.

mod entry;
mod logger;

pub use entry::{changed_fields, AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
