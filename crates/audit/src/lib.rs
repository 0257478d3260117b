//! `campuserp-audit` — audit trail and abuse monitoring.
//!
//! The recorder persists a structured record for every mutating operation,
//! asynchronously and best-effort: observability must never become a
//! reliability hazard for the primary request. The monitor scans recorded
//! events on a timer for abuse heuristics and only ever alerts.

pub mod monitor;
pub mod record;
pub mod recorder;
pub mod store;

pub use monitor::{BehavioralMonitor, MonitorConfig, MonitorReport};
pub use record::{AuditAction, AuditRecord};
pub use recorder::AuditRecorder;
pub use store::{AuditQuery, AuditStore, AuditStoreError, InMemoryAuditStore};
