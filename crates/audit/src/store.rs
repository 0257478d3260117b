//! Audit record store.
//!
//! Append-only: records are immutable once written. Queries are the read
//! surface for tenant/platform reporting and the behavioral monitor.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use campuserp_core::{SubjectId, TenantId};

use crate::record::{AuditAction, AuditRecord};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditStoreError {
    #[error("audit store unavailable: {0}")]
    Unavailable(String),
}

impl AuditStoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Filtered, read-only listing query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<SubjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<AuditAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl AuditQuery {
    fn matches(&self, record: &AuditRecord) -> bool {
        if let Some(tenant) = &self.tenant_id {
            if record.tenant_id.as_ref() != Some(tenant) {
                return false;
            }
        }
        if let Some(actor) = &self.actor_id {
            if record.actor_id != *actor {
                return false;
            }
        }
        if let Some(module) = &self.module {
            if record.module != *module {
                return false;
            }
        }
        if let Some(action) = &self.action {
            if record.action != *action {
                return false;
            }
        }
        if let Some(from) = self.from {
            if record.recorded_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.recorded_at >= to {
                return false;
            }
        }
        true
    }
}

/// Async audit persistence contract.
#[async_trait::async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one immutable record.
    async fn append(&self, record: AuditRecord) -> Result<(), AuditStoreError>;

    /// Records matching the filter, newest first.
    async fn query(&self, query: AuditQuery) -> Result<Vec<AuditRecord>, AuditStoreError>;
}

/// In-memory append-only store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    records: RwLock<Vec<AuditRecord>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn append(&self, record: AuditRecord) -> Result<(), AuditStoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| AuditStoreError::unavailable("audit store lock poisoned"))?;
        records.push(record);
        Ok(())
    }

    async fn query(&self, query: AuditQuery) -> Result<Vec<AuditRecord>, AuditStoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| AuditStoreError::unavailable("audit store lock poisoned"))?;

        let mut matched: Vec<AuditRecord> = records
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }
}
