//! Tenant directory: the per-tenant record the admission gate reads.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campuserp_core::TenantId;

use crate::stages::ACTIVATED_STAGE;
use crate::store::StoreError;

/// Lifecycle status of a tenant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    /// Mid-setup: non-exempt requests are blocked by the gate.
    Setup,
    /// Fully onboarded.
    Active,
}

/// Directory entry for one tenant.
///
/// `onboarding_stage` mirrors the onboarding record's current stage so the
/// gate can answer from a single read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantRecord {
    pub tenant_id: TenantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub status: TenantStatus,
    pub onboarding_stage: u8,
    pub updated_at: DateTime<Utc>,
}

impl TenantRecord {
    pub fn in_setup(tenant_id: TenantId, stage: u8, now: DateTime<Utc>) -> Self {
        Self {
            tenant_id,
            name: None,
            status: TenantStatus::Setup,
            onboarding_stage: stage,
            updated_at: now,
        }
    }

    pub fn active(tenant_id: TenantId, now: DateTime<Utc>) -> Self {
        Self {
            tenant_id,
            name: None,
            status: TenantStatus::Active,
            onboarding_stage: ACTIVATED_STAGE,
            updated_at: now,
        }
    }
}

/// Read/write access to tenant records.
///
/// Reads are point-in-time snapshots; the gate tolerates staleness measured
/// in milliseconds since onboarding transitions are human-paced.
pub trait TenantDirectory: Send + Sync {
    fn get(&self, tenant_id: &TenantId) -> Result<Option<TenantRecord>, StoreError>;

    fn upsert(&self, record: TenantRecord) -> Result<(), StoreError>;
}

impl<S> TenantDirectory for Arc<S>
where
    S: TenantDirectory + ?Sized,
{
    fn get(&self, tenant_id: &TenantId) -> Result<Option<TenantRecord>, StoreError> {
        (**self).get(tenant_id)
    }

    fn upsert(&self, record: TenantRecord) -> Result<(), StoreError> {
        (**self).upsert(record)
    }
}

/// In-memory directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryTenantDirectory {
    inner: RwLock<HashMap<TenantId, TenantRecord>>,
}

impl InMemoryTenantDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TenantDirectory for InMemoryTenantDirectory {
    fn get(&self, tenant_id: &TenantId) -> Result<Option<TenantRecord>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::unavailable("tenant directory lock poisoned"))?;
        Ok(map.get(tenant_id).cloned())
    }

    fn upsert(&self, record: TenantRecord) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::unavailable("tenant directory lock poisoned"))?;
        map.insert(record.tenant_id.clone(), record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_then_get_round_trips() {
        let dir = InMemoryTenantDirectory::new();
        let tenant = TenantId::new("U1");

        assert!(dir.get(&tenant).unwrap().is_none());

        dir.upsert(TenantRecord::in_setup(tenant.clone(), 2, Utc::now()))
            .unwrap();

        let rec = dir.get(&tenant).unwrap().unwrap();
        assert_eq!(rec.status, TenantStatus::Setup);
        assert_eq!(rec.onboarding_stage, 2);
    }
}
