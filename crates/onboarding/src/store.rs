//! Onboarding record store.
//!
//! The one write on the synchronous request path is the stage submission;
//! it must be serialized per tenant. The store contract expresses that as a
//! conditional replace: the write lands only if the stored record's
//! `current_stage` still equals the value the caller read. Two concurrent
//! submissions for the same stage cannot both win the advance.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use thiserror::Error;

use campuserp_core::TenantId;

use crate::record::OnboardingRecord;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The conditional replace lost: someone else advanced the record.
    #[error("stale onboarding record: expected stage {expected}, found {actual}")]
    StaleRecord { expected: u8, actual: u8 },

    /// Store unreachable or corrupt (infrastructure fault).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

pub trait OnboardingStore: Send + Sync {
    fn load(&self, tenant_id: &TenantId) -> Result<Option<OnboardingRecord>, StoreError>;

    /// Load the tenant's record, creating the stage-1 default on first touch.
    fn load_or_create(
        &self,
        tenant_id: &TenantId,
        now: DateTime<Utc>,
    ) -> Result<OnboardingRecord, StoreError>;

    /// Replace the stored record only if its `current_stage` still equals
    /// `expected_current` (the value the caller read before mutating its
    /// copy). Returns [`StoreError::StaleRecord`] on a lost race.
    fn replace_if_current(
        &self,
        record: OnboardingRecord,
        expected_current: u8,
    ) -> Result<(), StoreError>;
}

impl<S> OnboardingStore for Arc<S>
where
    S: OnboardingStore + ?Sized,
{
    fn load(&self, tenant_id: &TenantId) -> Result<Option<OnboardingRecord>, StoreError> {
        (**self).load(tenant_id)
    }

    fn load_or_create(
        &self,
        tenant_id: &TenantId,
        now: DateTime<Utc>,
    ) -> Result<OnboardingRecord, StoreError> {
        (**self).load_or_create(tenant_id, now)
    }

    fn replace_if_current(
        &self,
        record: OnboardingRecord,
        expected_current: u8,
    ) -> Result<(), StoreError> {
        (**self).replace_if_current(record, expected_current)
    }
}

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryOnboardingStore {
    inner: RwLock<HashMap<TenantId, OnboardingRecord>>,
}

impl InMemoryOnboardingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OnboardingStore for InMemoryOnboardingStore {
    fn load(&self, tenant_id: &TenantId) -> Result<Option<OnboardingRecord>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::unavailable("onboarding store lock poisoned"))?;
        Ok(map.get(tenant_id).cloned())
    }

    fn load_or_create(
        &self,
        tenant_id: &TenantId,
        now: DateTime<Utc>,
    ) -> Result<OnboardingRecord, StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::unavailable("onboarding store lock poisoned"))?;
        Ok(map
            .entry(tenant_id.clone())
            .or_insert_with(|| OnboardingRecord::new(tenant_id.clone(), now))
            .clone())
    }

    fn replace_if_current(
        &self,
        record: OnboardingRecord,
        expected_current: u8,
    ) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::unavailable("onboarding store lock poisoned"))?;

        if let Some(existing) = map.get(&record.tenant_id) {
            if existing.current_stage != expected_current {
                return Err(StoreError::StaleRecord {
                    expected: expected_current,
                    actual: existing.current_stage,
                });
            }
        }

        map.insert(record.tenant_id.clone(), record);
        Ok(())
    }
}
