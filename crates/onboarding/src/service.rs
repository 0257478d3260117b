//! Onboarding operations: status, stage submission, activation.
//!
//! The service owns the read-validate-conditionally-write cycle around the
//! record and mirrors the current stage onto the tenant directory so the
//! admission gate answers from one read.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use campuserp_core::TenantId;

use crate::error::OnboardingError;
use crate::record::OnboardingRecord;
use crate::stages::StagePayload;
use crate::store::{OnboardingStore, StoreError};
use crate::tenant::{TenantDirectory, TenantRecord, TenantStatus};

pub struct OnboardingService {
    store: Arc<dyn OnboardingStore>,
    directory: Arc<dyn TenantDirectory>,
}

impl OnboardingService {
    pub fn new(store: Arc<dyn OnboardingStore>, directory: Arc<dyn TenantDirectory>) -> Self {
        Self { store, directory }
    }

    /// Current onboarding record, created lazily on first query.
    pub fn status(&self, tenant_id: &TenantId) -> Result<OnboardingRecord, OnboardingError> {
        let record = self
            .store
            .load_or_create(tenant_id, Utc::now())
            .map_err(map_store_fault)?;
        self.mirror(&record, Utc::now())?;
        Ok(record)
    }

    /// Submit the payload for one stage.
    ///
    /// The raw body is parsed into the typed payload for `stage` at this
    /// boundary; skipping ahead of `current_stage` is rejected with both
    /// numbers; the write only lands if no concurrent submission advanced
    /// the record since it was read.
    pub fn submit_stage(
        &self,
        tenant_id: &TenantId,
        stage: u8,
        body: serde_json::Value,
    ) -> Result<OnboardingRecord, OnboardingError> {
        let payload = StagePayload::parse(stage, body)
            .map_err(|e| OnboardingError::InvalidPayload(e.to_string()))?;

        let now = Utc::now();
        let mut record = self
            .store
            .load_or_create(tenant_id, now)
            .map_err(map_store_fault)?;
        let read_stage = record.current_stage;

        let advanced = record.submit(payload, now)?;

        self.store
            .replace_if_current(record.clone(), read_stage)
            .map_err(|e| match e {
                StoreError::StaleRecord { .. } => OnboardingError::Conflict,
                StoreError::Unavailable(msg) => OnboardingError::Store(msg),
            })?;

        self.mirror(&record, now)?;

        if advanced {
            info!(
                tenant = %tenant_id,
                stage,
                next_stage = record.current_stage,
                "onboarding stage completed"
            );
        }

        Ok(record)
    }

    /// Flip the tenant from setup to active.
    ///
    /// Re-validates every required stage and reports the complete violation
    /// list on failure. Idempotent once activated.
    pub fn activate(&self, tenant_id: &TenantId) -> Result<TenantRecord, OnboardingError> {
        let now = Utc::now();
        let mut record = self
            .store
            .load_or_create(tenant_id, now)
            .map_err(map_store_fault)?;

        if record.is_activated() {
            return self
                .directory
                .get(tenant_id)
                .map_err(map_store_fault)?
                .ok_or_else(|| OnboardingError::Store("activated tenant missing from directory".into()));
        }

        let violations = record.go_live_violations();
        if !violations.is_empty() {
            return Err(OnboardingError::GoLiveValidationFailed(violations));
        }

        let read_stage = record.current_stage;
        record.activate(now);
        self.store
            .replace_if_current(record, read_stage)
            .map_err(|e| match e {
                StoreError::StaleRecord { .. } => OnboardingError::Conflict,
                StoreError::Unavailable(msg) => OnboardingError::Store(msg),
            })?;

        let mut tenant = self
            .directory
            .get(tenant_id)
            .map_err(map_store_fault)?
            .unwrap_or_else(|| TenantRecord::active(tenant_id.clone(), now));
        tenant.status = TenantStatus::Active;
        tenant.onboarding_stage = crate::stages::ACTIVATED_STAGE;
        tenant.updated_at = now;
        self.directory
            .upsert(tenant.clone())
            .map_err(map_store_fault)?;

        info!(tenant = %tenant_id, "tenant activated");
        Ok(tenant)
    }

    /// Keep the directory's fast-path fields in sync with the record.
    fn mirror(&self, record: &OnboardingRecord, now: DateTime<Utc>) -> Result<(), OnboardingError> {
        let existing = self
            .directory
            .get(&record.tenant_id)
            .map_err(map_store_fault)?;

        // An already-active tenant is never demoted by late stage writes.
        if matches!(
            existing.as_ref().map(|t| t.status),
            Some(TenantStatus::Active)
        ) {
            return Ok(());
        }

        let mut tenant = existing.unwrap_or_else(|| {
            TenantRecord::in_setup(record.tenant_id.clone(), record.current_stage, now)
        });
        tenant.onboarding_stage = record.current_stage;
        tenant.updated_at = now;
        self.directory.upsert(tenant).map_err(map_store_fault)
    }
}

fn map_store_fault(e: StoreError) -> OnboardingError {
    OnboardingError::Store(e.to_string())
}
