//! Infrastructure wiring and the representative domain read models.
//!
//! The student/fee stores exist to demonstrate the pipeline contract end to
//! end: handlers filter by whatever the *effective* query says, never by
//! re-deriving tenant scope themselves.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campuserp_audit::{AuditRecorder, AuditStore, InMemoryAuditStore};
use campuserp_auth::RoleHierarchy;
use campuserp_core::{DepartmentId, TenantId};
use campuserp_onboarding::{InMemoryOnboardingStore, InMemoryTenantDirectory, OnboardingService};
use campuserp_pipeline::AdmissionPipeline;

use crate::policy::PolicyTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: Uuid,
    pub university_id: TenantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<DepartmentId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// In-memory student read model for dev and black-box tests.
#[derive(Debug, Default)]
pub struct StudentStore {
    records: RwLock<Vec<StudentRecord>>,
}

impl StudentStore {
    pub fn insert(&self, record: StudentRecord) {
        if let Ok(mut records) = self.records.write() {
            records.push(record);
        }
    }

    /// List students for a tenant, optionally narrowed to one department.
    pub fn list(&self, tenant: Option<&str>, department: Option<&str>) -> Vec<StudentRecord> {
        let Ok(records) = self.records.read() else {
            return Vec::new();
        };
        records
            .iter()
            .filter(|r| tenant.is_none_or(|t| r.university_id.as_str() == t))
            .filter(|r| {
                department.is_none_or(|d| {
                    r.department_id.as_ref().is_some_and(|rd| rd.as_str() == d)
                })
            })
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeRecord {
    pub university_id: TenantId,
    pub item: String,
    /// Amount in smallest currency unit.
    pub amount: u64,
}

/// In-memory fee schedule read model.
#[derive(Debug, Default)]
pub struct FeeStore {
    records: RwLock<Vec<FeeRecord>>,
}

impl FeeStore {
    pub fn insert(&self, record: FeeRecord) {
        if let Ok(mut records) = self.records.write() {
            records.push(record);
        }
    }

    pub fn list(&self, tenant: Option<&str>) -> Vec<FeeRecord> {
        let Ok(records) = self.records.read() else {
            return Vec::new();
        };
        records
            .iter()
            .filter(|r| tenant.is_none_or(|t| r.university_id.as_str() == t))
            .cloned()
            .collect()
    }
}

pub struct AppServices {
    pub pipeline: AdmissionPipeline,
    pub policies: PolicyTable,
    pub onboarding: OnboardingService,
    pub directory: Arc<InMemoryTenantDirectory>,
    pub audit_store: Arc<dyn AuditStore>,
    pub recorder: AuditRecorder,
    pub students: StudentStore,
    pub fees: FeeStore,
}

pub fn build_services() -> AppServices {
    let directory = Arc::new(InMemoryTenantDirectory::new());
    let onboarding_store = Arc::new(InMemoryOnboardingStore::new());
    let audit_store: Arc<dyn AuditStore> = Arc::new(InMemoryAuditStore::new());

    AppServices {
        pipeline: AdmissionPipeline::new(RoleHierarchy::standard(), directory.clone()),
        policies: PolicyTable::standard(),
        onboarding: OnboardingService::new(onboarding_store, directory.clone()),
        directory,
        recorder: AuditRecorder::new(audit_store.clone()),
        audit_store,
        students: StudentStore::default(),
        fees: FeeStore::default(),
    }
}
