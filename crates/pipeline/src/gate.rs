//! Onboarding gate.
//!
//! A tenant-wide circuit breaker, not a per-operation permission: while a
//! tenant's setup is incomplete, every non-exempt operation is blocked and
//! redirected into the onboarding workflow, independent of the caller's
//! role. Exempt routes keep a stuck tenant able to finish setup.

use std::sync::Arc;

use tracing::debug;

use campuserp_auth::Principal;
use campuserp_onboarding::{TenantDirectory, TenantStatus};

use crate::error::PipelineError;
use crate::pipeline::OperationPolicy;
use crate::request::RequestDescriptor;

/// Routes reachable while a tenant is mid-setup: authentication and the
/// onboarding workflow itself, plus liveness.
pub const DEFAULT_EXEMPT_PREFIXES: [&str; 3] = ["/auth", "/onboarding", "/health"];

pub struct OnboardingGate {
    directory: Arc<dyn TenantDirectory>,
    exempt_prefixes: Vec<String>,
}

impl OnboardingGate {
    pub fn new(directory: Arc<dyn TenantDirectory>) -> Self {
        Self {
            directory,
            exempt_prefixes: DEFAULT_EXEMPT_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn with_exempt_prefixes(mut self, prefixes: impl IntoIterator<Item = String>) -> Self {
        self.exempt_prefixes = prefixes.into_iter().collect();
        self
    }

    fn is_exempt_route(&self, request: &RequestDescriptor) -> bool {
        self.exempt_prefixes
            .iter()
            .any(|prefix| request.path.starts_with(prefix.as_str()))
    }

    /// Admission decision for one request.
    ///
    /// One point-in-time snapshot read of the tenant directory; staleness of
    /// milliseconds is acceptable since onboarding transitions are
    /// human-paced. A directory fault propagates as a fault, never as a
    /// denial.
    pub fn check(
        &self,
        principal: &Principal,
        request: &RequestDescriptor,
        policy: &OperationPolicy,
    ) -> Result<(), PipelineError> {
        if principal.is_super() {
            return Ok(());
        }

        if policy.onboarding_exempt || self.is_exempt_route(request) {
            return Ok(());
        }

        // A principal not yet bound to a tenant passes the gate; the
        // isolation stage still denies it any tenant-touching request.
        let Some(tenant_id) = principal.tenant_id.as_ref() else {
            return Ok(());
        };

        let record = self
            .directory
            .get(tenant_id)
            .map_err(|e| PipelineError::StoreUnavailable(e.to_string()))?;

        match record {
            Some(tenant) if tenant.status == TenantStatus::Setup => {
                let current_stage = tenant.onboarding_stage;
                debug!(
                    tenant = %tenant_id,
                    current_stage,
                    path = %request.path,
                    "denied: tenant onboarding incomplete"
                );
                Err(PipelineError::OnboardingIncomplete {
                    current_stage,
                    redirect: format!("/onboarding/stages/{current_stage}"),
                })
            }
            // Active tenants pass, as do tenants the directory has never
            // seen: only an explicit setup status blocks.
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Method;
    use campuserp_auth::Role;
    use campuserp_core::{SubjectId, TenantId};
    use campuserp_onboarding::{InMemoryTenantDirectory, StoreError, TenantRecord};
    use chrono::Utc;

    fn principal(role: Role, tenant: Option<&str>) -> Principal {
        Principal {
            subject_id: SubjectId::new(),
            display_name: None,
            role,
            tenant_id: tenant.map(TenantId::new),
            department_id: None,
        }
    }

    fn gate_with(records: Vec<TenantRecord>) -> OnboardingGate {
        let directory = Arc::new(InMemoryTenantDirectory::new());
        for record in records {
            directory.upsert(record).unwrap();
        }
        OnboardingGate::new(directory)
    }

    #[test]
    fn setup_tenant_is_blocked_with_stage_and_redirect() {
        // Scenario: U1 in setup at stage 2; UNIVERSITY_ADMIN requests GET /fees.
        let gate = gate_with(vec![TenantRecord::in_setup(TenantId::new("U1"), 2, Utc::now())]);
        let p = principal(Role::UniversityAdmin, Some("U1"));
        let req = RequestDescriptor::new(Method::Get, "/fees");

        let err = gate.check(&p, &req, &OperationPolicy::open()).unwrap_err();
        assert_eq!(
            err,
            PipelineError::OnboardingIncomplete {
                current_stage: 2,
                redirect: "/onboarding/stages/2".into()
            }
        );
        assert_eq!(err.kind(), "ONBOARDING_INCOMPLETE");
    }

    #[test]
    fn active_tenant_passes() {
        let gate = gate_with(vec![TenantRecord::active(TenantId::new("U1"), Utc::now())]);
        let p = principal(Role::Student, Some("U1"));
        let req = RequestDescriptor::new(Method::Get, "/fees");
        assert!(gate.check(&p, &req, &OperationPolicy::open()).is_ok());
    }

    #[test]
    fn unknown_tenant_passes() {
        // Only an explicit setup status blocks.
        let gate = gate_with(vec![]);
        let p = principal(Role::Student, Some("U1"));
        let req = RequestDescriptor::new(Method::Get, "/fees");
        assert!(gate.check(&p, &req, &OperationPolicy::open()).is_ok());
    }

    #[test]
    fn super_role_bypasses_the_gate() {
        let gate = gate_with(vec![TenantRecord::in_setup(TenantId::new("U1"), 1, Utc::now())]);
        let p = Principal {
            subject_id: SubjectId::new(),
            display_name: None,
            role: Role::SuperAdmin,
            tenant_id: Some(TenantId::new("U1")),
            department_id: None,
        };
        let req = RequestDescriptor::new(Method::Get, "/fees");
        assert!(gate.check(&p, &req, &OperationPolicy::open()).is_ok());
    }

    #[test]
    fn exempt_routes_stay_reachable_mid_setup() {
        let gate = gate_with(vec![TenantRecord::in_setup(TenantId::new("U1"), 3, Utc::now())]);
        let p = principal(Role::UniversityAdmin, Some("U1"));

        for path in ["/onboarding/status", "/onboarding/stages/3", "/auth/token"] {
            let req = RequestDescriptor::new(Method::Post, path);
            assert!(gate.check(&p, &req, &OperationPolicy::open()).is_ok(), "{path}");
        }
    }

    #[test]
    fn exempt_flag_on_the_operation_passes() {
        let gate = gate_with(vec![TenantRecord::in_setup(TenantId::new("U1"), 1, Utc::now())]);
        let p = principal(Role::UniversityAdmin, Some("U1"));
        let req = RequestDescriptor::new(Method::Get, "/fees");
        assert!(gate.check(&p, &req, &OperationPolicy::open().exempt()).is_ok());
    }

    #[test]
    fn gate_allows_principal_without_tenant() {
        // Documented edge case: a principal lacking a tenant binding passes
        // the gate regardless of any tenant's stage; isolation still denies
        // it tenant-touching requests.
        let gate = gate_with(vec![TenantRecord::in_setup(TenantId::new("U1"), 1, Utc::now())]);
        let p = principal(Role::Student, None);
        let req = RequestDescriptor::new(Method::Get, "/fees");
        assert!(gate.check(&p, &req, &OperationPolicy::open()).is_ok());
    }

    #[test]
    fn directory_fault_is_a_fault_not_a_denial() {
        struct BrokenDirectory;
        impl TenantDirectory for BrokenDirectory {
            fn get(&self, _: &TenantId) -> Result<Option<TenantRecord>, StoreError> {
                Err(StoreError::unavailable("directory down"))
            }
            fn upsert(&self, _: TenantRecord) -> Result<(), StoreError> {
                Err(StoreError::unavailable("directory down"))
            }
        }

        let gate = OnboardingGate::new(Arc::new(BrokenDirectory));
        let p = principal(Role::Student, Some("U1"));
        let req = RequestDescriptor::new(Method::Get, "/fees");

        let err = gate.check(&p, &req, &OperationPolicy::open()).unwrap_err();
        assert!(!err.is_denial());
    }
}
