//! Ordered composition of the admission stages.
//!
//! The stage order is a contract, not an accident of wiring:
//! gate → role check → tenant isolation → auto-scoping. In particular,
//! isolation must validate before scoping may fill gaps, and a denied
//! request is never scoped.

use std::sync::Arc;

use campuserp_auth::{Principal, Role, RoleHierarchy};
use campuserp_onboarding::TenantDirectory;

use crate::error::PipelineError;
use crate::gate::OnboardingGate;
use crate::isolation::enforce_tenant_isolation;
use crate::request::RequestDescriptor;
use crate::scoping::scope_request;

/// Declared metadata for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperationPolicy {
    /// Roles that may invoke the operation; empty means open to any
    /// authenticated principal. Disjunctive: the caller passes if its rank
    /// reaches any member.
    pub required_roles: Vec<Role>,

    /// Reachable while the tenant is still mid-setup.
    pub onboarding_exempt: bool,
}

impl OperationPolicy {
    pub fn open() -> Self {
        Self::default()
    }

    pub fn require(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            required_roles: roles.into_iter().collect(),
            onboarding_exempt: false,
        }
    }

    pub fn exempt(mut self) -> Self {
        self.onboarding_exempt = true;
        self
    }
}

/// The request-admission pipeline every domain operation sits behind.
pub struct AdmissionPipeline {
    hierarchy: RoleHierarchy,
    gate: OnboardingGate,
}

impl AdmissionPipeline {
    pub fn new(hierarchy: RoleHierarchy, directory: Arc<dyn TenantDirectory>) -> Self {
        Self {
            hierarchy,
            gate: OnboardingGate::new(directory),
        }
    }

    /// Admit one request.
    ///
    /// On allow, returns the effective (possibly scoped) request to forward
    /// to the domain handler; on deny, a structured error with a stable
    /// kind tag and no scoping applied.
    pub fn admit(
        &self,
        principal: &Principal,
        policy: &OperationPolicy,
        request: RequestDescriptor,
    ) -> Result<RequestDescriptor, PipelineError> {
        self.gate.check(principal, &request, policy)?;

        if !self.hierarchy.permits(principal.role, &policy.required_roles) {
            return Err(PipelineError::ForbiddenRole {
                required: policy.required_roles.clone(),
            });
        }

        enforce_tenant_isolation(principal, &request)?;

        Ok(scope_request(principal, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Method, TENANT_FIELD};
    use campuserp_core::{DepartmentId, SubjectId, TenantId};
    use campuserp_onboarding::{InMemoryTenantDirectory, TenantRecord};
    use chrono::Utc;
    use serde_json::json;

    fn principal(role: Role, tenant: Option<&str>, department: Option<&str>) -> Principal {
        Principal {
            subject_id: SubjectId::new(),
            display_name: None,
            role,
            tenant_id: tenant.map(TenantId::new),
            department_id: department.map(DepartmentId::new),
        }
    }

    fn pipeline_with(records: Vec<TenantRecord>) -> AdmissionPipeline {
        let directory = Arc::new(InMemoryTenantDirectory::new());
        for record in records {
            directory.upsert(record).unwrap();
        }
        AdmissionPipeline::new(RoleHierarchy::standard(), directory)
    }

    #[test]
    fn allowed_request_comes_back_scoped() {
        let pipeline = pipeline_with(vec![]);
        let p = principal(Role::DepartmentHead, Some("U1"), Some("D9"));
        let req = RequestDescriptor::new(Method::Get, "/students");

        let effective = pipeline.admit(&p, &OperationPolicy::open(), req).unwrap();
        assert_eq!(effective.query.get(TENANT_FIELD), Some(&json!("U1")));
        assert_eq!(effective.query.get("departmentId"), Some(&json!("D9")));
    }

    #[test]
    fn insufficient_rank_is_denied() {
        let pipeline = pipeline_with(vec![]);
        let p = principal(Role::Student, Some("U1"), None);
        let req = RequestDescriptor::new(Method::Post, "/students");

        let err = pipeline
            .admit(&p, &OperationPolicy::require([Role::Staff]), req)
            .unwrap_err();
        assert_eq!(err.kind(), "FORBIDDEN_ROLE");
    }

    #[test]
    fn denied_request_is_never_scoped() {
        // Ordering contract: isolation validates before scoping mutates.
        // A cross-tenant query is denied; had scoping run first it would
        // have left the foreign id in place and passed it downstream.
        let pipeline = pipeline_with(vec![]);
        let p = principal(Role::Student, Some("U1"), None);
        let req = RequestDescriptor::new(Method::Get, "/students").with_query(TENANT_FIELD, "U2");

        let err = pipeline.admit(&p, &OperationPolicy::open(), req).unwrap_err();
        assert_eq!(err.kind(), "FORBIDDEN_TENANT_MISMATCH");
    }

    #[test]
    fn gate_runs_before_the_role_check() {
        // A caller who would also fail the role check sees the onboarding
        // denial: the gate is a tenant-wide circuit breaker evaluated first.
        let pipeline = pipeline_with(vec![TenantRecord::in_setup(
            TenantId::new("U1"),
            2,
            Utc::now(),
        )]);
        let p = principal(Role::Student, Some("U1"), None);
        let req = RequestDescriptor::new(Method::Get, "/fees");

        let err = pipeline
            .admit(&p, &OperationPolicy::require([Role::UniversityAdmin]), req)
            .unwrap_err();
        assert_eq!(err.kind(), "ONBOARDING_INCOMPLETE");
    }

    #[test]
    fn role_check_runs_before_isolation() {
        let pipeline = pipeline_with(vec![]);
        let p = principal(Role::Student, Some("U1"), None);
        let req = RequestDescriptor::new(Method::Get, "/students").with_query(TENANT_FIELD, "U2");

        let err = pipeline
            .admit(&p, &OperationPolicy::require([Role::UniversityAdmin]), req)
            .unwrap_err();
        assert_eq!(err.kind(), "FORBIDDEN_ROLE");
    }

    #[test]
    fn super_role_passes_everything_unscoped() {
        let pipeline = pipeline_with(vec![TenantRecord::in_setup(
            TenantId::new("U1"),
            1,
            Utc::now(),
        )]);
        let p = principal(Role::SuperAdmin, None, None);
        let req = RequestDescriptor::new(Method::Get, "/students").with_query(TENANT_FIELD, "U2");

        let effective = pipeline
            .admit(
                &p,
                &OperationPolicy::require([Role::UniversityAdmin]),
                req.clone(),
            )
            .unwrap();
        assert_eq!(effective, req);
    }
}
