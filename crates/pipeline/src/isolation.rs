//! Tenant isolation enforcer.
//!
//! Validates every inbound surface where a tenant id could be smuggled in
//! (path, query and body), not just one. Read-only; the scoping stage runs
//! only after this check has passed.

use tracing::debug;

use campuserp_auth::Principal;

use crate::error::{PipelineError, TenantSurface};
use crate::request::RequestDescriptor;

/// Verify that no tenant ambiguity exists between the principal and the
/// request.
///
/// Rules, in order:
/// 1. the platform super role has global access;
/// 2. a non-super principal must carry a tenant;
/// 3. any tenant id present in path, query or body must equal the
///    principal's (verbatim string comparison);
/// 4. a route addressing the tenant collection by id must address the
///    principal's own tenant.
pub fn enforce_tenant_isolation(
    principal: &Principal,
    request: &RequestDescriptor,
) -> Result<(), PipelineError> {
    if principal.is_super() {
        return Ok(());
    }

    let Some(tenant) = principal.tenant_id.as_ref() else {
        debug!(subject = %principal.subject_id, path = %request.path, "denied: no tenant on principal");
        return Err(PipelineError::NoTenant);
    };

    let surfaces = [
        (TenantSurface::ResourceId, request.tenant_resource_id()),
        (TenantSurface::Query, request.tenant_in_query()),
        (TenantSurface::Body, request.tenant_in_body()),
    ];

    for (surface, candidate) in surfaces {
        if let Some(candidate) = candidate {
            if candidate != tenant.as_str() {
                debug!(
                    subject = %principal.subject_id,
                    path = %request.path,
                    %surface,
                    presented = candidate,
                    "denied: cross-tenant access"
                );
                return Err(PipelineError::TenantMismatch {
                    surface,
                    presented: candidate.to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Method, TENANT_FIELD};
    use campuserp_auth::Role;
    use campuserp_core::{SubjectId, TenantId};
    use serde_json::json;

    fn principal(role: Role, tenant: Option<&str>) -> Principal {
        Principal {
            subject_id: SubjectId::new(),
            display_name: None,
            role,
            tenant_id: tenant.map(TenantId::new),
            department_id: None,
        }
    }

    #[test]
    fn super_role_bypasses_all_checks() {
        let p = principal(Role::SuperAdmin, None);
        let req = RequestDescriptor::new(Method::Get, "/students").with_query(TENANT_FIELD, "U2");
        assert!(enforce_tenant_isolation(&p, &req).is_ok());
    }

    #[test]
    fn non_super_without_tenant_is_denied() {
        let p = principal(Role::Student, None);
        let req = RequestDescriptor::new(Method::Get, "/students");
        assert_eq!(
            enforce_tenant_isolation(&p, &req),
            Err(PipelineError::NoTenant)
        );
    }

    #[test]
    fn mismatched_tenant_in_query_is_denied() {
        // Scenario: STUDENT of U1 requests GET /students?universityId=U2.
        let p = principal(Role::Student, Some("U1"));
        let req = RequestDescriptor::new(Method::Get, "/students").with_query(TENANT_FIELD, "U2");

        let err = enforce_tenant_isolation(&p, &req).unwrap_err();
        assert_eq!(
            err,
            PipelineError::TenantMismatch {
                surface: TenantSurface::Query,
                presented: "U2".into()
            }
        );
        assert_eq!(err.kind(), "FORBIDDEN_TENANT_MISMATCH");
    }

    #[test]
    fn mismatched_tenant_in_body_is_denied() {
        let p = principal(Role::Staff, Some("U1"));
        let req = RequestDescriptor::new(Method::Post, "/students")
            .with_body(json!({(TENANT_FIELD): "U2", "name": "x"}));

        assert_eq!(
            enforce_tenant_isolation(&p, &req).unwrap_err(),
            PipelineError::TenantMismatch {
                surface: TenantSurface::Body,
                presented: "U2".into()
            }
        );
    }

    #[test]
    fn foreign_tenant_resource_id_is_denied() {
        let p = principal(Role::UniversityAdmin, Some("U1"));
        let req = RequestDescriptor::new(Method::Get, "/universities/U2");

        assert_eq!(
            enforce_tenant_isolation(&p, &req).unwrap_err(),
            PipelineError::TenantMismatch {
                surface: TenantSurface::ResourceId,
                presented: "U2".into()
            }
        );
    }

    #[test]
    fn own_tenant_on_any_surface_is_allowed() {
        let p = principal(Role::UniversityAdmin, Some("U1"));
        let req = RequestDescriptor::new(Method::Post, "/universities/U1")
            .with_query(TENANT_FIELD, "U1")
            .with_body(json!({(TENANT_FIELD): "U1"}));
        assert!(enforce_tenant_isolation(&p, &req).is_ok());
    }

    #[test]
    fn absent_tenant_fields_are_allowed() {
        let p = principal(Role::Student, Some("U1"));
        let req = RequestDescriptor::new(Method::Get, "/students");
        assert!(enforce_tenant_isolation(&p, &req).is_ok());
    }
}
