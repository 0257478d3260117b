//! Auto-scoping: silent tenant/department narrowing.
//!
//! Runs after isolation has confirmed any present tenant field is
//! consistent, so this stage only ever fills gaps. It returns a new
//! effective request rather than mutating the inbound one, and is
//! best-effort enrichment with no failure mode.

use serde_json::Value;

use campuserp_auth::{Principal, Role};

use crate::request::{DEPARTMENT_FIELD, RequestDescriptor, TENANT_FIELD};

/// Produce the effective request forwarded to the domain handler.
///
/// For non-super principals, inject the principal's tenant into the query
/// and into a present JSON-object body when the field is absent; for the
/// department-head role, additionally inject the department into the query.
/// Present fields are never overwritten, which also makes this idempotent.
pub fn scope_request(principal: &Principal, request: RequestDescriptor) -> RequestDescriptor {
    if principal.is_super() {
        return request;
    }

    let Some(tenant) = principal.tenant_id.as_ref() else {
        // Isolation would have denied a tenant-less non-super principal;
        // nothing sensible to inject here.
        return request;
    };

    let mut request = request;

    request
        .query
        .entry(TENANT_FIELD.to_string())
        .or_insert_with(|| Value::String(tenant.as_str().to_string()));

    if let Some(Value::Object(body)) = request.body.as_mut() {
        body.entry(TENANT_FIELD.to_string())
            .or_insert_with(|| Value::String(tenant.as_str().to_string()));
    }

    if principal.role == Role::DepartmentHead {
        if let Some(department) = principal.department_id.as_ref() {
            request
                .query
                .entry(DEPARTMENT_FIELD.to_string())
                .or_insert_with(|| Value::String(department.as_str().to_string()));
        }
    }

    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Method;
    use campuserp_core::{DepartmentId, SubjectId, TenantId};
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

    #[test]
    fn hod_gets_tenant_and_department_injected() {
        // Scenario: HOD of U1/D9 requests GET /students with no params.
        let p = principal(Role::DepartmentHead, Some("U1"), Some("D9"));
        let req = RequestDescriptor::new(Method::Get, "/students");

        let scoped = scope_request(&p, req);
        assert_eq!(scoped.query.get(TENANT_FIELD), Some(&json!("U1")));
        assert_eq!(scoped.query.get(DEPARTMENT_FIELD), Some(&json!("D9")));
    }

    #[test]
    fn non_hod_roles_only_get_tenant() {
        let p = principal(Role::Student, Some("U1"), None);
        let scoped = scope_request(&p, RequestDescriptor::new(Method::Get, "/students"));
        assert_eq!(scoped.query.get(TENANT_FIELD), Some(&json!("U1")));
        assert!(!scoped.query.contains_key(DEPARTMENT_FIELD));
    }

    #[test]
    fn present_fields_are_never_overwritten() {
        // Isolation has already confirmed a present value is consistent.
        let p = principal(Role::DepartmentHead, Some("U1"), Some("D9"));
        let req = RequestDescriptor::new(Method::Get, "/students")
            .with_query(DEPARTMENT_FIELD, "D4");

        let scoped = scope_request(&p, req);
        assert_eq!(scoped.query.get(DEPARTMENT_FIELD), Some(&json!("D4")));
    }

    #[test]
    fn body_objects_are_scoped_too() {
        let p = principal(Role::Staff, Some("U1"), None);
        let req = RequestDescriptor::new(Method::Post, "/students")
            .with_body(json!({"name": "Ravi"}));

        let scoped = scope_request(&p, req);
        assert_eq!(
            scoped.body.unwrap().get(TENANT_FIELD),
            Some(&json!("U1"))
        );
    }

    #[test]
    fn scoping_is_idempotent() {
        let p = principal(Role::DepartmentHead, Some("U1"), Some("D9"));
        let req = RequestDescriptor::new(Method::Post, "/students")
            .with_body(json!({"name": "Ravi"}));

        let once = scope_request(&p, req);
        let twice = scope_request(&p, once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn super_role_is_left_untouched() {
        let p = principal(Role::SuperAdmin, None, None);
        let req = RequestDescriptor::new(Method::Get, "/students");
        let scoped = scope_request(&p, req.clone());
        assert_eq!(scoped, req);
    }
}
