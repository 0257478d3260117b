//! The authenticated identity attached to one request.

use serde::{Deserialize, Serialize};

use campuserp_core::{DepartmentId, SubjectId, TenantId};

use crate::Role;

/// A fully resolved principal for authorization decisions.
///
/// Produced per request by the token layer and never persisted by this
/// subsystem. Invariant: every non-super principal carries `Some(tenant_id)`;
/// claim validation rejects tokens that violate it, and the isolation
/// enforcer denies any that slip through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub subject_id: SubjectId,

    /// Display name carried through to audit records.
    pub display_name: Option<String>,

    pub role: Role,

    /// None is only legitimate for the platform super role.
    pub tenant_id: Option<TenantId>,

    /// Meaningful for the department-head role.
    pub department_id: Option<DepartmentId>,
}

impl Principal {
    pub fn is_super(&self) -> bool {
        self.role.is_super()
    }

    pub fn is_tenant_bound(&self) -> bool {
        self.tenant_id.is_some()
    }

    /// Name recorded in audit entries when the token carried none.
    pub fn actor_name(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.subject_id.to_string())
    }
}
