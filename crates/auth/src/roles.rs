//! Role set used for RBAC.
//!
//! Roles are a closed enum rather than opaque strings: the set is fixed at
//! deploy time and privilege comparisons go through [`crate::RoleHierarchy`],
//! never through string matching in handlers.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role identifier used for RBAC.
///
/// Wire names follow the token format the identity layer emits
/// (`SUPER_ADMIN`, `HOD`, ...).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Platform operator. The only role that may act without a tenant.
    #[serde(rename = "SUPER_ADMIN")]
    SuperAdmin,

    /// Administrator of a single university.
    #[serde(rename = "UNIVERSITY_ADMIN")]
    UniversityAdmin,

    /// Head of department; queries are additionally scoped to the department.
    #[serde(rename = "HOD")]
    DepartmentHead,

    #[serde(rename = "FACULTY")]
    Faculty,

    #[serde(rename = "STAFF")]
    Staff,

    #[serde(rename = "STUDENT")]
    Student,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::UniversityAdmin,
        Role::DepartmentHead,
        Role::Faculty,
        Role::Staff,
        Role::Student,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::UniversityAdmin => "UNIVERSITY_ADMIN",
            Role::DepartmentHead => "HOD",
            Role::Faculty => "FACULTY",
            Role::Staff => "STAFF",
            Role::Student => "STUDENT",
        }
    }

    pub fn is_super(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "UNIVERSITY_ADMIN" => Ok(Role::UniversityAdmin),
            "HOD" => Ok(Role::DepartmentHead),
            "FACULTY" => Ok(Role::Faculty),
            "STAFF" => Ok(Role::Staff),
            "STUDENT" => Ok(Role::Student),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
