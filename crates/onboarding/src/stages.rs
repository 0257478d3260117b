//! Typed per-stage payloads.
//!
//! Stage data is a tagged union keyed by stage number with a known shape per
//! stage, parsed at the boundary. Shape problems are rejected at submission;
//! content rules (minimum counts) are checked at activation so a tenant can
//! save partial work along the way.

use serde::{Deserialize, Serialize};

use campuserp_core::{DepartmentId, DomainError};

use crate::error::GoLiveViolation;

/// First real setup stage. Stage 0 is implicitly completed at creation.
pub const FIRST_STAGE: u8 = 1;

/// Last submittable stage (the optional data import).
pub const LAST_STAGE: u8 = 5;

/// Stages that must pass validation before go-live.
pub const REQUIRED_STAGES: [u8; 4] = [1, 2, 3, 4];

/// Terminal stage value once a tenant is activated.
pub const ACTIVATED_STAGE: u8 = 6;

/// Stage 1: institution profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionProfile {
    pub university_name: String,
    pub contact_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// One department seeded during setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSeed {
    pub id: DepartmentId,
    pub name: String,
}

/// Stage 2: departments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSetup {
    pub departments: Vec<DepartmentSeed>,
}

/// One staff member seeded during setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffSeed {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<DepartmentId>,
}

/// Stage 3: staff roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRoster {
    pub members: Vec<StaffSeed>,
}

/// Stage 4: module configuration (which platform modules the tenant runs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    pub enabled_modules: Vec<String>,
}

/// Stage 5: optional bulk data import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataImport {
    pub source: String,
    #[serde(default)]
    pub record_count: u64,
}

/// Payload for one onboarding stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StagePayload {
    Profile(InstitutionProfile),
    Departments(DepartmentSetup),
    Staff(StaffRoster),
    Modules(ModuleConfig),
    DataImport(DataImport),
}

impl StagePayload {
    /// The stage number this payload belongs to.
    pub fn stage(&self) -> u8 {
        match self {
            StagePayload::Profile(_) => 1,
            StagePayload::Departments(_) => 2,
            StagePayload::Staff(_) => 3,
            StagePayload::Modules(_) => 4,
            StagePayload::DataImport(_) => 5,
        }
    }

    /// Parse a raw submission body into the payload shape for `stage`.
    pub fn parse(stage: u8, value: serde_json::Value) -> Result<Self, DomainError> {
        let parsed = match stage {
            1 => serde_json::from_value(value).map(StagePayload::Profile),
            2 => serde_json::from_value(value).map(StagePayload::Departments),
            3 => serde_json::from_value(value).map(StagePayload::Staff),
            4 => serde_json::from_value(value).map(StagePayload::Modules),
            5 => serde_json::from_value(value).map(StagePayload::DataImport),
            other => {
                return Err(DomainError::validation(format!(
                    "unknown onboarding stage {other}"
                )));
            }
        };

        parsed.map_err(|e| DomainError::validation(format!("stage {stage} payload: {e}")))
    }

    /// Content rules checked at activation, not at submission.
    pub fn go_live_violations(&self) -> Vec<GoLiveViolation> {
        match self {
            StagePayload::Profile(p) => {
                let mut v = Vec::new();
                if p.university_name.trim().is_empty() {
                    v.push(GoLiveViolation::new(1, "institution name must not be empty"));
                }
                if p.contact_email.trim().is_empty() {
                    v.push(GoLiveViolation::new(1, "contact email must not be empty"));
                }
                v
            }
            StagePayload::Departments(d) => {
                if d.departments.is_empty() {
                    vec![GoLiveViolation::new(2, "at least 1 department is required")]
                } else {
                    Vec::new()
                }
            }
            StagePayload::Staff(s) => {
                if s.members.len() < 2 {
                    vec![GoLiveViolation::new(3, "at least 2 staff members are required")]
                } else {
                    Vec::new()
                }
            }
            StagePayload::Modules(m) => {
                if m.enabled_modules.is_empty() {
                    vec![GoLiveViolation::new(4, "module configuration must enable at least one module")]
                } else {
                    Vec::new()
                }
            }
            // The data import stage is skippable; a submitted import is never
            // a go-live blocker.
            StagePayload::DataImport(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_each_stage_shape() {
        let profile = StagePayload::parse(
            1,
            json!({"universityName": "U1 University", "contactEmail": "admin@u1.edu"}),
        )
        .unwrap();
        assert_eq!(profile.stage(), 1);

        let departments = StagePayload::parse(
            2,
            json!({"departments": [{"id": "D9", "name": "Physics"}]}),
        )
        .unwrap();
        assert_eq!(departments.stage(), 2);

        let import = StagePayload::parse(5, json!({"source": "legacy-csv"})).unwrap();
        assert_eq!(import.stage(), 5);
    }

    #[test]
    fn rejects_wrong_shape_at_the_boundary() {
        let err = StagePayload::parse(2, json!({"universityName": "nope"})).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_unknown_stage() {
        let err = StagePayload::parse(9, json!({})).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn empty_departments_violate_go_live() {
        let payload = StagePayload::parse(2, json!({"departments": []})).unwrap();
        let violations = payload.go_live_violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].stage, 2);
    }

    #[test]
    fn single_staff_member_violates_go_live() {
        let payload = StagePayload::parse(
            3,
            json!({"members": [{"name": "A", "email": "a@u1.edu"}]}),
        )
        .unwrap();
        assert_eq!(payload.go_live_violations().len(), 1);
    }
}
