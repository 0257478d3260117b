//! Audit record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campuserp_auth::Principal;
use campuserp_core::{SubjectId, TenantId};
use campuserp_pipeline::{Method, RequestDescriptor};

/// What a mutation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    #[serde(untagged)]
    Custom(String),
}

impl AuditAction {
    pub fn from_method(method: Method) -> Option<Self> {
        match method {
            Method::Post => Some(AuditAction::Create),
            Method::Put | Method::Patch => Some(AuditAction::Update),
            Method::Delete => Some(AuditAction::Delete),
            Method::Get => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Custom(s) => s,
        }
    }
}

impl From<&str> for AuditAction {
    fn from(value: &str) -> Self {
        match value {
            "CREATE" => AuditAction::Create,
            "UPDATE" => AuditAction::Update,
            "DELETE" => AuditAction::Delete,
            other => AuditAction::Custom(other.to_string()),
        }
    }
}

/// Immutable trace of one mutating operation.
///
/// Written exactly once by the recorder; read by the behavioral monitor and
/// the audit listing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: Uuid,
    pub action: AuditAction,

    /// The module addressed: the first path segment of the endpoint.
    pub module: String,

    pub actor_id: SubjectId,
    pub actor_name: String,

    /// Absent only for super-role actors acting platform-wide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,

    pub endpoint: String,
    pub method: Method,

    /// Best-effort copy of the effective request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,

    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Build the record for one admitted mutating request.
    ///
    /// Returns `None` for non-mutating verbs or requests outside any module.
    pub fn for_request(
        principal: &Principal,
        request: &RequestDescriptor,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let action = AuditAction::from_method(request.method)?;
        let module = request.module()?.to_string();

        Some(Self {
            id: Uuid::now_v7(),
            action,
            module,
            actor_id: principal.subject_id,
            actor_name: principal.actor_name(),
            tenant_id: principal.tenant_id.clone(),
            endpoint: request.path.clone(),
            method: request.method,
            payload: request.body.clone(),
            recorded_at: now,
        })
    }
}
