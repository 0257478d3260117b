//! Structured admission outcomes.
//!
//! Denials are client-class results of a correctly functioning policy and
//! carry a stable kind tag; `StoreUnavailable` is the distinct fault class
//! so callers never mistake infrastructure failure for "access denied".

use serde::{Deserialize, Serialize};
use thiserror::Error;

use campuserp_auth::Role;

/// Which inbound surface carried the offending tenant id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TenantSurface {
    Query,
    Body,
    /// The id segment of a `/universities/{id}` route.
    ResourceId,
}

impl TenantSurface {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantSurface::Query => "query",
            TenantSurface::Body => "body",
            TenantSurface::ResourceId => "resource id",
        }
    }
}

impl core::fmt::Display for TenantSurface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Caller's rank satisfies no member of the operation's role set.
    #[error("role is not permitted to invoke this operation")]
    ForbiddenRole { required: Vec<Role> },

    /// A tenant id on the request differs from the principal's.
    #[error("cross-tenant access denied: {surface} carried tenant '{presented}'")]
    TenantMismatch {
        surface: TenantSurface,
        presented: String,
    },

    /// A non-super principal with no tenant is never valid.
    #[error("cross-tenant access denied: principal has no tenant")]
    NoTenant,

    /// The caller's tenant is still mid-setup.
    #[error("tenant onboarding incomplete: currently at stage {current_stage}")]
    OnboardingIncomplete { current_stage: u8, redirect: String },

    /// Tenant state store unreachable: a fault, not a policy decision.
    #[error("tenant state store unavailable: {0}")]
    StoreUnavailable(String),
}

impl PipelineError {
    /// Stable kind tag exposed on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::ForbiddenRole { .. } => "FORBIDDEN_ROLE",
            PipelineError::TenantMismatch { .. } => "FORBIDDEN_TENANT_MISMATCH",
            PipelineError::NoTenant => "FORBIDDEN_NO_TENANT",
            PipelineError::OnboardingIncomplete { .. } => "ONBOARDING_INCOMPLETE",
            PipelineError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// True for policy denials, false for faults.
    pub fn is_denial(&self) -> bool {
        !matches!(self, PipelineError::StoreUnavailable(_))
    }
}
