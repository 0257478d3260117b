//! Onboarding error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One unmet go-live precondition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoLiveViolation {
    pub stage: u8,
    pub requirement: String,
}

impl GoLiveViolation {
    pub fn new(stage: u8, requirement: impl Into<String>) -> Self {
        Self {
            stage,
            requirement: requirement.into(),
        }
    }
}

/// Failures of the onboarding operations.
///
/// Everything except `Store` is a client-class outcome of a correctly
/// functioning policy; `Store` is the distinct infrastructure-fault class.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OnboardingError {
    /// Submitting a stage ahead of the current one. Carries both numbers so
    /// the rejection is debuggable without log correlation.
    #[error("cannot skip ahead: submitted stage {attempted}, current stage is {current}")]
    StageSkipped { attempted: u8, current: u8 },

    /// Payload failed shape validation at the boundary.
    #[error("invalid stage payload: {0}")]
    InvalidPayload(String),

    /// Activation was attempted with unmet preconditions. The list is
    /// exhaustive, never truncated to the first failure.
    #[error("go-live validation failed: {} unmet requirement(s)", .0.len())]
    GoLiveValidationFailed(Vec<GoLiveViolation>),

    /// A concurrent submission advanced the record first.
    #[error("onboarding record was modified concurrently")]
    Conflict,

    /// Backing store unreachable (infrastructure fault, not a denial).
    #[error("onboarding store unavailable: {0}")]
    Store(String),
}
