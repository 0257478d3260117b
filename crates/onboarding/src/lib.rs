//! `campuserp-onboarding` — tenant setup state machine.
//!
//! A freshly provisioned university walks a fixed sequence of setup stages
//! before it may use the rest of the platform. This crate owns the record of
//! that walk (monotonic, non-skippable, append-only), the typed per-stage
//! payloads, the tenant directory the admission gate reads, and the
//! submission/activation service.

pub mod error;
pub mod record;
pub mod service;
pub mod stages;
pub mod store;
pub mod tenant;

pub use error::{GoLiveViolation, OnboardingError};
pub use record::OnboardingRecord;
pub use service::OnboardingService;
pub use stages::{ACTIVATED_STAGE, FIRST_STAGE, LAST_STAGE, REQUIRED_STAGES, StagePayload};
pub use store::{InMemoryOnboardingStore, OnboardingStore, StoreError};
pub use tenant::{InMemoryTenantDirectory, TenantDirectory, TenantRecord, TenantStatus};
