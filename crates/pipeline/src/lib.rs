//! `campuserp-pipeline` — the shared request-admission pipeline.
//!
//! Every domain operation sits behind this pipeline; no handler duplicates
//! its logic. Per request it runs, in a fixed and tested order:
//!
//! 1. onboarding gate: is the caller's tenant still mid-setup?
//! 2. role check: does the caller's rank satisfy the operation's policy?
//! 3. tenant isolation: does any tenant id in the request match the caller?
//! 4. auto-scoping: narrow the effective query/body to the caller's tenant.
//!
//! Stages 1–3 are decision functions; stage 4 returns a new effective
//! request rather than mutating the inbound one.

pub mod error;
pub mod gate;
pub mod isolation;
pub mod pipeline;
pub mod request;
pub mod scoping;

pub use error::{PipelineError, TenantSurface};
pub use gate::OnboardingGate;
pub use isolation::enforce_tenant_isolation;
pub use pipeline::{AdmissionPipeline, OperationPolicy};
pub use request::{DEPARTMENT_FIELD, Method, RequestDescriptor, TENANT_COLLECTION, TENANT_FIELD};
pub use scoping::scope_request;
