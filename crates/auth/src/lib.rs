//! `campuserp-auth` — pure authentication/authorization boundary (zero-trust).
//!
//! This crate is intentionally decoupled from HTTP and storage: it models the
//! authenticated principal, the fixed role set, the injected rank table used
//! for privilege comparisons, and deterministic JWT claim validation.

pub mod claims;
pub mod hierarchy;
pub mod principal;
pub mod roles;

pub use claims::{Hs256TokenCodec, JwtClaims, TokenCodec, TokenValidationError, validate_claims};
pub use hierarchy::RoleHierarchy;
pub use principal::Principal;
pub use roles::Role;
