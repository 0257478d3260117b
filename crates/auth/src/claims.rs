//! JWT claims model and token codec.
//!
//! Claim *validation* is deterministic and transport-agnostic; actual
//! encode/decode goes through the [`TokenCodec`] trait so the API layer
//! depends on a seam, not on a JWT library.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use campuserp_core::{DepartmentId, SubjectId, TenantId};

use crate::{Principal, Role};

/// JWT claims model (transport-agnostic).
///
/// The minimal set of claims CampusERP expects once a token has been decoded
/// and signature-verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject / principal identifier.
    pub sub: SubjectId,

    /// Display name, if the identity layer supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Role granted for this session.
    pub role: Role,

    /// Tenant context for the token. Absent only for the platform super role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,

    /// Department context, set for department-head tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<DepartmentId>,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl JwtClaims {
    pub fn into_principal(self) -> Principal {
        Principal {
            subject_id: self.sub,
            display_name: self.name,
            role: self.role,
            tenant_id: self.tenant_id,
            department_id: self.department_id,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("token is malformed or its signature is invalid")]
    Malformed,

    /// A non-super token without a tenant binding is never valid.
    #[error("token carries no tenant for a tenant-bound role")]
    MissingTenant,
}

/// Deterministically validate JWT claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// is the codec's job.
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    if !claims.role.is_super() && claims.tenant_id.is_none() {
        return Err(TokenValidationError::MissingTenant);
    }
    Ok(())
}

/// Token encode/decode seam consumed by the API middleware.
pub trait TokenCodec: Send + Sync {
    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError>;

    fn encode(&self, claims: &JwtClaims) -> Result<String, TokenValidationError>;
}

/// HS256 codec over a shared secret.
pub struct Hs256TokenCodec {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
}

impl Hs256TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
        }
    }
}

impl TokenCodec for Hs256TokenCodec {
    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError> {
        // Expiry is expressed via `expires_at` (RFC 3339), not a numeric
        // `exp`, so the library's registered-claim checks are disabled and
        // `validate_claims` is authoritative.
        let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenValidationError::Malformed)?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }

    fn encode(&self, claims: &JwtClaims) -> Result<String, TokenValidationError> {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
            claims,
            &self.encoding,
        )
        .map_err(|_| TokenValidationError::Malformed)
    }
}
