//! Request middleware: authentication, then admission.
//!
//! `auth_middleware` resolves the bearer token into a `Principal` extension;
//! `admission_middleware` distills the request into a transport-agnostic
//! descriptor, runs the admission pipeline, and forwards the *effective*
//! (scoped) request to the handler; handlers never see the raw inbound
//! query/body.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use serde_json::{Map, Value};

use campuserp_auth::{Principal, TokenCodec};
use campuserp_pipeline::{Method, RequestDescriptor};

use crate::app::errors::{self, pipeline_error_to_response};
use crate::app::services::AppServices;

/// Cap on buffered request bodies (the pipeline needs the JSON in memory).
const BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<dyn TokenCodec>,
}

/// The effective request the pipeline admitted, for handlers that read the
/// scoped query.
#[derive(Debug, Clone)]
pub struct ScopedRequest(pub RequestDescriptor);

impl ScopedRequest {
    /// A scoped query parameter, when present and a string.
    pub fn query_str(&self, key: &str) -> Option<&str> {
        self.0.query.get(key).and_then(Value::as_str)
    }
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let claims = state
        .codec
        .decode(token, Utc::now())
        .map_err(|_e| StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(claims.into_principal());

    Ok(next.run(req).await)
}

pub async fn admission_middleware(
    State(services): State<Arc<AppServices>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(principal) = req.extensions().get::<Principal>().cloned() else {
        // Auth middleware runs first; a missing principal is a wiring bug.
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "no authenticated principal",
        );
    };

    let Ok(method) = req.method().as_str().parse::<Method>() else {
        return errors::json_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "METHOD_NOT_ALLOWED",
            "unsupported method",
        );
    };

    let (mut parts, body) = req.into_parts();
    let path = parts.uri.path().to_string();
    let query = parse_query(parts.uri.query());

    let bytes = match axum::body::to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return errors::json_error(
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "request body exceeds limit",
            );
        }
    };
    let body_json: Option<Value> = if bytes.is_empty() {
        None
    } else {
        serde_json::from_slice(&bytes).ok()
    };

    let descriptor = RequestDescriptor {
        method,
        path: path.clone(),
        query,
        body: body_json,
    };

    let policy = services.policies.lookup(method, &path);
    let effective = match services.pipeline.admit(&principal, policy, descriptor) {
        Ok(effective) => effective,
        Err(e) => return pipeline_error_to_response(e),
    };

    // Mutations are recorded off the request path; a recorder failure never
    // reaches the caller.
    services.recorder.record(&principal, &effective);

    // Forward the effective body: scoping may have injected the tenant.
    // The inbound Content-Length no longer matches a rewritten body.
    let out_body = match &effective.body {
        Some(value) => match serde_json::to_vec(value) {
            Ok(buf) => {
                parts.headers.remove(axum::http::header::CONTENT_LENGTH);
                Body::from(buf)
            }
            Err(_) => Body::from(bytes),
        },
        None => Body::from(bytes),
    };

    parts.extensions.insert(ScopedRequest(effective));
    next.run(Request::from_parts(parts, out_body)).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}

/// Parse a query string into a JSON map (identifiers only; no nested keys).
fn parse_query(raw: Option<&str>) -> Map<String, Value> {
    let mut map = Map::new();
    let Some(raw) = raw else {
        return map;
    };

    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_query_splits_pairs() {
        let map = parse_query(Some("universityId=U2&departmentId=D1"));
        assert_eq!(map.get("universityId"), Some(&Value::String("U2".into())));
        assert_eq!(map.get("departmentId"), Some(&Value::String("D1".into())));
    }

    #[test]
    fn parse_query_handles_empty_and_flag_params() {
        assert!(parse_query(None).is_empty());
        let map = parse_query(Some("verbose"));
        assert_eq!(map.get("verbose"), Some(&Value::String(String::new())));
    }
}
