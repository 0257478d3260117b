//! Transport-agnostic request descriptor.
//!
//! The pipeline never sees framework types; the HTTP layer distills each
//! request into this descriptor (method, path, parsed query, buffered JSON
//! body) before admission runs.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wire name of the tenant field in queries, bodies and path parameters.
pub const TENANT_FIELD: &str = "universityId";

/// Wire name of the department field injected for department heads.
pub const DEPARTMENT_FIELD: &str = "departmentId";

/// Path segment of the collection that addresses tenants directly by id.
pub const TENANT_COLLECTION: &str = "universities";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Mutating verbs trigger the audit recorder.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch | Method::Delete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl core::fmt::Display for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(()),
        }
    }
}

/// One inbound request, as the pipeline sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub method: Method,

    /// Path only, no query string (e.g. `/students`).
    pub path: String,

    /// Parsed query parameters.
    pub query: Map<String, Value>,

    /// Buffered JSON body, when one was sent.
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Map::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn path_segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    /// First path segment, i.e. the module a request addresses
    /// (`/students/...` is the `students` module). Used for audit attribution.
    pub fn module(&self) -> Option<&str> {
        self.path_segments().next()
    }

    /// The id segment of a route addressing the tenant collection directly
    /// (`/universities/{id}`).
    pub fn tenant_resource_id(&self) -> Option<&str> {
        let mut segments = self.path_segments();
        while let Some(segment) = segments.next() {
            if segment == TENANT_COLLECTION {
                return segments.next();
            }
        }
        None
    }

    pub fn tenant_in_query(&self) -> Option<&str> {
        self.query.get(TENANT_FIELD).and_then(Value::as_str)
    }

    pub fn tenant_in_body(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(Value::as_object)
            .and_then(|obj| obj.get(TENANT_FIELD))
            .and_then(Value::as_str)
    }
}
