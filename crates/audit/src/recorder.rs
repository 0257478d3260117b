//! Fire-and-forget audit recorder.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use campuserp_auth::Principal;
use campuserp_pipeline::RequestDescriptor;

use crate::record::AuditRecord;
use crate::store::AuditStore;

/// Persists audit records off the request path.
///
/// The caller returns to the client without waiting for the write; a failed
/// write is logged and swallowed. Recording is best-effort and must never
/// fail the primary operation.
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Record one admitted request, if it is a mutating operation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn record(&self, principal: &Principal, request: &RequestDescriptor) {
        let Some(record) = AuditRecord::for_request(principal, request, Utc::now()) else {
            return;
        };

        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            let module = record.module.clone();
            if let Err(e) = store.append(record).await {
                warn!(%module, error = %e, "audit write failed; dropping record");
            }
        });
    }
}
