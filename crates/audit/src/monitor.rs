//! Behavioral monitor.
//!
//! Periodic batch job scanning recorded audit events for abuse heuristics:
//! actors mutating above a threshold within the period, and mutations of
//! sensitive modules during an off-hours window. Emits log-level alerts
//! only; it never blocks or throttles requests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use campuserp_core::SubjectId;

use crate::store::{AuditQuery, AuditStore, AuditStoreError};

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Scan period; also the lookback window of each run.
    pub period: Duration,

    /// Mutation count per actor above which the actor is flagged.
    pub actor_mutation_threshold: usize,

    /// Off-hours window as `[start_hour, end_hour)` in UTC, wrapping
    /// midnight (e.g. 22..6).
    pub off_hours_start: u32,
    pub off_hours_end: u32,

    /// Modules whose off-hours mutations are alert-worthy.
    pub sensitive_modules: Vec<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(60 * 60),
            actor_mutation_threshold: 100,
            off_hours_start: 22,
            off_hours_end: 6,
            sensitive_modules: vec![
                "fees".to_string(),
                "exams".to_string(),
                "admin".to_string(),
            ],
        }
    }
}

impl MonitorConfig {
    fn is_off_hours(&self, at: DateTime<Utc>) -> bool {
        let hour = at.hour();
        if self.off_hours_start <= self.off_hours_end {
            hour >= self.off_hours_start && hour < self.off_hours_end
        } else {
            hour >= self.off_hours_start || hour < self.off_hours_end
        }
    }
}

/// Findings of one monitor run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorReport {
    pub scanned: usize,

    /// Actors whose mutation count exceeded the threshold, with the count.
    pub flagged_actors: Vec<(SubjectId, usize)>,

    /// Sensitive modules mutated during the off-hours window.
    pub off_hours_modules: Vec<String>,
}

pub struct BehavioralMonitor {
    store: Arc<dyn AuditStore>,
    config: MonitorConfig,
    running: AtomicBool,
}

impl BehavioralMonitor {
    pub fn new(store: Arc<dyn AuditStore>, config: MonitorConfig) -> Self {
        Self {
            store,
            config,
            running: AtomicBool::new(false),
        }
    }

    /// Scan the last period ending at `now`.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<MonitorReport, AuditStoreError> {
        let window =
            chrono::Duration::from_std(self.config.period).unwrap_or(chrono::Duration::hours(1));
        let records = self
            .store
            .query(AuditQuery {
                from: Some(now - window),
                to: Some(now),
                ..Default::default()
            })
            .await?;

        let mut per_actor: HashMap<SubjectId, usize> = HashMap::new();
        let mut off_hours_modules: Vec<String> = Vec::new();

        for record in &records {
            *per_actor.entry(record.actor_id).or_default() += 1;

            if self.config.is_off_hours(record.recorded_at)
                && self.config.sensitive_modules.contains(&record.module)
                && !off_hours_modules.contains(&record.module)
            {
                off_hours_modules.push(record.module.clone());
            }
        }

        let mut flagged_actors: Vec<(SubjectId, usize)> = per_actor
            .into_iter()
            .filter(|(_, count)| *count > self.config.actor_mutation_threshold)
            .collect();
        flagged_actors.sort_by(|a, b| b.1.cmp(&a.1));

        for (actor, count) in &flagged_actors {
            warn!(
                %actor,
                count,
                threshold = self.config.actor_mutation_threshold,
                "actor exceeded mutation threshold"
            );
        }
        for module in &off_hours_modules {
            warn!(%module, "sensitive module mutated during off-hours window");
        }

        Ok(MonitorReport {
            scanned: records.len(),
            flagged_actors,
            off_hours_modules,
        })
    }

    /// Spawn the periodic scan loop.
    ///
    /// Overlapping runs are skipped: if a scan is still active when the
    /// next tick fires, the tick is dropped.
    pub fn spawn(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let period = self.config.period;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;

                if self.running.swap(true, Ordering::SeqCst) {
                    debug!("previous monitor run still active; skipping tick");
                    continue;
                }

                if let Err(e) = self.run_once(Utc::now()).await {
                    warn!(error = %e, "behavioral monitor scan failed");
                }

                self.running.store(false, Ordering::SeqCst);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AuditRecord;
    use crate::store::InMemoryAuditStore;
    use campuserp_auth::{Principal, Role};
    use campuserp_core::TenantId;
    use campuserp_pipeline::{Method, RequestDescriptor};
    use chrono::TimeZone;

    fn record_at(actor: SubjectId, module: &str, at: DateTime<Utc>) -> AuditRecord {
        let principal = Principal {
            subject_id: actor,
            display_name: None,
            role: Role::Staff,
            tenant_id: Some(TenantId::new("U1")),
            department_id: None,
        };
        let req = RequestDescriptor::new(Method::Post, format!("/{module}"));
        AuditRecord::for_request(&principal, &req, at).unwrap()
    }

    fn config() -> MonitorConfig {
        MonitorConfig {
            actor_mutation_threshold: 3,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn actors_above_the_threshold_are_flagged() {
        let store = Arc::new(InMemoryAuditStore::new());
        let noisy = SubjectId::new();
        let quiet = SubjectId::new();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();

        for _ in 0..4 {
            store
                .append(record_at(noisy, "students", now - chrono::Duration::minutes(10)))
                .await
                .unwrap();
        }
        store
            .append(record_at(quiet, "students", now - chrono::Duration::minutes(10)))
            .await
            .unwrap();

        let monitor = BehavioralMonitor::new(store, config());
        let report = monitor.run_once(now).await.unwrap();

        assert_eq!(report.scanned, 5);
        assert_eq!(report.flagged_actors, vec![(noisy, 4)]);
    }

    #[tokio::test]
    async fn old_records_fall_outside_the_window() {
        let store = Arc::new(InMemoryAuditStore::new());
        let actor = SubjectId::new();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();

        for _ in 0..4 {
            store
                .append(record_at(actor, "students", now - chrono::Duration::hours(3)))
                .await
                .unwrap();
        }

        let monitor = BehavioralMonitor::new(store, config());
        let report = monitor.run_once(now).await.unwrap();
        assert_eq!(report.scanned, 0);
        assert!(report.flagged_actors.is_empty());
    }

    #[tokio::test]
    async fn off_hours_sensitive_mutations_are_reported() {
        let store = Arc::new(InMemoryAuditStore::new());
        // 23:30 UTC sits inside the default 22..6 window.
        let late = Utc.with_ymd_and_hms(2026, 3, 2, 23, 30, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap();

        store
            .append(record_at(SubjectId::new(), "fees", late))
            .await
            .unwrap();
        store
            .append(record_at(SubjectId::new(), "library", late))
            .await
            .unwrap();

        let monitor = BehavioralMonitor::new(store, config());
        let report = monitor.run_once(now).await.unwrap();
        assert_eq!(report.off_hours_modules, vec!["fees".to_string()]);
    }

    #[tokio::test]
    async fn daytime_sensitive_mutations_are_not_off_hours() {
        let store = Arc::new(InMemoryAuditStore::new());
        let noon = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();

        store
            .append(record_at(SubjectId::new(), "fees", noon))
            .await
            .unwrap();

        let monitor = BehavioralMonitor::new(store, config());
        let report = monitor
            .run_once(noon + chrono::Duration::minutes(30))
            .await
            .unwrap();
        assert!(report.off_hours_modules.is_empty());
    }
}
