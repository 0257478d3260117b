//! The per-tenant onboarding record.
//!
//! State machine over stages `1..=5` plus the terminal activated stage.
//! `current_stage` only ever moves forward, and only by submitting exactly
//! the stage it points at; accepted stage payloads are kept forever.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campuserp_core::TenantId;

use crate::error::{GoLiveViolation, OnboardingError};
use crate::stages::{ACTIVATED_STAGE, FIRST_STAGE, LAST_STAGE, REQUIRED_STAGES, StagePayload};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRecord {
    pub tenant_id: TenantId,

    /// The stage the tenant must submit next. Monotonically increasing.
    pub current_stage: u8,

    /// Stages whose submissions were accepted. Stage 0 is implicit.
    pub completed_stages: BTreeSet<u8>,

    /// Accepted payloads, keyed by stage number. Append-only in the sense
    /// that entries are never removed; a re-submission replaces the payload.
    pub stage_data: BTreeMap<u8, StagePayload>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OnboardingRecord {
    /// Fresh record: stage 1 pending, stage 0 implicitly completed.
    pub fn new(tenant_id: TenantId, now: DateTime<Utc>) -> Self {
        Self {
            tenant_id,
            current_stage: FIRST_STAGE,
            completed_stages: BTreeSet::from([0]),
            stage_data: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_activated(&self) -> bool {
        self.current_stage >= ACTIVATED_STAGE
    }

    /// Accept a stage submission.
    ///
    /// Skipping ahead is rejected. Submitting the current stage stores the
    /// payload, marks the stage completed and advances; re-submitting an
    /// earlier stage replaces its payload without advancing. Returns whether
    /// the record advanced.
    pub fn submit(
        &mut self,
        payload: StagePayload,
        now: DateTime<Utc>,
    ) -> Result<bool, OnboardingError> {
        let stage = payload.stage();
        debug_assert!((FIRST_STAGE..=LAST_STAGE).contains(&stage));

        if stage > self.current_stage {
            return Err(OnboardingError::StageSkipped {
                attempted: stage,
                current: self.current_stage,
            });
        }

        self.stage_data.insert(stage, payload);
        self.updated_at = now;

        let advanced = stage == self.current_stage;
        if advanced {
            self.completed_stages.insert(stage);
            self.current_stage += 1;
        }

        Ok(advanced)
    }

    /// Every unmet go-live precondition, across all required stages.
    ///
    /// Deliberately exhaustive rather than fail-fast: one round trip tells
    /// the caller everything still outstanding.
    pub fn go_live_violations(&self) -> Vec<GoLiveViolation> {
        let mut violations = Vec::new();

        for stage in REQUIRED_STAGES {
            match self.stage_data.get(&stage) {
                Some(payload) => violations.extend(payload.go_live_violations()),
                None => violations.push(GoLiveViolation::new(
                    stage,
                    format!("stage {stage} data not submitted"),
                )),
            }
        }

        violations
    }

    /// Flip to the terminal stage. Caller must have checked
    /// [`Self::go_live_violations`] first.
    pub fn activate(&mut self, now: DateTime<Utc>) {
        for stage in FIRST_STAGE..=LAST_STAGE {
            if self.stage_data.contains_key(&stage) {
                self.completed_stages.insert(stage);
            }
        }
        self.current_stage = ACTIVATED_STAGE;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tenant() -> TenantId {
        TenantId::new("U1")
    }

    fn payload(stage: u8) -> StagePayload {
        let value = match stage {
            1 => json!({"universityName": "U1 University", "contactEmail": "admin@u1.edu"}),
            2 => json!({"departments": [{"id": "D9", "name": "Physics"}]}),
            3 => json!({"members": [
                {"name": "A", "email": "a@u1.edu"},
                {"name": "B", "email": "b@u1.edu"}
            ]}),
            4 => json!({"enabledModules": ["students", "fees"]}),
            5 => json!({"source": "legacy-csv"}),
            _ => unreachable!(),
        };
        StagePayload::parse(stage, value).unwrap()
    }

    #[test]
    fn fresh_record_starts_at_stage_one() {
        let rec = OnboardingRecord::new(tenant(), Utc::now());
        assert_eq!(rec.current_stage, 1);
        assert!(rec.completed_stages.contains(&0));
        assert!(!rec.is_activated());
    }

    #[test]
    fn submitting_current_stage_advances_and_completes() {
        let mut rec = OnboardingRecord::new(tenant(), Utc::now());

        let advanced = rec.submit(payload(1), Utc::now()).unwrap();
        assert!(advanced);
        assert_eq!(rec.current_stage, 2);
        assert!(rec.completed_stages.contains(&1));
        assert!(rec.stage_data.contains_key(&1));
    }

    #[test]
    fn skipping_ahead_is_rejected() {
        let mut rec = OnboardingRecord::new(tenant(), Utc::now());
        rec.submit(payload(1), Utc::now()).unwrap();
        assert_eq!(rec.current_stage, 2);

        // Stage 4 while the record sits at stage 2.
        let err = rec.submit(payload(4), Utc::now()).unwrap_err();
        assert_eq!(
            err,
            OnboardingError::StageSkipped {
                attempted: 4,
                current: 2
            }
        );
        assert_eq!(rec.current_stage, 2);
        assert!(!rec.stage_data.contains_key(&4));
    }

    #[test]
    fn resubmitting_a_completed_stage_replaces_without_advancing() {
        let mut rec = OnboardingRecord::new(tenant(), Utc::now());
        rec.submit(payload(1), Utc::now()).unwrap();
        rec.submit(payload(2), Utc::now()).unwrap();
        assert_eq!(rec.current_stage, 3);

        let advanced = rec.submit(payload(1), Utc::now()).unwrap();
        assert!(!advanced);
        assert_eq!(rec.current_stage, 3);
    }

    #[test]
    fn violations_list_every_missing_stage() {
        let rec = OnboardingRecord::new(tenant(), Utc::now());
        let violations = rec.go_live_violations();
        let stages: Vec<u8> = violations.iter().map(|v| v.stage).collect();
        assert_eq!(stages, vec![1, 2, 3, 4]);
    }

    #[test]
    fn violations_pinpoint_content_failures_only() {
        let mut rec = OnboardingRecord::new(tenant(), Utc::now());
        rec.submit(payload(1), Utc::now()).unwrap();
        // Stage 2 with zero departments.
        rec.submit(
            StagePayload::parse(2, json!({"departments": []})).unwrap(),
            Utc::now(),
        )
        .unwrap();
        rec.submit(payload(3), Utc::now()).unwrap();
        rec.submit(payload(4), Utc::now()).unwrap();

        let violations = rec.go_live_violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].stage, 2);
    }

    #[test]
    fn data_import_stage_is_skippable() {
        let mut rec = OnboardingRecord::new(tenant(), Utc::now());
        for stage in 1..=4 {
            rec.submit(payload(stage), Utc::now()).unwrap();
        }
        // Stage 5 never submitted.
        assert!(rec.go_live_violations().is_empty());

        rec.activate(Utc::now());
        assert!(rec.is_activated());
        assert_eq!(rec.current_stage, ACTIVATED_STAGE);
    }
}
