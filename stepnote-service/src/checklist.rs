//! Checklist service
//!
//! Write path per update attempt: fetch the current record at call time,
//! compare the client's last-seen timestamp, merge, stamp, persist. This is
//! last-writer-wins with conflict detection: a stale client cannot silently
//! clobber a write it never saw, but concurrent field-level changes are not
//! merged. Conflicts are surfaced to the caller, never auto-retried - a
//! silent retry here would mask a real concurrent edit.

use crate::identity::AgentDirectory;
use crate::payload::{self, NewStep};
use chrono::Utc;
use stepnote_core::{SafetyPolicy, Step, StepPatch, StepnoteResult, SyncError, Timestamp};
use stepnote_store::{StepStore, StoredStep};

pub struct ChecklistService {
    steps: StepStore,
    safety: SafetyPolicy,
    agents: AgentDirectory,
}

impl ChecklistService {
    pub fn new(steps: StepStore, safety: SafetyPolicy, agents: AgentDirectory) -> Self {
        Self {
            steps,
            safety,
            agents,
        }
    }

    /// Public read: steps of a checklist, sorted by order.
    pub async fn list(
        &self,
        checklist_key: &str,
        deal_id: Option<&str>,
    ) -> StepnoteResult<Vec<Step>> {
        let listed = self.steps.list(checklist_key, deal_id).await?;
        Ok(listed.into_iter().map(|stored| stored.step).collect())
    }

    pub async fn create(
        &self,
        checklist_key: &str,
        deal_id: Option<&str>,
        input: NewStep,
        email: Option<&str>,
    ) -> StepnoteResult<Step> {
        let email = self.agents.require_agent(email)?;
        let step = payload::build_step(input, deal_id, &email)?;
        self.safety.check_step(&step)?;
        let created = self.steps.create(checklist_key, &step).await?;
        Ok(created.step)
    }

    /// Update with optimistic concurrency.
    ///
    /// `expected_updated_at` is the timestamp of the version the client last
    /// read; when it is strictly earlier than the server's current one the
    /// update is rejected and nothing is written. A client that sends no
    /// timestamp opts out of the check.
    pub async fn update(
        &self,
        checklist_key: &str,
        step_id: &str,
        deal_id: Option<&str>,
        patch: StepPatch,
        expected_updated_at: Option<Timestamp>,
        email: Option<&str>,
    ) -> StepnoteResult<Step> {
        let email = self.agents.require_agent(email)?;
        let current = self.fetch_current(checklist_key, step_id, deal_id).await?;

        if let Some(seen) = expected_updated_at {
            if seen < current.step.updated_at {
                tracing::warn!(
                    checklist_key,
                    step_id,
                    client_seen = %seen,
                    server_current = %current.step.updated_at,
                    "rejecting stale update"
                );
                return Err(SyncError::VersionConflict {
                    client_seen: seen,
                    server_current: current.step.updated_at,
                }
                .into());
            }
        }

        let mut merged = payload::apply_patch(&current.step, &patch);
        merged.updated_by = email;
        merged.updated_at = Utc::now();
        self.safety.check_step(&merged)?;

        let updated = self
            .steps
            .update(&current.note_id, checklist_key, &merged)
            .await?;
        Ok(updated.step)
    }

    /// Flip a step's status. Runs through the same protocol with the
    /// timestamp read here, so a toggle conflicts with any concurrent edit.
    pub async fn toggle(
        &self,
        checklist_key: &str,
        step_id: &str,
        deal_id: Option<&str>,
        email: Option<&str>,
    ) -> StepnoteResult<Step> {
        self.agents.require_agent(email)?;
        let current = self.fetch_current(checklist_key, step_id, deal_id).await?;
        self.update(
            checklist_key,
            step_id,
            deal_id,
            StepPatch::status_only(current.step.status.flipped()),
            Some(current.step.updated_at),
            email,
        )
        .await
    }

    /// Delete by identity. Deleting a step that is already gone succeeds.
    pub async fn delete(
        &self,
        checklist_key: &str,
        step_id: &str,
        deal_id: Option<&str>,
        email: Option<&str>,
    ) -> StepnoteResult<()> {
        self.agents.require_agent(email)?;
        match self.steps.get_by_id(checklist_key, step_id, deal_id).await? {
            Some(stored) => self.steps.delete(&stored.note_id).await,
            None => Ok(()),
        }
    }

    async fn fetch_current(
        &self,
        checklist_key: &str,
        step_id: &str,
        deal_id: Option<&str>,
    ) -> StepnoteResult<StoredStep> {
        self.steps
            .get_by_id(checklist_key, step_id, deal_id)
            .await?
            .ok_or_else(|| {
                SyncError::NotFound {
                    checklist_key: checklist_key.to_string(),
                    step_id: step_id.to_string(),
                }
                .into()
            })
    }
}
