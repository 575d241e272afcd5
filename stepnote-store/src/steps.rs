//! Step record adapter
//!
//! Reconstructs the virtual per-checklist, per-deal step collection out of
//! the store's coarse listing: tag filter, decode, sort. Every write
//! re-derives tags from the resolved scope and re-encodes the full record;
//! the server's returned document, decoded, is the authoritative result.

use crate::document::{NoteDocument, NoteStore};
use std::sync::Arc;
use stepnote_core::{codec, tags, Step, StepnoteResult};

/// A step together with its storage identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredStep {
    pub note_id: String,
    pub step: Step,
}

pub struct StepStore {
    store: Arc<dyn NoteStore>,
    page_size: u32,
}

impl StepStore {
    pub fn new(store: Arc<dyn NoteStore>, page_size: u32) -> Self {
        Self { store, page_size }
    }

    /// List the steps of a checklist, sorted by `order` ascending. The sort
    /// is stable, so ties keep the backend listing order: most recently
    /// updated first. With no `deal_id`, deal-scoped steps are included.
    ///
    /// Completeness is bounded by the configured page size: a checklist
    /// holding more documents than one page can return will list only the
    /// most recently updated ones.
    ///
    /// A record that fails to decode is skipped with a warning so one
    /// corrupt note cannot hide the rest of the checklist.
    pub async fn list(
        &self,
        checklist_key: &str,
        deal_id: Option<&str>,
    ) -> StepnoteResult<Vec<StoredStep>> {
        let documents = self.store.list(self.page_size).await?;
        let mut steps = Vec::new();
        for document in documents {
            if !tags::step_matches(&document.tags, checklist_key, None, deal_id) {
                continue;
            }
            match codec::decode_step(&document.content) {
                Ok(step) => steps.push(StoredStep {
                    note_id: document.id,
                    step,
                }),
                Err(err) => {
                    tracing::warn!(
                        note_id = %document.id,
                        error = %err,
                        "skipping corrupt step record"
                    );
                }
            }
        }
        steps.sort_by_key(|stored| stored.step.order);
        Ok(steps)
    }

    /// Find one step by identity. Absence is a normal outcome, not an error.
    pub async fn get_by_id(
        &self,
        checklist_key: &str,
        step_id: &str,
        deal_id: Option<&str>,
    ) -> StepnoteResult<Option<StoredStep>> {
        let documents = self.store.list(self.page_size).await?;
        for document in documents {
            if !tags::step_matches(&document.tags, checklist_key, Some(step_id), deal_id) {
                continue;
            }
            match codec::decode_step(&document.content) {
                Ok(step) => {
                    return Ok(Some(StoredStep {
                        note_id: document.id,
                        step,
                    }))
                }
                Err(err) => {
                    tracing::warn!(
                        note_id = %document.id,
                        error = %err,
                        "skipping corrupt step record"
                    );
                }
            }
        }
        Ok(None)
    }

    pub async fn create(&self, checklist_key: &str, step: &Step) -> StepnoteResult<StoredStep> {
        let (content, labels) = Self::prepare(checklist_key, step)?;
        let document = self.store.create(&content, &labels).await?;
        Self::decode_response(document)
    }

    pub async fn update(
        &self,
        note_id: &str,
        checklist_key: &str,
        step: &Step,
    ) -> StepnoteResult<StoredStep> {
        let (content, labels) = Self::prepare(checklist_key, step)?;
        let document = self.store.update(note_id, &content, &labels).await?;
        Self::decode_response(document)
    }

    /// Remove a stored document. Idempotent.
    pub async fn delete(&self, note_id: &str) -> StepnoteResult<()> {
        self.store.delete(note_id).await
    }

    /// Encode the record and derive its labels from the resolved scope.
    /// Caller-supplied tags are never trusted; the index must stay
    /// consistent with the stored content.
    fn prepare(checklist_key: &str, step: &Step) -> StepnoteResult<(String, Vec<String>)> {
        let mut record = step.clone();
        record.checklist_key = Some(checklist_key.trim().to_string());
        let labels = tags::step_tags(checklist_key, &record.id, record.deal_id.as_deref())?;
        Ok((codec::encode_step(&record), labels))
    }

    fn decode_response(document: NoteDocument) -> StepnoteResult<StoredStep> {
        let step = codec::decode_step(&document.content)?;
        Ok(StoredStep {
            note_id: document.id,
            step,
        })
    }
}
