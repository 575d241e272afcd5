//! In-memory mock implementation of `NoteStore` for tests.

use crate::document::{NoteDocument, NoteStore};
use ::async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use stepnote_core::{StepnoteResult, StoreError};

/// In-memory note store backed by a `HashMap`.
///
/// Mirrors the real backends' observable behavior: list is newest-updated
/// first and bounded by the page size, create/update return the stored
/// representation, delete of an absent id is a no-op.
#[derive(Default)]
pub struct MockNoteStore {
    documents: Arc<RwLock<HashMap<String, NoteDocument>>>,
    next_id: AtomicU64,
    /// Sequence assigned at insert, to keep list ordering deterministic
    /// when updated_at timestamps collide.
    arrival: Arc<RwLock<HashMap<String, u64>>>,
}

impl MockNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents, for assertions on write suppression.
    pub fn len(&self) -> usize {
        self.documents.read().expect("mock lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a raw document directly, bypassing encode. Lets tests plant
    /// corrupt records.
    pub fn seed(&self, content: &str, tags: &[String]) -> String {
        let id = self.allocate_id();
        let now = Utc::now();
        let document = NoteDocument {
            id: id.clone(),
            content: content.to_string(),
            tags: tags.to_vec(),
            created_at: Some(now),
            updated_at: Some(now),
            creator_email: None,
        };
        self.documents
            .write()
            .expect("mock lock")
            .insert(id.clone(), document);
        id
    }

    fn allocate_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.arrival
            .write()
            .expect("mock lock")
            .insert(n.to_string(), n);
        n.to_string()
    }
}

#[async_trait]
impl NoteStore for MockNoteStore {
    async fn list(&self, page_size: u32) -> StepnoteResult<Vec<NoteDocument>> {
        let documents = self.documents.read().expect("mock lock");
        let arrival = self.arrival.read().expect("mock lock");
        let mut all: Vec<NoteDocument> = documents.values().cloned().collect();
        all.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| arrival.get(&b.id).cmp(&arrival.get(&a.id)))
        });
        all.truncate(page_size as usize);
        Ok(all)
    }

    async fn get(&self, id: &str) -> StepnoteResult<Option<NoteDocument>> {
        Ok(self.documents.read().expect("mock lock").get(id).cloned())
    }

    async fn create(&self, content: &str, tags: &[String]) -> StepnoteResult<NoteDocument> {
        let id = self.allocate_id();
        let now = Utc::now();
        let document = NoteDocument {
            id: id.clone(),
            content: content.to_string(),
            tags: tags.to_vec(),
            created_at: Some(now),
            updated_at: Some(now),
            creator_email: None,
        };
        self.documents
            .write()
            .expect("mock lock")
            .insert(id, document.clone());
        Ok(document)
    }

    async fn update(
        &self,
        id: &str,
        content: &str,
        tags: &[String],
    ) -> StepnoteResult<NoteDocument> {
        let mut documents = self.documents.write().expect("mock lock");
        let Some(existing) = documents.get_mut(id) else {
            return Err(StoreError::RequestFailed {
                status: 404,
                body: format!("no document {id}"),
            }
            .into());
        };
        existing.content = content.to_string();
        existing.tags = tags.to_vec();
        existing.updated_at = Some(Utc::now());
        Ok(existing.clone())
    }

    async fn delete(&self, id: &str) -> StepnoteResult<()> {
        self.documents.write().expect("mock lock").remove(id);
        Ok(())
    }
}
