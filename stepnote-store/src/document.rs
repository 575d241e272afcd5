//! Note document abstraction
//!
//! The store boundary: opaque text documents with labels and timestamps.
//! Everything above this trait works in terms of encoded records; everything
//! below it is wire plumbing.

use ::async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stepnote_core::{StepnoteResult, Timestamp};

/// One stored document as the backends surface it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDocument {
    /// Storage identity, opaque to callers.
    pub id: String,
    /// Free-text content (an encoded record).
    pub content: String,
    /// Labels attached to the document.
    pub tags: Vec<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    /// Email of the document's creator, when the store reports one.
    pub creator_email: Option<String>,
}

/// Coarse document CRUD over the backing store.
///
/// Listing is unfiltered beyond the store's own resource scope and bounded
/// by `page_size`; tag-level filtering is the adapters' job.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Fetch up to one page of documents, newest-updated first.
    async fn list(&self, page_size: u32) -> StepnoteResult<Vec<NoteDocument>>;

    /// Fetch one document; `None` when it does not exist.
    async fn get(&self, id: &str) -> StepnoteResult<Option<NoteDocument>>;

    /// Persist a new document, returning the server's representation.
    async fn create(&self, content: &str, tags: &[String]) -> StepnoteResult<NoteDocument>;

    /// Rewrite an existing document, returning the server's representation.
    async fn update(
        &self,
        id: &str,
        content: &str,
        tags: &[String],
    ) -> StepnoteResult<NoteDocument>;

    /// Remove a document. Deleting an absent identity is not an error.
    async fn delete(&self, id: &str) -> StepnoteResult<()>;
}
