//! Tip record adapter
//!
//! Tips live in the same document store behind the `tip` marker label.
//! `body_html` is rendered from the markdown on every read through the
//! injected renderer and is never persisted.

use crate::document::{NoteDocument, NoteStore};
use chrono::Utc;
use std::sync::Arc;
use stepnote_core::{codec, tags, MarkdownRenderer, StepnoteResult, Tip, TipDraft, TipStatus};

pub struct TipStore {
    store: Arc<dyn NoteStore>,
    renderer: Arc<dyn MarkdownRenderer>,
    page_size: u32,
}

impl TipStore {
    pub fn new(
        store: Arc<dyn NoteStore>,
        renderer: Arc<dyn MarkdownRenderer>,
        page_size: u32,
    ) -> Self {
        Self {
            store,
            renderer,
            page_size,
        }
    }

    /// List tips, newest-updated first. Drafts are filtered out unless
    /// requested, so public listings never leak unpublished content.
    pub async fn list(&self, include_drafts: bool) -> StepnoteResult<Vec<Tip>> {
        let documents = self.store.list(self.page_size).await?;
        Ok(documents
            .into_iter()
            .filter(|doc| doc.tags.iter().any(|tag| tag == tags::TIP_MARKER))
            .map(|doc| self.document_to_tip(doc))
            .filter(|tip| include_drafts || tip.status == TipStatus::Published)
            .collect())
    }

    pub async fn get(&self, id: &str) -> StepnoteResult<Option<Tip>> {
        Ok(self
            .store
            .get(id)
            .await?
            .map(|doc| self.document_to_tip(doc)))
    }

    /// Create (no id) or rewrite (with id) a tip document.
    pub async fn save(&self, id: Option<&str>, draft: &TipDraft) -> StepnoteResult<Tip> {
        let content = codec::encode_tip(draft);
        let mut labels = vec![tags::TIP_MARKER.to_string()];
        for tag in &draft.tags {
            let trimmed = tag.trim();
            if !trimmed.is_empty() && !labels.iter().any(|l| l == trimmed) {
                labels.push(trimmed.to_string());
            }
        }

        let document = match id {
            Some(id) => self.store.update(id, &content, &labels).await?,
            None => self.store.create(&content, &labels).await?,
        };
        Ok(self.document_to_tip(document))
    }

    /// Remove a tip document. Idempotent.
    pub async fn delete(&self, id: &str) -> StepnoteResult<()> {
        self.store.delete(id).await
    }

    /// Decode leniently and backfill header gaps from the document's own
    /// metadata, the way hand-edited notes need.
    fn document_to_tip(&self, document: NoteDocument) -> Tip {
        let decoded = codec::decode_tip(&document.content);

        let mut merged_tags = decoded.tags;
        for tag in &document.tags {
            if tag != tags::TIP_MARKER && !merged_tags.iter().any(|t| t == tag) {
                merged_tags.push(tag.clone());
            }
        }

        let updated_at = decoded
            .updated_at
            .or(document.updated_at)
            .or(document.created_at)
            .unwrap_or_else(Utc::now);

        Tip {
            id: document.id,
            title: decoded
                .title
                .unwrap_or_else(|| "Tip sin título".to_string()),
            body_html: self.renderer.render(&decoded.body_md),
            body_md: decoded.body_md,
            tags: merged_tags,
            status: decoded.status,
            updated_at,
            updated_by: decoded.updated_by.or(document.creator_email),
        }
    }
}
