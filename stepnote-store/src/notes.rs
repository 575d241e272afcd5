//! Notes backend
//!
//! Stores every document as a CRM note attached to one fixed contact. The
//! contact is nothing but a bucket; the tag scheme does the real indexing.

use crate::document::{NoteDocument, NoteStore};
use crate::http::CrmClient;
use ::async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use stepnote_core::{StepnoteResult, StoreError, Timestamp};

pub struct NotesBackend {
    client: CrmClient,
    contact_id: i64,
}

impl NotesBackend {
    pub fn new(client: CrmClient, contact_id: i64) -> Self {
        Self { client, contact_id }
    }
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    data: Vec<ItemEnvelope>,
}

#[derive(Deserialize)]
struct ItemEnvelope {
    data: NoteWire,
}

#[derive(Deserialize)]
struct NoteWire {
    id: IdWire,
    #[serde(default)]
    content: String,
    #[serde(default)]
    tags: Vec<String>,
    created_at: Option<Timestamp>,
    updated_at: Option<Timestamp>,
    creator: Option<CreatorWire>,
}

#[derive(Deserialize)]
struct CreatorWire {
    email: Option<String>,
}

/// The CRM reports note ids as numbers but treats them as opaque in paths.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdWire {
    Number(i64),
    Text(String),
}

impl IdWire {
    fn into_string(self) -> String {
        match self {
            IdWire::Number(n) => n.to_string(),
            IdWire::Text(s) => s,
        }
    }
}

impl NoteWire {
    fn into_document(self) -> NoteDocument {
        NoteDocument {
            id: self.id.into_string(),
            content: self.content,
            tags: self.tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
            creator_email: self.creator.and_then(|c| c.email),
        }
    }
}

#[derive(Serialize)]
struct CreateEnvelope<'a> {
    data: CreateData<'a>,
    meta: Meta,
}

#[derive(Serialize)]
struct CreateData<'a> {
    resource_type: &'static str,
    resource_id: i64,
    content: &'a str,
    tags: &'a [String],
    #[serde(rename = "type")]
    note_type: &'static str,
}

#[derive(Serialize)]
struct Meta {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct UpdateEnvelope<'a> {
    data: UpdateData<'a>,
}

#[derive(Serialize)]
struct UpdateData<'a> {
    content: &'a str,
    tags: &'a [String],
}

// ============================================================================
// TRAIT IMPL
// ============================================================================

#[async_trait]
impl NoteStore for NotesBackend {
    async fn list(&self, page_size: u32) -> StepnoteResult<Vec<NoteDocument>> {
        let path = format!(
            "/v2/notes?resource_type=contact&resource_id={}&per_page={}&sort_by=updated_at:desc",
            self.contact_id, page_size
        );
        let envelope: ListEnvelope = self.client.get_json(&path).await?;
        Ok(envelope
            .data
            .into_iter()
            .map(|item| item.data.into_document())
            .collect())
    }

    async fn get(&self, id: &str) -> StepnoteResult<Option<NoteDocument>> {
        match self
            .client
            .get_json::<ItemEnvelope>(&format!("/v2/notes/{id}"))
            .await
        {
            Ok(envelope) => Ok(Some(envelope.data.into_document())),
            Err(StoreError::RequestFailed { status: 404, .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn create(&self, content: &str, tags: &[String]) -> StepnoteResult<NoteDocument> {
        let body = CreateEnvelope {
            data: CreateData {
                resource_type: "contact",
                resource_id: self.contact_id,
                content,
                tags,
                note_type: "regular",
            },
            meta: Meta { kind: "note" },
        };
        let envelope: ItemEnvelope = self.client.post_json("/v2/notes", &body).await?;
        Ok(envelope.data.into_document())
    }

    async fn update(
        &self,
        id: &str,
        content: &str,
        tags: &[String],
    ) -> StepnoteResult<NoteDocument> {
        let body = UpdateEnvelope {
            data: UpdateData { content, tags },
        };
        let envelope: ItemEnvelope = self
            .client
            .put_json(&format!("/v2/notes/{id}"), &body)
            .await?;
        Ok(envelope.data.into_document())
    }

    async fn delete(&self, id: &str) -> StepnoteResult<()> {
        let status = self.client.delete(&format!("/v2/notes/{id}")).await?;
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(StoreError::RequestFailed {
                status: status.as_u16(),
                body: String::new(),
            }
            .into())
        }
    }
}
