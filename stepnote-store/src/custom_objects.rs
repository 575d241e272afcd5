//! Custom-objects backend
//!
//! Same interface as the notes backend, persisted as CRM custom-object
//! records instead. The encoded document travels in a `content` attribute
//! and the labels in a `tags` attribute, so the record layout stays
//! identical across backends and nothing above the trait can tell them
//! apart.

use crate::document::{NoteDocument, NoteStore};
use crate::http::CrmClient;
use ::async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use stepnote_core::{StepnoteResult, StoreError, Timestamp};

pub struct CustomObjectsBackend {
    client: CrmClient,
    object_type: String,
}

impl CustomObjectsBackend {
    pub fn new(client: CrmClient, object_type: impl Into<String>) -> Self {
        Self {
            client,
            object_type: object_type.into(),
        }
    }

    fn records_path(&self) -> String {
        format!("/v2/custom_objects/{}/records", self.object_type)
    }
}

#[derive(Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    data: Vec<RecordEnvelope>,
}

#[derive(Deserialize)]
struct RecordEnvelope {
    data: RecordWire,
}

#[derive(Deserialize)]
struct RecordWire {
    id: IdWire,
    attributes: Attributes,
    created_at: Option<Timestamp>,
    updated_at: Option<Timestamp>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdWire {
    Number(i64),
    Text(String),
}

#[derive(Default, Deserialize, Serialize)]
struct Attributes {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Serialize)]
struct WriteEnvelope {
    data: WriteData,
}

#[derive(Serialize)]
struct WriteData {
    attributes: Attributes,
}

impl RecordWire {
    fn into_document(self) -> NoteDocument {
        NoteDocument {
            id: match self.id {
                IdWire::Number(n) => n.to_string(),
                IdWire::Text(s) => s,
            },
            content: self.attributes.content,
            tags: self.attributes.tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
            creator_email: None,
        }
    }
}

fn write_body(content: &str, tags: &[String]) -> WriteEnvelope {
    WriteEnvelope {
        data: WriteData {
            attributes: Attributes {
                content: content.to_string(),
                tags: tags.to_vec(),
            },
        },
    }
}

#[async_trait]
impl NoteStore for CustomObjectsBackend {
    async fn list(&self, page_size: u32) -> StepnoteResult<Vec<NoteDocument>> {
        let path = format!(
            "{}?per_page={}&sort_by=updated_at:desc",
            self.records_path(),
            page_size
        );
        let envelope: ListEnvelope = self.client.get_json(&path).await?;
        Ok(envelope
            .data
            .into_iter()
            .map(|record| record.data.into_document())
            .collect())
    }

    async fn get(&self, id: &str) -> StepnoteResult<Option<NoteDocument>> {
        match self
            .client
            .get_json::<RecordEnvelope>(&format!("{}/{id}", self.records_path()))
            .await
        {
            Ok(envelope) => Ok(Some(envelope.data.into_document())),
            Err(StoreError::RequestFailed { status: 404, .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn create(&self, content: &str, tags: &[String]) -> StepnoteResult<NoteDocument> {
        let envelope: RecordEnvelope = self
            .client
            .post_json(&self.records_path(), &write_body(content, tags))
            .await?;
        Ok(envelope.data.into_document())
    }

    async fn update(
        &self,
        id: &str,
        content: &str,
        tags: &[String],
    ) -> StepnoteResult<NoteDocument> {
        let envelope: RecordEnvelope = self
            .client
            .put_json(
                &format!("{}/{id}", self.records_path()),
                &write_body(content, tags),
            )
            .await?;
        Ok(envelope.data.into_document())
    }

    async fn delete(&self, id: &str) -> StepnoteResult<()> {
        let status = self
            .client
            .delete(&format!("{}/{id}", self.records_path()))
            .await?;
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
