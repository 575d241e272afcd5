//! Core record structures

use crate::enums::{StepStatus, TipStatus};
use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// One checklist item.
///
/// A step is identified by `(checklist_key, deal_id, id)`: `deal_id` absent
/// means the step belongs to the checklist's global scope, which is distinct
/// from every deal scope. `checklist_key` is logically a relation rather than
/// an owned field; it is attached as an annotation on every read and write so
/// the stored document carries its grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// "More info" link shown next to the step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Per-step agent note, never shown to public readers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub status: StepStatus,
    /// Display ordering, ascending. Ties keep the backend listing order,
    /// which is most-recently-updated first.
    pub order: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_ticket_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist_key: Option<String>,
    /// Email of the last writer.
    pub updated_by: String,
    pub updated_at: Timestamp,
}

/// Partial update for a step.
///
/// `None` inherits the server's current value. For the optional text fields,
/// `Some("")` explicitly clears the field; cleared fields are stored as
/// absent. Identity fields (`id`, `checklist_key`, `deal_id`) are not
/// patchable - they name the record being updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StepStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_ticket_id: Option<i64>,
}

impl StepPatch {
    /// Patch that only flips the status, used by toggle operations.
    pub fn status_only(status: StepStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// A published or draft article.
///
/// `body_html` is derived fresh from `body_md` at read time and is never
/// persisted or accepted as input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    pub id: String,
    pub title: String,
    pub body_md: String,
    pub body_html: String,
    pub tags: Vec<String>,
    pub status: TipStatus,
    pub updated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Author-supplied tip content for create/update.
///
/// Carries everything a tip owns except the storage identity and the derived
/// `body_html`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipDraft {
    pub title: String,
    pub body_md: String,
    pub tags: Vec<String>,
    pub status: TipStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    pub updated_at: Timestamp,
}
