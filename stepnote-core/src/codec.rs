//! Front-matter record codec
//!
//! The backing store only persists unstructured text per document, so every
//! record is flattened into a delimited `key: value` header (plus a markdown
//! body for tips) and parsed back on read. The schema is fixed and small,
//! which is why this is a dedicated line parser rather than a general
//! document-format dependency.
//!
//! Step decoding is strict and all-or-nothing: any validation failure
//! discards the whole parse. Tip decoding is deliberately lenient because
//! tip notes are sometimes hand-edited inside the CRM.

use crate::entities::{Step, TipDraft};
use crate::enums::TipStatus;
use crate::error::CodecError;
use crate::Timestamp;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

const DELIMITER: &str = "---";

/// Header field order for step documents. Fixed and deterministic so a
/// diff/debug view of stored notes is stable; this is part of the layout,
/// not an implementation detail.
const STEP_FIELDS: [&str; 13] = [
    "type",
    "checklist_key",
    "step_id",
    "title",
    "desc",
    "href",
    "note",
    "status",
    "order",
    "support_ticket_id",
    "deal_id",
    "updated_by",
    "updated_at",
];

struct RawDocument {
    fields: HashMap<String, String>,
    body: String,
}

fn is_bare_word(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Format a header value: empty stays empty, safe bare words are emitted
/// as-is, everything else becomes a JSON string literal so quoting, colons,
/// and newlines survive the round trip. The literals `null` and `~` are
/// always quoted because bare they would read back as empty.
fn format_value(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    if is_bare_word(value) && value != "null" && value != "~" {
        return value.to_string();
    }
    serde_json::Value::String(value.to_string()).to_string()
}

fn unquote(raw: &str) -> String {
    if raw == "null" || raw == "~" {
        return String::new();
    }
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return serde_json::from_str::<String>(raw)
            .unwrap_or_else(|_| raw[1..raw.len() - 1].to_string());
    }
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return raw[1..raw.len() - 1].to_string();
    }
    raw.to_string()
}

/// Split a document into header fields and body.
///
/// Header lines are split on the first colon. Blank lines and `#` comments
/// inside the header are skipped, as are lines with no colon at all.
fn parse_front_matter(content: &str) -> Result<RawDocument, CodecError> {
    let mut lines = content.lines();
    match lines.next() {
        Some(first) if first.trim() == DELIMITER => {}
        _ => return Err(CodecError::MalformedDocument),
    }

    let mut fields = HashMap::new();
    let mut closed = false;
    let mut body_lines = Vec::new();
    for line in lines {
        if closed {
            body_lines.push(line);
            continue;
        }
        let trimmed = line.trim();
        if trimmed == DELIMITER {
            closed = true;
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(idx) = trimmed.find(':') else {
            continue;
        };
        let key = trimmed[..idx].trim().to_string();
        let value = unquote(trimmed[idx + 1..].trim());
        fields.insert(key, value);
    }
    if !closed {
        return Err(CodecError::MalformedDocument);
    }

    Ok(RawDocument {
        fields,
        body: body_lines.join("\n"),
    })
}

/// Serialize a step into its note document. Total for any structurally
/// valid step; steps keep everything in the header and have no body.
pub fn encode_step(step: &Step) -> String {
    let status = step.status.to_string();
    let order = step.order.to_string();
    let ticket = step
        .support_ticket_id
        .map(|v| v.to_string())
        .unwrap_or_default();
    let updated_at = step.updated_at.to_rfc3339();

    let values: [&str; 13] = [
        "step",
        step.checklist_key.as_deref().unwrap_or(""),
        &step.id,
        &step.title,
        step.desc.as_deref().unwrap_or(""),
        step.href.as_deref().unwrap_or(""),
        step.note.as_deref().unwrap_or(""),
        &status,
        &order,
        &ticket,
        step.deal_id.as_deref().unwrap_or(""),
        &step.updated_by,
        &updated_at,
    ];

    let mut out = String::from("---\n");
    for (key, value) in STEP_FIELDS.iter().zip(values) {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(&format_value(value));
        out.push('\n');
    }
    out.push_str("---\n");
    out
}

/// Parse a note document back into a step.
pub fn decode_step(content: &str) -> Result<Step, CodecError> {
    let doc = parse_front_matter(content)?;
    let get = |key: &str| doc.fields.get(key).map(String::as_str).unwrap_or("");
    let optional = |key: &str| {
        let value = get(key);
        (!value.is_empty()).then(|| value.to_string())
    };

    let kind = get("type");
    if !kind.is_empty() && kind != "step" {
        return Err(CodecError::UnsupportedDocumentType {
            kind: kind.to_string(),
        });
    }

    let id = get("step_id");
    if id.is_empty() {
        return Err(CodecError::MissingIdentifier);
    }
    let title = get("title");
    if title.is_empty() {
        return Err(CodecError::MissingTitle);
    }

    let order_raw = get("order");
    let order = if order_raw.is_empty() {
        0
    } else {
        order_raw
            .parse::<i64>()
            .map_err(|_| CodecError::InvalidOrder {
                value: order_raw.to_string(),
            })?
    };

    let status = get("status").parse()?;

    let updated_raw = get("updated_at");
    let updated_at = DateTime::parse_from_rfc3339(updated_raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CodecError::InvalidTimestamp {
            value: updated_raw.to_string(),
        })?;

    let ticket_raw = get("support_ticket_id");
    let support_ticket_id = if ticket_raw.is_empty() {
        None
    } else {
        Some(
            ticket_raw
                .parse::<i64>()
                .map_err(|_| CodecError::InvalidSupportTicketId {
                    value: ticket_raw.to_string(),
                })?,
        )
    };

    Ok(Step {
        id: id.to_string(),
        title: title.to_string(),
        desc: optional("desc"),
        href: optional("href"),
        note: optional("note"),
        status,
        order,
        support_ticket_id,
        deal_id: optional("deal_id"),
        checklist_key: optional("checklist_key"),
        updated_by: get("updated_by").to_string(),
        updated_at,
    })
}

/// Serialize tip content into its note document: front matter followed by
/// the markdown body. Tags are emitted as a one-line JSON array so labels
/// with commas or quotes survive.
pub fn encode_tip(tip: &TipDraft) -> String {
    let mut out = String::from("---\n");
    out.push_str("title: ");
    out.push_str(&format_value(&tip.title));
    out.push('\n');
    out.push_str("status: ");
    out.push_str(&tip.status.to_string());
    out.push('\n');
    out.push_str("tags: ");
    out.push_str(&serde_json::Value::from(tip.tags.clone()).to_string());
    out.push('\n');
    out.push_str("updated_by: ");
    out.push_str(&format_value(tip.updated_by.as_deref().unwrap_or("")));
    out.push('\n');
    out.push_str("updated_at: ");
    out.push_str(&format_value(&tip.updated_at.to_rfc3339()));
    out.push('\n');
    out.push_str("---\n");
    out.push_str(&tip.body_md);
    out
}

/// Tip content recovered from a note document. Fields the header did not
/// carry come back as `None`/empty; the store adapter backfills them from
/// the document's own metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTip {
    pub title: Option<String>,
    pub body_md: String,
    pub tags: Vec<String>,
    pub status: TipStatus,
    pub updated_by: Option<String>,
    pub updated_at: Option<Timestamp>,
}

fn parse_tag_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    if let Ok(tags) = serde_json::from_str::<Vec<String>>(raw) {
        return tags;
    }
    raw.split(',')
        .map(|tag| unquote(tag.trim()))
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Parse a note document into tip content. Total: a document without front
/// matter is treated as an untitled draft whose whole content is the body.
pub fn decode_tip(content: &str) -> DecodedTip {
    let Ok(doc) = parse_front_matter(content) else {
        return DecodedTip {
            title: None,
            body_md: content.to_string(),
            tags: Vec::new(),
            status: TipStatus::Draft,
            updated_by: None,
            updated_at: None,
        };
    };
    let get = |key: &str| doc.fields.get(key).map(String::as_str).unwrap_or("");
    let optional = |key: &str| {
        let value = get(key);
        (!value.is_empty()).then(|| value.to_string())
    };

    DecodedTip {
        title: optional("title"),
        body_md: doc.body,
        tags: parse_tag_list(get("tags")),
        status: TipStatus::from_str_lenient(get("status")),
        updated_by: optional("updated_by"),
        updated_at: DateTime::parse_from_rfc3339(get("updated_at"))
            .map(|dt| dt.with_timezone(&Utc))
            .ok(),
    }
}
