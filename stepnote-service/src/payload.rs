//! Step assembly and patch merging

use chrono::Utc;
use stepnote_core::{new_record_id, CodecError, Step, StepPatch, StepStatus, StepnoteResult};

/// Author-supplied fields for a new step.
#[derive(Debug, Clone, Default)]
pub struct NewStep {
    /// Explicit id; a fresh one is generated when absent.
    pub id: Option<String>,
    pub title: String,
    pub desc: Option<String>,
    pub href: Option<String>,
    pub note: Option<String>,
    pub status: Option<StepStatus>,
    pub order: Option<i64>,
    pub support_ticket_id: Option<i64>,
}

/// Build a full step record from authored input: fresh id when none was
/// supplied, `updated_at` stamped now, `updated_by` the acting agent.
pub fn build_step(input: NewStep, deal_id: Option<&str>, email: &str) -> StepnoteResult<Step> {
    if input.title.trim().is_empty() {
        return Err(CodecError::MissingTitle.into());
    }

    Ok(Step {
        id: input
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(new_record_id),
        title: input.title,
        desc: normalize(input.desc),
        href: normalize(input.href),
        note: normalize(input.note),
        status: input.status.unwrap_or(StepStatus::Pending),
        order: input.order.unwrap_or(0),
        support_ticket_id: input.support_ticket_id,
        deal_id: deal_id
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        // Attached by the store adapter from the resolved scope.
        checklist_key: None,
        updated_by: email.to_string(),
        updated_at: Utc::now(),
    })
}

/// Merge a patch onto the server's current record.
///
/// Set fields override, unset fields inherit. For the optional text fields
/// an empty string explicitly clears the field; cleared fields are stored
/// as absent. Identity fields and the audit stamps are untouched here -
/// the service stamps `updated_by`/`updated_at` after merging.
pub fn apply_patch(current: &Step, patch: &StepPatch) -> Step {
    Step {
        id: current.id.clone(),
        title: patch.title.clone().unwrap_or_else(|| current.title.clone()),
        desc: merge_text(&current.desc, &patch.desc),
        href: merge_text(&current.href, &patch.href),
        note: merge_text(&current.note, &patch.note),
        status: patch.status.unwrap_or(current.status),
        order: patch.order.unwrap_or(current.order),
        support_ticket_id: patch.support_ticket_id.or(current.support_ticket_id),
        deal_id: current.deal_id.clone(),
        checklist_key: current.checklist_key.clone(),
        updated_by: current.updated_by.clone(),
        updated_at: current.updated_at,
    }
}

fn merge_text(current: &Option<String>, patch: &Option<String>) -> Option<String> {
    match patch {
        None => current.clone(),
        Some(value) if value.is_empty() => None,
        Some(value) => Some(value.clone()),
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_generates_id_and_defaults() {
        let step = build_step(
            NewStep {
                title: "Firmar consentimiento".to_string(),
                ..NewStep::default()
            },
            None,
            "agente@example.cl",
        )
        .unwrap();
        assert!(!step.id.is_empty());
        assert_eq!(step.status, StepStatus::Pending);
        assert_eq!(step.order, 0);
        assert_eq!(step.updated_by, "agente@example.cl");
    }

    #[test]
    fn build_keeps_a_supplied_id() {
        let step = build_step(
            NewStep {
                id: Some("s1".to_string()),
                title: "x".to_string(),
                ..NewStep::default()
            },
            None,
            "agente@example.cl",
        )
        .unwrap();
        assert_eq!(step.id, "s1");
    }

    #[test]
    fn build_requires_a_title() {
        let err = build_step(
            NewStep {
                title: "   ".to_string(),
                ..NewStep::default()
            },
            None,
            "agente@example.cl",
        )
        .unwrap_err();
        assert_eq!(err, CodecError::MissingTitle.into());
    }

    #[test]
    fn blank_deal_id_means_global_scope() {
        let step = build_step(
            NewStep {
                title: "x".to_string(),
                ..NewStep::default()
            },
            Some("  "),
            "agente@example.cl",
        )
        .unwrap();
        assert_eq!(step.deal_id, None);
    }

    fn current() -> Step {
        build_step(
            NewStep {
                id: Some("s1".to_string()),
                title: "Original".to_string(),
                desc: Some("detalle".to_string()),
                order: Some(3),
                ..NewStep::default()
            },
            None,
            "agente@example.cl",
        )
        .unwrap()
    }

    #[test]
    fn unset_patch_fields_inherit() {
        let current = current();
        let merged = apply_patch(&current, &StepPatch::default());
        assert_eq!(merged, current);
    }

    #[test]
    fn set_patch_fields_override() {
        let merged = apply_patch(
            &current(),
            &StepPatch {
                title: Some("Nuevo".to_string()),
                status: Some(StepStatus::Done),
                ..StepPatch::default()
            },
        );
        assert_eq!(merged.title, "Nuevo");
        assert_eq!(merged.status, StepStatus::Done);
        assert_eq!(merged.order, 3);
        assert_eq!(merged.desc.as_deref(), Some("detalle"));
    }

    #[test]
    fn empty_string_clears_a_text_field() {
        let merged = apply_patch(
            &current(),
            &StepPatch {
                desc: Some(String::new()),
                ..StepPatch::default()
            },
        );
        assert_eq!(merged.desc, None);
    }
}
