//! Tag index scheme
//!
//! The backing store can only list documents in a coarse resource scope, so
//! per-checklist / per-step / per-deal queries are emulated by attaching
//! exact-match labels to every document and filtering listings client-side.
//! False positives are structurally impossible; completeness is bounded by
//! the caller's listing page size, which is a documented limitation of the
//! store, not something this module can hide.

use crate::error::TagError;

/// Marker label on every step document.
pub const STEP_MARKER: &str = "step";

/// Marker label on every tip document. Never surfaced as a user tag.
pub const TIP_MARKER: &str = "tip";

const CHECKLIST_PREFIX: &str = "checklist:";
const STEP_PREFIX: &str = "step:";
const DEAL_PREFIX: &str = "deal:";

/// Compute the labels for a step document.
///
/// Always includes the step marker, the checklist label, and the step label;
/// the deal label is present only when the step is deal-scoped. A deal id
/// that trims to empty counts as no deal.
pub fn step_tags(
    checklist_key: &str,
    step_id: &str,
    deal_id: Option<&str>,
) -> Result<Vec<String>, TagError> {
    let key = checklist_key.trim();
    let step = step_id.trim();
    if key.is_empty() {
        return Err(TagError::InvalidKey {
            field: "checklist key",
        });
    }
    if step.is_empty() {
        return Err(TagError::InvalidKey { field: "step id" });
    }

    let mut tags = vec![
        STEP_MARKER.to_string(),
        format!("{CHECKLIST_PREFIX}{key}"),
        format!("{STEP_PREFIX}{step}"),
    ];
    if let Some(deal) = deal_id.map(str::trim).filter(|d| !d.is_empty()) {
        tags.push(format!("{DEAL_PREFIX}{deal}"));
    }
    Ok(tags)
}

/// Whether a document's labels match the given identity.
///
/// With no `deal_id`, documents both with and without a deal label match:
/// the global scope deliberately includes all deals, and narrower callers
/// must pass the deal id explicitly.
pub fn step_matches(
    labels: &[String],
    checklist_key: &str,
    step_id: Option<&str>,
    deal_id: Option<&str>,
) -> bool {
    let has = |wanted: String| labels.iter().any(|label| *label == wanted);

    if !labels.iter().any(|label| label == STEP_MARKER) {
        return false;
    }
    if !has(format!("{CHECKLIST_PREFIX}{}", checklist_key.trim())) {
        return false;
    }
    if let Some(step) = step_id {
        if !has(format!("{STEP_PREFIX}{}", step.trim())) {
            return false;
        }
    }
    if let Some(deal) = deal_id.map(str::trim).filter(|d| !d.is_empty()) {
        if !has(format!("{DEAL_PREFIX}{deal}")) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_all_labels_for_a_deal_scoped_step() {
        let tags = step_tags("onboarding-v1", "s1", Some("deal-42")).unwrap();
        assert_eq!(
            tags,
            vec![
                "step".to_string(),
                "checklist:onboarding-v1".to_string(),
                "step:s1".to_string(),
                "deal:deal-42".to_string(),
            ]
        );
    }

    #[test]
    fn omits_deal_label_for_global_steps() {
        let tags = step_tags("onboarding-v1", "s1", None).unwrap();
        assert!(!tags.iter().any(|t| t.starts_with("deal:")));
    }

    #[test]
    fn blank_keys_are_rejected() {
        assert!(step_tags("  ", "s1", None).is_err());
        assert!(step_tags("onboarding-v1", "", None).is_err());
    }

    #[test]
    fn empty_deal_id_counts_as_global() {
        let tags = step_tags("onboarding-v1", "s1", Some("  ")).unwrap();
        assert_eq!(tags.len(), 3);
    }

    #[test]
    fn global_match_includes_deal_scoped_documents() {
        let tags = step_tags("onboarding-v1", "s1", Some("deal-42")).unwrap();
        assert!(step_matches(&tags, "onboarding-v1", Some("s1"), None));
        assert!(step_matches(&tags, "onboarding-v1", None, None));
    }

    #[test]
    fn wrong_deal_does_not_match() {
        let tags = step_tags("onboarding-v1", "s1", Some("deal-42")).unwrap();
        assert!(!step_matches(&tags, "onboarding-v1", Some("s1"), Some("deal-99")));
    }

    #[test]
    fn wrong_checklist_or_step_does_not_match() {
        let tags = step_tags("onboarding-v1", "s1", None).unwrap();
        assert!(!step_matches(&tags, "onboarding-v2", Some("s1"), None));
        assert!(!step_matches(&tags, "onboarding-v1", Some("s2"), None));
    }

    #[test]
    fn marker_is_required() {
        let labels = vec![
            "checklist:onboarding-v1".to_string(),
            "step:s1".to_string(),
        ];
        assert!(!step_matches(&labels, "onboarding-v1", Some("s1"), None));
    }
}
