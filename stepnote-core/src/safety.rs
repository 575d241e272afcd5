//! Content safety gate
//!
//! A pure predicate over a record's textual fields, run before encoding on
//! every create/update. A failure blocks the write entirely; there is no
//! sanitize-and-continue path. The gate catches the ways clinical data has
//! leaked into checklist notes before: pasted patient emails, long numeric
//! identifiers, and clinical vocabulary.

use crate::entities::Step;
use crate::error::SafetyError;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").expect("static email pattern")
});

static LONG_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{8,}\b").expect("static long-number pattern"));

/// Clinical vocabulary that must never appear in stored content.
const BLOCKED_TERM_PATTERNS: [&str; 8] = [
    r"(?i)diagn[oó]st",
    r"(?i)historial cl[ií]nico",
    r"(?i)resultados? m[eé]dicos?",
    r"(?i)presi[oó]n",
    r"(?i)medicaci[oó]n",
    r"(?i)tratamiento",
    r"(?i)enfermedad",
    r"(?i)\b(rut|ssn)\b",
];

static BLOCKED_TERMS: Lazy<Vec<Regex>> = Lazy::new(|| {
    BLOCKED_TERM_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("static blocked-term pattern"))
        .collect()
});

/// Safety policy for authored content.
#[derive(Debug, Clone)]
pub struct SafetyPolicy {
    /// Organization email domain; any email under another domain is blocked.
    org_domain: String,
    /// Cap on the combined length of all checked fields.
    max_combined_len: usize,
}

impl SafetyPolicy {
    pub fn new(org_domain: impl Into<String>) -> Self {
        Self {
            org_domain: org_domain.into().trim_start_matches('@').to_lowercase(),
            max_combined_len: 10_000,
        }
    }

    pub fn with_max_combined_len(mut self, max: usize) -> Self {
        self.max_combined_len = max;
        self
    }

    /// Check a step's textual fields.
    pub fn check_step(&self, step: &Step) -> Result<(), SafetyError> {
        let fields = [
            Some(step.title.as_str()),
            step.desc.as_deref(),
            step.note.as_deref(),
            step.href.as_deref(),
        ];
        let combined = fields.into_iter().flatten().collect::<Vec<_>>().join("\n");
        self.check_text(&combined)
    }

    /// Check tip content (title plus markdown body).
    pub fn check_tip(&self, title: &str, body_md: &str) -> Result<(), SafetyError> {
        self.check_text(&format!("{title}\n{body_md}"))
    }

    /// Check a combined text blob against every rule.
    pub fn check_text(&self, combined: &str) -> Result<(), SafetyError> {
        if combined.len() > self.max_combined_len {
            return Err(unsafe_content("contenido demasiado largo"));
        }

        let suffix = format!("@{}", self.org_domain);
        for email in EMAIL.find_iter(combined) {
            if !email.as_str().to_lowercase().ends_with(&suffix) {
                return Err(unsafe_content("email externo"));
            }
        }

        if LONG_NUMBER.is_match(combined) {
            return Err(unsafe_content("identificadores prolongados"));
        }

        if BLOCKED_TERMS.iter().any(|re| re.is_match(combined)) {
            return Err(unsafe_content("términos clínicos"));
        }

        Ok(())
    }
}

fn unsafe_content(reason: &str) -> SafetyError {
    SafetyError::UnsafeContent {
        reason: reason.to_string(),
    }
}
