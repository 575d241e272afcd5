//! Enum types for stepnote records

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a checklist step.
///
/// Exactly two values. Anything else in a stored record is a hard codec
/// error, never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Done,
}

impl StepStatus {
    /// The opposite status, used by toggle operations.
    pub fn flipped(self) -> Self {
        match self {
            StepStatus::Pending => StepStatus::Done,
            StepStatus::Done => StepStatus::Pending,
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Pending => write!(f, "pending"),
            StepStatus::Done => write!(f, "done"),
        }
    }
}

impl FromStr for StepStatus {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "done" => Ok(StepStatus::Done),
            _ => Err(CodecError::InvalidStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// Publication status of a tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipStatus {
    Draft,
    Published,
}

impl fmt::Display for TipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TipStatus::Draft => write!(f, "draft"),
            TipStatus::Published => write!(f, "published"),
        }
    }
}

impl TipStatus {
    /// Lenient parse used by the tip codec: anything that is not exactly
    /// `published` reads back as a draft, so hand-edited notes stay private
    /// rather than leaking.
    pub fn from_str_lenient(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("published") {
            TipStatus::Published
        } else {
            TipStatus::Draft
        }
    }
}
