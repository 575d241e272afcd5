//! Tip service

use crate::identity::AgentDirectory;
use chrono::Utc;
use stepnote_core::{CodecError, SafetyPolicy, StepnoteResult, Tip, TipDraft, TipStatus};
use stepnote_store::TipStore;

/// Author-supplied tip content. `body_html` is deliberately not accepted;
/// it is derived on read.
#[derive(Debug, Clone)]
pub struct TipInput {
    pub title: String,
    pub body_md: String,
    pub tags: Vec<String>,
    pub status: TipStatus,
}

pub struct TipService {
    tips: TipStore,
    safety: SafetyPolicy,
    agents: AgentDirectory,
}

impl TipService {
    pub fn new(tips: TipStore, safety: SafetyPolicy, agents: AgentDirectory) -> Self {
        Self {
            tips,
            safety,
            agents,
        }
    }

    /// Public read: published tips only.
    pub async fn list_public(&self) -> StepnoteResult<Vec<Tip>> {
        self.tips.list(false).await
    }

    /// Agent read: drafts included.
    pub async fn list_all(&self, email: Option<&str>) -> StepnoteResult<Vec<Tip>> {
        self.agents.require_agent(email)?;
        self.tips.list(true).await
    }

    pub async fn get(&self, id: &str) -> StepnoteResult<Option<Tip>> {
        self.tips.get(id).await
    }

    /// Create (no id) or rewrite (with id) a tip. The safety gate runs
    /// before anything reaches the store.
    pub async fn save(
        &self,
        id: Option<&str>,
        input: TipInput,
        email: Option<&str>,
    ) -> StepnoteResult<Tip> {
        let email = self.agents.require_agent(email)?;
        if input.title.trim().is_empty() {
            return Err(CodecError::MissingTitle.into());
        }
        self.safety.check_tip(&input.title, &input.body_md)?;

        let draft = TipDraft {
            title: input.title,
            body_md: input.body_md,
            tags: input.tags,
            status: input.status,
            updated_by: Some(email),
            updated_at: Utc::now(),
        };
        self.tips.save(id, &draft).await
    }

    pub async fn delete(&self, id: &str, email: Option<&str>) -> StepnoteResult<()> {
        self.agents.require_agent(email)?;
        self.tips.delete(id).await
    }
}
