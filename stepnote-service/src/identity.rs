//! Identity boundary
//!
//! The HTTP collaborator resolves headers/cookies into an email; this module
//! only decides whether that email belongs to an authorized agent. The
//! allow-list is part of constructed configuration, not read lazily.

use stepnote_core::AuthError;

/// Resolved identity of an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUser {
    pub email: Option<String>,
    pub is_agent: bool,
}

/// Allow-list of agent emails.
#[derive(Debug, Clone, Default)]
pub struct AgentDirectory {
    allowed: Vec<String>,
}

impl AgentDirectory {
    /// Build from an iterator of emails; entries are trimmed, lowercased,
    /// and blanks dropped.
    pub fn new(emails: impl IntoIterator<Item = String>) -> Self {
        Self {
            allowed: emails
                .into_iter()
                .map(|email| email.trim().to_lowercase())
                .filter(|email| !email.is_empty())
                .collect(),
        }
    }

    /// Build from the `STEPNOTE_ALLOWED_AGENT_EMAILS` comma-separated
    /// environment variable. An unset variable means nobody is an agent.
    pub fn from_env() -> Self {
        let raw = std::env::var("STEPNOTE_ALLOWED_AGENT_EMAILS").unwrap_or_default();
        Self::new(raw.split(',').map(str::to_string))
    }

    pub fn is_agent(&self, email: &str) -> bool {
        let normalized = email.trim().to_lowercase();
        !normalized.is_empty() && self.allowed.contains(&normalized)
    }

    /// Resolve an optional email into a request identity.
    pub fn resolve(&self, email: Option<&str>) -> RequestUser {
        let normalized = email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());
        let is_agent = normalized.as_deref().is_some_and(|e| self.is_agent(e));
        RequestUser {
            email: normalized,
            is_agent,
        }
    }

    /// Require an authorized agent, returning the normalized email that
    /// will stamp `updated_by`.
    pub fn require_agent(&self, email: Option<&str>) -> Result<String, AuthError> {
        let user = self.resolve(email);
        match user.email {
            Some(email) if user.is_agent => Ok(email),
            _ => Err(AuthError::Forbidden),
        }
    }
}
