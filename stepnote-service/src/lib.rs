//! Stepnote Service - Request-Scoped Orchestration
//!
//! One service call per inbound request: identity check, safety gate,
//! optimistic-concurrency protocol, store adapter. No shared mutable cache
//! and no in-process locks; concurrent writers race at the store and the
//! stale one is rejected at commit time.

pub mod checklist;
pub mod identity;
pub mod payload;
pub mod tips;

pub use checklist::ChecklistService;
pub use identity::{AgentDirectory, RequestUser};
pub use payload::NewStep;
pub use tips::{TipInput, TipService};
