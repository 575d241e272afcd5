//! Stepnote Store - Document Store Adapters
//!
//! The only code path allowed to talk to the backing document store. The
//! `NoteStore` trait abstracts the CRM's coarse note CRUD; two HTTP backends
//! implement it (plain notes and custom-object records), selected once at
//! construction and never branched on per call. `StepStore` and `TipStore`
//! layer the tag filter and record codec on top.

pub mod config;
pub mod custom_objects;
pub mod document;
pub mod http;
pub mod mock;
pub mod notes;
pub mod steps;
pub mod tips;

pub use config::{BackendKind, RetryConfig, StoreConfig};
pub use custom_objects::CustomObjectsBackend;
pub use document::{NoteDocument, NoteStore};
pub use http::CrmClient;
pub use mock::MockNoteStore;
pub use notes::NotesBackend;
pub use steps::{StepStore, StoredStep};
pub use tips::TipStore;

use std::sync::Arc;

/// Build the backend selected by configuration.
pub fn backend_from_config(config: &StoreConfig) -> Arc<dyn NoteStore> {
    let client = CrmClient::new(config);
    match config.backend {
        BackendKind::Notes => Arc::new(NotesBackend::new(client, config.contact_id)),
        BackendKind::CustomObjects => {
            Arc::new(CustomObjectsBackend::new(client, "stepnote_doc"))
        }
    }
}
