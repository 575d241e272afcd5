//! Stepnote Core - Record Types and Pure Logic
//!
//! Data structures, the front-matter record codec, the tag index scheme,
//! and the content safety gate. No I/O lives here; the store and service
//! crates depend on this one.

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod codec;
pub mod entities;
pub mod enums;
pub mod error;
pub mod render;
pub mod safety;
pub mod tags;

pub use codec::{decode_step, decode_tip, encode_step, encode_tip, DecodedTip};
pub use entities::{Step, StepPatch, Tip, TipDraft};
pub use enums::{StepStatus, TipStatus};
pub use error::{
    AuthError, CodecError, ConfigError, SafetyError, StepnoteError, StepnoteResult, StoreError,
    SyncError, TagError,
};
pub use render::MarkdownRenderer;
pub use safety::SafetyPolicy;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a fresh record id.
///
/// UUIDv7 embeds a Unix timestamp, so generated ids sort by creation time.
/// Ids are stored as plain text: the backing store only knows opaque strings,
/// and caller-supplied ids are accepted as-is.
pub fn new_record_id() -> String {
    Uuid::now_v7().to_string()
}
