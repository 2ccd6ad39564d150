//! Unified AI-interaction history.
//!
//! Voice sessions and text conversations live in separate collections. The
//! unifier projects both into tagged [`HistoryRecord`](crate::models::HistoryRecord)s
//! and routes detail fetches and deletions back to the owning collection.

pub mod history_unifier;

pub use history_unifier::{
    append_message, delete_record, fetch_conversation, list_history, record_text_conversation,
    record_voice_session, view_detail, PREVIEW_CHARS,
};
