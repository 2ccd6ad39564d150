//! AI interaction records and the unified history view derived from them.
//!
//! `VoiceSession` and `TextConversation` are persisted in their own
//! collections. `HistoryRecord` is computed at read time and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded speaking-practice session with its lexical metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSession {
    pub id: String,
    pub student_id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub duration_seconds: u32,
    #[serde(default)]
    pub transcript: String,
    pub word_count: u32,
    pub unique_word_count: u32,
    /// Share of content words in the transcript, 0..=1.
    pub lexical_density: f64,
    /// Type/token ratio of the transcript, 0..=1.
    pub lexical_diversity: f64,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub linked_conversation_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// A turn-based text conversation with the AI tutor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextConversation {
    pub id: String,
    pub student_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Voice,
    Text,
}

impl SourceType {
    pub fn parse(value: &str) -> Option<SourceType> {
        match value {
            "voice" => Some(SourceType::Voice),
            "text" => Some(SourceType::Text),
            _ => None,
        }
    }
}

/// Source-specific part of a [`HistoryRecord`], discriminated by `sourceType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sourceType", rename_all = "lowercase")]
pub enum HistoryPayload {
    /// Voice summaries carry the complete session.
    #[serde(rename_all = "camelCase")]
    Voice {
        duration_seconds: u32,
        word_count: u32,
        unique_word_count: u32,
        lexical_density: f64,
        lexical_diversity: f64,
        transcript: String,
        feedback: Option<String>,
        linked_conversation_id: Option<String>,
    },
    /// Text summaries carry only a preview; the messages need a second fetch.
    #[serde(rename_all = "camelCase")]
    Text { preview: String, message_count: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    pub title: String,
    /// Creation timestamp of the originating record.
    pub display_date: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: HistoryPayload,
}

impl HistoryRecord {
    pub fn source_type(&self) -> SourceType {
        match self.payload {
            HistoryPayload::Voice { .. } => SourceType::Voice,
            HistoryPayload::Text { .. } => SourceType::Text,
        }
    }
}

/// Full content behind a history record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "sourceType", content = "record", rename_all = "lowercase")]
pub enum HistoryDetail {
    /// A voice summary already carries everything there is to show.
    Voice(HistoryRecord),
    Text(TextConversation),
}
