use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::error_handling::types::{DataError, StorageError};
use crate::models::{
    ChatMessage, HistoryDetail, HistoryPayload, HistoryRecord, MessageRole, SourceType, TextConversation,
    VoiceSession,
};
use crate::storage::{Collection, Store};

/// Maximum length, in characters, of a text conversation preview.
pub const PREVIEW_CHARS: usize = 120;

const UNTITLED_VOICE: &str = "Voice practice";

fn summarize_voice(session: &VoiceSession) -> HistoryRecord {
    HistoryRecord {
        id: session.id.clone(),
        title: session.title.clone().unwrap_or_else(|| UNTITLED_VOICE.to_string()),
        display_date: session.created_at,
        payload: HistoryPayload::Voice {
            duration_seconds: session.duration_seconds,
            word_count: session.word_count,
            unique_word_count: session.unique_word_count,
            lexical_density: session.lexical_density,
            lexical_diversity: session.lexical_diversity,
            transcript: session.transcript.clone(),
            feedback: session.feedback.clone(),
            linked_conversation_id: session.linked_conversation_id.clone(),
        },
    }
}

fn summarize_text(conversation: &TextConversation) -> HistoryRecord {
    let preview = conversation
        .messages
        .last()
        .map(|m| m.content.chars().take(PREVIEW_CHARS).collect())
        .unwrap_or_default();
    HistoryRecord {
        id: conversation.id.clone(),
        title: conversation.title.clone(),
        display_date: conversation.created_at,
        payload: HistoryPayload::Text {
            preview,
            message_count: conversation.messages.len(),
        },
    }
}

/// Every voice and text record of `student_id`, newest first.
///
/// Records sharing a timestamp keep their collection order, voice before text.
pub fn list_history(store: &Store, student_id: &str) -> Result<Vec<HistoryRecord>, StorageError> {
    let voice: Vec<VoiceSession> = store.read(Collection::VoiceSessions)?;
    let text: Vec<TextConversation> = store.read(Collection::TextConversations)?;

    let mut records: Vec<HistoryRecord> = voice
        .iter()
        .filter(|s| s.student_id == student_id)
        .map(summarize_voice)
        .chain(
            text.iter()
                .filter(|c| c.student_id == student_id)
                .map(summarize_text),
        )
        .collect();
    records.sort_by(|a, b| b.display_date.cmp(&a.display_date));
    debug!("History for {}: {} record(s)", student_id, records.len());
    Ok(records)
}

/// Second-phase fetch of a full conversation.
pub fn fetch_conversation(store: &Store, conversation_id: &str) -> Result<TextConversation, DataError> {
    let text: Vec<TextConversation> = store.read(Collection::TextConversations)?;
    text.into_iter()
        .find(|c| c.id == conversation_id)
        .ok_or_else(|| DataError::not_found("text conversation", conversation_id))
}

/// Resolves a summary to its full detail. Only text records hit the store.
pub fn view_detail(store: &Store, record: &HistoryRecord) -> Result<HistoryDetail, DataError> {
    match record.payload {
        HistoryPayload::Voice { .. } => Ok(HistoryDetail::Voice(record.clone())),
        HistoryPayload::Text { .. } => fetch_conversation(store, &record.id).map(HistoryDetail::Text),
    }
}

/// Permanently removes the source record behind a history entry.
///
/// Only the collection named by `source` is touched.
pub fn delete_record(store: &Store, source: SourceType, id: &str) -> Result<(), DataError> {
    match source {
        SourceType::Voice => store.update(Collection::VoiceSessions, |sessions: &mut Vec<VoiceSession>| {
            remove_by_id(sessions, |s| s.id == id, "voice session", id)
        }),
        SourceType::Text => store.update(Collection::TextConversations, |convs: &mut Vec<TextConversation>| {
            remove_by_id(convs, |c| c.id == id, "text conversation", id)
        }),
    }?;
    info!("Deleted {:?} history record {}", source, id);
    Ok(())
}

fn remove_by_id<T>(
    items: &mut Vec<T>,
    matches: impl Fn(&T) -> bool,
    kind: &'static str,
    id: &str,
) -> Result<(), DataError> {
    let idx = items
        .iter()
        .position(matches)
        .ok_or_else(|| DataError::not_found(kind, id))?;
    items.remove(idx);
    Ok(())
}

/// Inserts `session`, replacing any stored session with the same id.
pub fn record_voice_session(store: &Store, session: VoiceSession) -> Result<(), DataError> {
    if session.id.is_empty() || session.student_id.is_empty() {
        return Err(DataError::Malformed("voice session needs an id and a student id".into()));
    }
    for (name, value) in [("lexicalDensity", session.lexical_density), ("lexicalDiversity", session.lexical_diversity)] {
        if !(0.0..=1.0).contains(&value) {
            return Err(DataError::Malformed(format!("{} must be within 0..=1, got {}", name, value)));
        }
    }
    store.update(Collection::VoiceSessions, |sessions: &mut Vec<VoiceSession>| {
        upsert(sessions, session, |s| s.id.clone());
        Ok(())
    })
}

/// Inserts `conversation`, replacing any stored conversation with the same id.
pub fn record_text_conversation(store: &Store, conversation: TextConversation) -> Result<(), DataError> {
    if conversation.id.is_empty() || conversation.student_id.is_empty() {
        return Err(DataError::Malformed("conversation needs an id and a student id".into()));
    }
    store.update(Collection::TextConversations, |convs: &mut Vec<TextConversation>| {
        upsert(convs, conversation, |c| c.id.clone());
        Ok(())
    })
}

fn upsert<T>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> String) {
    let id = key(&item);
    match items.iter_mut().find(|existing| key(existing) == id) {
        Some(slot) => *slot = item,
        None => items.push(item),
    }
}

/// Appends one message to a stored conversation and bumps its `updatedAt`.
pub fn append_message(
    store: &Store,
    conversation_id: &str,
    role: MessageRole,
    content: &str,
    sent_at: DateTime<Utc>,
) -> Result<TextConversation, DataError> {
    if content.trim().is_empty() {
        return Err(DataError::Malformed("message content is empty".into()));
    }
    store.update(Collection::TextConversations, |convs: &mut Vec<TextConversation>| {
        let conversation = convs
            .iter_mut()
            .find(|c| c.id == conversation_id)
            .ok_or_else(|| DataError::not_found("text conversation", conversation_id))?;
        conversation.messages.push(ChatMessage {
            role,
            content: content.to_string(),
            sent_at,
        });
        conversation.updated_at = conversation.updated_at.max(sent_at);
        Ok(conversation.clone())
    })
}
