//! Webhook event payloads and reply-path selection
//!
//! The platform delivers one JSON notification per inbound chat message.
//! Only `data.id`, `data.roomId` and `data.files` are read; everything else
//! in the payload is ignored.

use serde::Deserialize;
use thiserror::Error;

/// Structurally malformed webhook input.
///
/// Absent `files` is a valid, expected case and never an error; only a
/// non-JSON body or missing `data.id` / `data.roomId` ends up here.
#[derive(Error, Debug)]
pub enum InvalidEventError {
    /// The body was not valid JSON or lacked a required field.
    #[error("malformed webhook event: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Webhook notification envelope delivered by the chat platform.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    /// Details of the message that triggered the notification.
    pub data: EventData,
}

/// Message details inside a webhook notification.
#[derive(Debug, Deserialize)]
pub struct EventData {
    /// Message id, used to correlate log lines.
    pub id: String,

    /// Room the message was posted in; replies go back here.
    #[serde(rename = "roomId")]
    pub room_id: String,

    /// Attachment URLs; absent when the message carried no files.
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

/// Parse a raw webhook body into a typed event.
///
/// # Errors
///
/// Returns [`InvalidEventError`] when the body is not JSON or a required
/// field is missing.
pub fn parse_event(body: &[u8]) -> Result<WebhookEvent, InvalidEventError> {
    Ok(serde_json::from_slice(body)?)
}

/// Which way one invocation goes, decided purely from the event shape.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplyPath<'a> {
    /// No attachment: reply with the fixed "I need an image" text.
    TextOnly,
    /// Exactly one attachment: download it and classify.
    Classify(&'a str),
    /// More than one attachment: reply with the fixed clarification text.
    RejectMultiple,
}

/// Select the reply path for a validated event. Pure, no side effects.
#[must_use]
pub fn reply_path(data: &EventData) -> ReplyPath<'_> {
    match data.files.as_deref() {
        None | Some([]) => ReplyPath::TextOnly,
        Some([url]) => ReplyPath::Classify(url.as_str()),
        Some(_) => ReplyPath::RejectMultiple,
    }
}
