//! Request-handling pipeline
//!
//! One invocation per webhook event: validate the event shape, optionally
//! download and classify the single attachment, then post the verdict back
//! to the room. Strictly sequential, no retries, nothing persisted.

use crate::event::{reply_path, ReplyPath, WebhookEvent};
use crate::vision::{ClassificationError, LabelDetector};
use crate::webex::{DownloadError, PostError, WebexClient};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

const NO_IMAGE_REPLY: &str =
    "Hey there, your text is not a hotdog.. I need an image to analyze.";
const MULTIPLE_IMAGES_REPLY: &str = "Sorry, I can only handle one image at a time!";
const HOTDOG_REPLY: &str = "Hotdog ✅";
const NOT_HOTDOG_REPLY: &str = "Not hotdog ❌";

/// Failure of one invocation, propagated to the invoking platform.
///
/// When download or classification fails the room receives no reply at all;
/// when the post itself fails the decision work is lost.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Attachment fetch failed; no reply was attempted.
    #[error(transparent)]
    Download(#[from] DownloadError),
    /// Label detection failed; no reply was attempted.
    #[error(transparent)]
    Classification(#[from] ClassificationError),
    /// The reply could not be delivered.
    #[error(transparent)]
    Post(#[from] PostError),
}

/// Orchestrates the validate → download → classify → reply pipeline.
pub struct MessageHandler {
    webex: WebexClient,
    detector: Arc<dyn LabelDetector>,
}

impl MessageHandler {
    /// Wire the handler to its two collaborators.
    #[must_use]
    pub fn new(webex: WebexClient, detector: Arc<dyn LabelDetector>) -> Self {
        Self { webex, detector }
    }

    /// Handle one webhook event end to end.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when any collaborator call fails. No
    /// internal retries; the caller owns the error policy.
    pub async fn handle(&self, event: &WebhookEvent) -> Result<(), HandlerError> {
        let data = &event.data;
        info!(message_id = %data.id, room_id = %data.room_id, "Validating message");

        let reply = match reply_path(data) {
            ReplyPath::TextOnly => {
                info!(message_id = %data.id, "No files found in message");
                NO_IMAGE_REPLY
            }
            ReplyPath::RejectMultiple => {
                info!(message_id = %data.id, "More than one file found in message");
                MULTIPLE_IMAGES_REPLY
            }
            ReplyPath::Classify(url) => {
                info!(message_id = %data.id, "Downloading image");
                let image = self.webex.fetch_attachment(url).await?;

                info!(message_id = %data.id, size = image.len(), "Checking for hotdogs");
                if self.detector.detect_hotdog(&image).await? {
                    info!(message_id = %data.id, "Hotdog detected");
                    HOTDOG_REPLY
                } else {
                    info!(message_id = %data.id, "Hotdog not detected");
                    NOT_HOTDOG_REPLY
                }
            }
        };

        self.webex.post_message(&data.room_id, reply).await?;
        Ok(())
    }
}
