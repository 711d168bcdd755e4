//! Label detection via Amazon Rekognition
//!
//! The [`LabelDetector`] trait is the seam between the handler and the
//! detection service, so the pipeline can be exercised without AWS.

use async_trait::async_trait;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Image, Label};
use aws_sdk_rekognition::Client;
use thiserror::Error;
use tracing::debug;

/// Minimum confidence (percent scale) requested from the detection service.
const MIN_CONFIDENCE: f32 = 80.0;

/// Label name that counts as a positive detection. Case-sensitive.
const HOTDOG_LABEL: &str = "Hot Dog";

/// Label service failure.
///
/// Deliberately distinct from a negative detection — "the service could not
/// tell" must never be reported as "not a hotdog".
#[derive(Error, Debug)]
pub enum ClassificationError {
    /// The detect-labels call failed (network, quota, malformed image,
    /// service fault).
    #[error("label detection failed: {0}")]
    DetectLabels(String),
}

/// Unified interface for label-detection backends
#[async_trait]
pub trait LabelDetector: Send + Sync {
    /// Classify raw image bytes: true iff a hot dog is detected.
    ///
    /// # Errors
    ///
    /// Returns [`ClassificationError`] when the detection call itself fails.
    async fn detect_hotdog(&self, image: &[u8]) -> Result<bool, ClassificationError>;
}

/// Amazon Rekognition object-and-scene detection backend.
#[derive(Debug, Clone)]
pub struct RekognitionDetector {
    client: Client,
}

impl RekognitionDetector {
    /// Create a detector from a shared AWS SDK configuration.
    #[must_use]
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl LabelDetector for RekognitionDetector {
    async fn detect_hotdog(&self, image: &[u8]) -> Result<bool, ClassificationError> {
        let response = self
            .client
            .detect_labels()
            .image(Image::builder().bytes(Blob::new(image)).build())
            .min_confidence(MIN_CONFIDENCE)
            .send()
            .await
            .map_err(|e| ClassificationError::DetectLabels(e.to_string()))?;

        debug!(labels = response.labels().len(), "Labels detected");
        Ok(contains_hotdog(response.labels()))
    }
}

fn contains_hotdog(labels: &[Label]) -> bool {
    labels.iter().any(|label| label.name() == Some(HOTDOG_LABEL))
}
