use async_trait::async_trait;
use tracing::debug;

use triage_common::{ImageAnalysis, TriageError};

/// Category/severity guess from raw image bytes. Implementations own any
/// decoding and model calls; the engine only consumes the verdict.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<ImageAnalysis, TriageError>;
}

/// Used when no image model is deployed: every image gets the degraded
/// "unable to analyze" verdict.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableImageClassifier;

#[async_trait]
impl ImageClassifier for UnavailableImageClassifier {
    async fn classify(&self, image: &[u8]) -> Result<ImageAnalysis, TriageError> {
        debug!(bytes = image.len(), "No image model configured");
        Ok(ImageAnalysis::unreadable())
    }
}
