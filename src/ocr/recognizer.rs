use thiserror::Error;

#[derive(Debug, Error)]
#[error("text recognition failed: {0}")]
pub struct RecognitionError(pub String);

/// Raw output of the external OCR engine: recognized text plus an engine
/// confidence score from 0 to 100.
#[derive(Debug, Clone)]
pub struct RecognizedText {
    pub text: String,
    pub confidence: f32,
}

/// Seam for the external OCR engine. Implementations report fractional
/// progress (0.0 to 1.0) through the callback; the cadence is up to the
/// engine, callers only rely on progress being monotonic.
#[allow(async_fn_in_trait)]
pub trait TextRecognizer {
    async fn recognize(
        &self,
        image: &[u8],
        on_progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<RecognizedText, RecognitionError>;
}
