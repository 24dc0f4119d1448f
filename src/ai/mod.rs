//! AI service integration for image transformation
//!
//! Provides the seam between the transformation pipeline and the remote
//! generative image model.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::GeminiEditClient;
pub use mock::MockEditClient;

use crate::Result;
use async_trait::async_trait;

/// Source image handed to the remote model, already encoded for upload.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Image payload returned by the remote model.
#[derive(Debug, Clone)]
pub struct EditedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Outcome of a single edit call.
///
/// The model may answer with prose instead of (or alongside) an image; both
/// are carried so the caller can surface whichever came back.
#[derive(Debug, Clone, Default)]
pub struct EditOutcome {
    pub image: Option<EditedImage>,
    pub text: String,
}

#[async_trait]
pub trait ImageEditService: Send + Sync {
    async fn edit_image(&self, image: &InlineImage, prompt: &str) -> Result<EditOutcome>;
}
