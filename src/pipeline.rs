//! The image transformation pipeline.
//!
//! One call runs validate → invoke → decode → persist-temp → reply. Every
//! failure mode is converted into an error reply at this boundary; callers
//! never see a panic or a raw `Err`.

use crate::ai::{mime, GeminiEditClient, ImageEditService, InlineImage};
use crate::artifact::ArtifactStore;
use crate::config::Config;
use crate::{Error, Result};
use std::path::PathBuf;
use tracing::{error, info};

/// One transformation request: the source image and the edit instruction.
#[derive(Debug, Clone)]
pub struct TransformRequest {
    pub image: Vec<u8>,
    pub prompt: String,
}

impl TransformRequest {
    pub fn new(image: Vec<u8>, prompt: impl Into<String>) -> Self {
        Self {
            image,
            prompt: prompt.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformStatus {
    Success,
    Error,
}

/// Reply handed back to the calling layer.
///
/// `message` carries the human-readable error on failure, and any prose the
/// model produced alongside the image on success.
#[derive(Debug)]
pub struct TransformReply {
    pub status: TransformStatus,
    pub image: Option<Vec<u8>>,
    pub artifact: Option<PathBuf>,
    pub message: String,
}

impl TransformReply {
    pub fn is_success(&self) -> bool {
        self.status == TransformStatus::Success
    }

    fn success(image: Vec<u8>, artifact: PathBuf, message: String) -> Self {
        Self {
            status: TransformStatus::Success,
            image: Some(image),
            artifact: Some(artifact),
            message,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            status: TransformStatus::Error,
            image: None,
            artifact: None,
            message: message.into(),
        }
    }
}

/// Stateless transformation pipeline; consecutive calls are independent.
pub struct TransformPipeline {
    editor: Box<dyn ImageEditService>,
    store: ArtifactStore,
    max_input_bytes: Option<u64>,
}

impl std::fmt::Debug for TransformPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformPipeline")
            .field("max_input_bytes", &self.max_input_bytes)
            .finish_non_exhaustive()
    }
}

impl TransformPipeline {
    /// Build a pipeline talking to Gemini with the given configuration.
    ///
    /// An absent credential is rejected here, before any request can be
    /// constructed.
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::InvalidInput(
                "GEMINI_API_KEY is missing or empty".to_string(),
            ));
        }

        let editor = Box::new(GeminiEditClient::new(
            config.api_key.clone(),
            config.model.clone(),
            config.request_timeout,
        ));

        Ok(Self {
            editor,
            store: ArtifactStore::in_temp_dir(),
            max_input_bytes: config.max_input_bytes,
        })
    }

    /// Build a pipeline from concrete service dependencies.
    ///
    /// This is primarily useful for integration tests that need to inject
    /// mocks.
    pub fn with_editor(editor: Box<dyn ImageEditService>, store: ArtifactStore) -> Self {
        Self {
            editor,
            store,
            max_input_bytes: None,
        }
    }

    pub fn with_max_input_bytes(mut self, limit: u64) -> Self {
        self.max_input_bytes = Some(limit);
        self
    }

    /// Run one transformation. Never panics and never returns `Err`.
    pub async fn transform(&self, request: &TransformRequest) -> TransformReply {
        match self.run(request).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Transformation failed: {}", e);
                TransformReply::failure(e.to_string())
            }
        }
    }

    async fn run(&self, request: &TransformRequest) -> Result<TransformReply> {
        let upload = self.prepare_upload(request)?;

        info!(
            "Requesting transformation ({} upload bytes, {} prompt chars)",
            upload.data.len(),
            request.prompt.len()
        );
        let outcome = self.editor.edit_image(&upload, &request.prompt).await?;

        let Some(edited) = outcome.image else {
            // The model answered with prose instead of an image; surface it.
            let message = if outcome.text.trim().is_empty() {
                "The model returned no image".to_string()
            } else {
                outcome.text
            };
            return Ok(TransformReply::failure(message));
        };

        image::load_from_memory(&edited.data).map_err(|e| {
            Error::Decode(format!("Returned payload is not a valid image: {}", e))
        })?;

        let extension = mime::extension_for_mime(&edited.mime_type);
        let artifact = self.store.store(&edited.data, extension)?;
        info!("Transformation complete, artifact at {}", artifact.display());

        Ok(TransformReply::success(edited.data, artifact, outcome.text))
    }

    /// Local validation and upload encoding; runs before any network call.
    fn prepare_upload(&self, request: &TransformRequest) -> Result<InlineImage> {
        if request.prompt.trim().is_empty() {
            return Err(Error::InvalidInput("Prompt must not be empty".to_string()));
        }
        if request.image.is_empty() {
            return Err(Error::InvalidInput(
                "No source image provided".to_string(),
            ));
        }
        if let Some(limit) = self.max_input_bytes {
            if request.image.len() as u64 > limit {
                return Err(Error::InvalidInput(format!(
                    "Source image is {} bytes, above the {} byte limit",
                    request.image.len(),
                    limit
                )));
            }
        }

        let decoded = image::load_from_memory(&request.image).map_err(|e| {
            Error::InvalidInput(format!("Source image could not be decoded: {}", e))
        })?;

        // JPEG carries no alpha channel; flatten before re-encoding.
        let rgb = decoded.to_rgb8();
        let mut encoded = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut encoded, 95);
        rgb.write_with_encoder(encoder)?;

        Ok(InlineImage {
            mime_type: "image/jpeg".to_string(),
            data: encoded,
        })
    }
}
