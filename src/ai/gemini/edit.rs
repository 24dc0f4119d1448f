use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, InlineData, Part};
use crate::ai::{EditOutcome, EditedImage, ImageEditService, InlineImage};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct EditRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: EditGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EditGenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    response_modalities: Vec<String>,
}

impl Default for EditGenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
            response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
        }
    }
}

pub struct GeminiEditClient {
    http: GeminiHttpClient,
}

impl GeminiEditClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, timeout, client),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ImageEditService for GeminiEditClient {
    async fn edit_image(&self, image: &InlineImage, prompt: &str) -> Result<EditOutcome> {
        tracing::debug!(
            "Requesting image edit ({} source bytes, {} prompt chars) from Gemini model {}",
            image.data.len(),
            prompt.len(),
            self.http.model()
        );

        use base64::Engine as _;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&image.data);

        let request = EditRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type.clone(),
                            data: encoded,
                        },
                    },
                    Part::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
            generation_config: EditGenerationConfig::default(),
        };

        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        let mut text = String::new();
        let mut edited = None;

        if let Some(candidate) = response.candidates.first() {
            for part in &candidate.content.parts {
                match part {
                    Part::Text { text: chunk } => {
                        if !text.is_empty() {
                            text.push('\n');
                        }
                        text.push_str(chunk);
                    }
                    Part::InlineData { inline_data } if edited.is_none() => {
                        let data = base64::engine::general_purpose::STANDARD
                            .decode(&inline_data.data)
                            .map_err(|e| {
                                Error::Decode(format!(
                                    "Failed to decode base64 image from Gemini: {}",
                                    e
                                ))
                            })?;
                        tracing::debug!(
                            "Gemini returned image part ({} bytes, mime_type: {})",
                            data.len(),
                            inline_data.mime_type
                        );
                        edited = Some(EditedImage {
                            data,
                            mime_type: inline_data.mime_type.clone(),
                        });
                    }
                    Part::InlineData { .. } => {}
                }
            }
        }

        Ok(EditOutcome {
            image: edited,
            text,
        })
    }
}
