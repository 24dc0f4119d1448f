use super::{EditOutcome, EditedImage, ImageEditService, InlineImage};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum MockReply {
    Outcome(EditOutcome),
    Failure(String),
}

#[derive(Clone)]
pub struct MockEditClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockEditClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_image_response(self, data: Vec<u8>, mime_type: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Outcome(EditOutcome {
                image: Some(EditedImage {
                    data,
                    mime_type: mime_type.to_string(),
                }),
                text: String::new(),
            }));
        self
    }

    pub fn with_text_response(self, text: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Outcome(EditOutcome {
                image: None,
                text: text.to_string(),
            }));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Failure(message.to_string()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn received_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockEditClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageEditService for MockEditClient {
    async fn edit_image(&self, _image: &InlineImage, prompt: &str) -> Result<EditOutcome> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.prompts.lock().unwrap().push(prompt.to_string());

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            // Return a tiny valid PNG as default
            return Ok(EditOutcome {
                image: Some(EditedImage {
                    data: vec![
                        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
                        0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
                        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 pixel
                        0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, 0x00, 0x00, 0x00,
                        0x0C, 0x49, 0x44, 0x41, 0x54, // IDAT chunk
                        0x78, 0xDA, 0x63, 0xF8, 0xCF, 0xF0, 0x1F, 0x00, 0x04, 0x00, 0x01, 0xFF,
                        0x1C, 0xF7, 0xE9, 0x5C, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E,
                        0x44, // IEND chunk
                        0xAE, 0x42, 0x60, 0x82,
                    ],
                    mime_type: "image/png".to_string(),
                }),
                text: String::new(),
            });
        }

        let index = (*count - 1) % replies.len();
        match &replies[index] {
            MockReply::Outcome(outcome) => Ok(outcome.clone()),
            MockReply::Failure(message) => Err(Error::Provider(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_image() -> InlineImage {
        InlineImage {
            mime_type: "image/jpeg".to_string(),
            data: vec![0xFF, 0xD8, 0xFF],
        }
    }

    #[tokio::test]
    async fn test_mock_default_returns_valid_png() {
        let client = MockEditClient::new();

        let outcome = client
            .edit_image(&source_image(), "test prompt")
            .await
            .unwrap();
        let edited = outcome.image.unwrap();
        assert!(image::load_from_memory(&edited.data).is_ok());
    }

    #[tokio::test]
    async fn test_mock_cycles_queued_replies() {
        let client = MockEditClient::new()
            .with_text_response("first")
            .with_text_response("second");

        let outcome1 = client.edit_image(&source_image(), "p").await.unwrap();
        assert_eq!(outcome1.text, "first");

        let outcome2 = client.edit_image(&source_image(), "p").await.unwrap();
        assert_eq!(outcome2.text, "second");

        // Should cycle back
        let outcome3 = client.edit_image(&source_image(), "p").await.unwrap();
        assert_eq!(outcome3.text, "first");
    }

    #[tokio::test]
    async fn test_mock_failure_reply() {
        let client = MockEditClient::new().with_failure("simulated outage");

        let err = client.edit_image(&source_image(), "p").await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        assert!(err.to_string().contains("simulated outage"));
    }

    #[tokio::test]
    async fn test_mock_records_calls_and_prompts() {
        let client = MockEditClient::new();
        assert_eq!(client.get_call_count(), 0);

        client
            .edit_image(&source_image(), "make it rain")
            .await
            .unwrap();

        assert_eq!(client.get_call_count(), 1);
        assert_eq!(client.received_prompts(), vec!["make it rain".to_string()]);
    }
}
