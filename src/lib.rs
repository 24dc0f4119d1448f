//! Image transformation studio backed by Google's Gemini image model
//!
//! Takes a source image and a text prompt, sends both to the Gemini
//! `generateContent` API, and returns the transformed image together with a
//! transient file ready for download.

pub mod ai;
pub mod artifact;
pub mod config;
pub mod error;
pub mod pipeline;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{TransformPipeline, TransformReply, TransformRequest, TransformStatus};
