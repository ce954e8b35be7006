use base64::Engine;
use serde::{Deserialize, Serialize};

/// Output format requested from the edit API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

/// Submission body for one edit job, serialized as the BFL.ai wire format.
///
/// Built once per user action and discarded when the job reaches a terminal
/// state; the source image travels base64-encoded in `input_image`.
#[derive(Debug, Serialize)]
pub struct EditRequest {
    pub prompt: String,
    pub input_image: String,
    pub aspect_ratio: String,
    pub output_format: OutputFormat,
    pub safety_tolerance: u8,
}

impl EditRequest {
    pub fn new(
        image_bytes: &[u8],
        prompt: &str,
        aspect_ratio: &str,
        output_format: OutputFormat,
        safety_tolerance: u8,
    ) -> Self {
        Self {
            prompt: prompt.to_string(),
            input_image: base64::engine::general_purpose::STANDARD.encode(image_bytes),
            aspect_ratio: aspect_ratio.to_string(),
            output_format,
            safety_tolerance,
        }
    }
}
