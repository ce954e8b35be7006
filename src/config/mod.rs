use serde::Deserialize;

use crate::models::edit::OutputFormat;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Telegram Bot API token from @BotFather
    pub telegram_bot_token: String,

    /// BFL.ai API key
    pub bfl_api_key: String,

    /// BFL.ai Flux Kontext endpoint
    #[serde(default = "default_api_url")]
    pub bfl_api_url: String,

    /// Maximum number of status polls per edit job
    #[serde(default = "default_max_polls")]
    pub bfl_max_polls: u32,

    /// Seconds to wait between status polls
    #[serde(default = "default_poll_interval")]
    pub bfl_poll_interval: u64,

    /// Per-request HTTP timeout in seconds (submit, poll, fetch)
    #[serde(default = "default_request_timeout")]
    pub bfl_request_timeout: u64,

    /// Maximum accepted input image size in megabytes
    #[serde(default = "default_max_image_size_mb")]
    pub max_image_size_mb: u64,

    /// Aspect ratio used when the input image cannot be inspected
    #[serde(default = "default_aspect_ratio")]
    pub default_aspect_ratio: String,

    /// Output format requested from the API ("jpeg" or "png")
    #[serde(default)]
    pub output_format: OutputFormat,

    /// BFL.ai safety tolerance (0 = strict, 6 = permissive)
    #[serde(default = "default_safety_tolerance")]
    pub safety_tolerance: u8,

    /// Deployment environment label, surfaced by /status
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_api_url() -> String {
    "https://api.bfl.ai/v1/flux-kontext-pro".to_string()
}

fn default_max_polls() -> u32 {
    60
}

fn default_poll_interval() -> u64 {
    2
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_image_size_mb() -> u64 {
    20
}

fn default_aspect_ratio() -> String {
    "1:1".to_string()
}

fn default_safety_tolerance() -> u8 {
    2
}

fn default_environment() -> String {
    "production".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}
