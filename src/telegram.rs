//! Minimal Telegram Bot API client: long-polled updates in, messages and
//! photos out. Only the handful of methods the bot uses are wrapped.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Long-poll window for `getUpdates`, in seconds.
const LONG_POLL_SECS: u64 = 30;

/// Envelope every Bot API method responds with.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    pub caption: Option<String>,
    /// One entry per available resolution.
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub first_name: String,
}

#[derive(Debug, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
pub struct File {
    pub file_path: Option<String>,
}

pub struct TelegramClient {
    http: Client,
    /// `https://api.telegram.org/bot<token>`
    api_base: String,
    /// `https://api.telegram.org/file/bot<token>`
    file_base: String,
}

impl TelegramClient {
    pub fn new(bot_token: &str) -> Result<Self, TelegramError> {
        // Client timeout must outlast the getUpdates long-poll window.
        let http = Client::builder()
            .timeout(Duration::from_secs(LONG_POLL_SECS + 30))
            .build()
            .map_err(TelegramError::Http)?;

        Ok(Self {
            http,
            api_base: format!("https://api.telegram.org/bot{bot_token}"),
            file_base: format!("https://api.telegram.org/file/bot{bot_token}"),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &serde_json::Value,
    ) -> Result<T, TelegramError> {
        let url = format!("{}/{}", self.api_base, method);
        let response: ApiResponse<T> = self
            .http
            .post(&url)
            .json(params)
            .send()
            .await?
            .json()
            .await?;

        match response {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(TelegramError::Api {
                method: method.to_string(),
                description: description.unwrap_or_else(|| "no description".to_string()),
            }),
        }
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        self.call(
            "getUpdates",
            &serde_json::json!({
                "offset": offset,
                "timeout": LONG_POLL_SECS,
                "allowed_updates": ["message"],
            }),
        )
        .await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, TelegramError> {
        self.call(
            "sendMessage",
            &serde_json::json!({ "chat_id": chat_id, "text": text }),
        )
        .await
    }

    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), TelegramError> {
        // Result is the edited Message; the bot only cares that it worked.
        self.call::<serde_json::Value>(
            "editMessageText",
            &serde_json::json!({ "chat_id": chat_id, "message_id": message_id, "text": text }),
        )
        .await
        .map(|_| ())
    }

    pub async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError> {
        self.call::<bool>(
            "deleteMessage",
            &serde_json::json!({ "chat_id": chat_id, "message_id": message_id }),
        )
        .await
        .map(|_| ())
    }

    /// Upload a photo from memory with an optional caption.
    pub async fn send_photo(
        &self,
        chat_id: i64,
        photo: Vec<u8>,
        caption: &str,
    ) -> Result<(), TelegramError> {
        let url = format!("{}/sendPhoto", self.api_base);
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("photo", Part::bytes(photo).file_name("edited.jpg"));

        let response: ApiResponse<serde_json::Value> = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;

        if response.ok {
            Ok(())
        } else {
            Err(TelegramError::Api {
                method: "sendPhoto".to_string(),
                description: response
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            })
        }
    }

    /// Resolve a file id and download its contents.
    pub async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, TelegramError> {
        let file: File = self
            .call("getFile", &serde_json::json!({ "file_id": file_id }))
            .await?;

        let file_path = file.file_path.ok_or_else(|| TelegramError::Api {
            method: "getFile".to_string(),
            description: "no file_path in response".to_string(),
        })?;

        let url = format!("{}/{}", self.file_base, file_path);
        let bytes = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error in {method}: {description}")]
    Api { method: String, description: String },
}
