//! Update dispatch loop and message handlers.

pub mod messages;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::config::AppConfig;
use crate::services::aspect;
use crate::services::bfl::BflClient;
use crate::services::session::{PendingImage, SessionStore};
use crate::telegram::{Message, TelegramClient, TelegramError};

/// Backoff after a failed getUpdates call before retrying.
const UPDATE_RETRY_SECS: u64 = 5;

pub struct Bot {
    telegram: Arc<TelegramClient>,
    editor: Arc<BflClient>,
    sessions: Arc<SessionStore>,
    config: Arc<AppConfig>,
}

impl Bot {
    pub fn new(
        telegram: TelegramClient,
        editor: BflClient,
        sessions: SessionStore,
        config: AppConfig,
    ) -> Self {
        Self {
            telegram: Arc::new(telegram),
            editor: Arc::new(editor),
            sessions: Arc::new(sessions),
            config: Arc::new(config),
        }
    }

    /// Long-poll for updates forever, handling each message in its own
    /// task so one user's running edit never blocks another's.
    pub async fn run(self: Arc<Self>) {
        let mut offset = 0i64;

        loop {
            let updates = match self.telegram.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to fetch updates, retrying");
                    sleep(Duration::from_secs(UPDATE_RETRY_SECS)).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);

                if let Some(message) = update.message {
                    let bot = Arc::clone(&self);
                    tokio::spawn(async move {
                        if let Err(e) = bot.handle_message(message).await {
                            tracing::error!(error = %e, "Message handler failed");
                        }
                    });
                }
            }
        }
    }

    async fn handle_message(&self, message: Message) -> Result<(), TelegramError> {
        let chat_id = message.chat.id;

        if !message.photo.is_empty() {
            return self.handle_photo(message).await;
        }

        match message.text.as_deref() {
            Some("/start") => {
                let first_name = message
                    .from
                    .as_ref()
                    .map(|u| u.first_name.as_str())
                    .unwrap_or("there");
                self.telegram
                    .send_message(chat_id, &messages::welcome(first_name))
                    .await?;
            }
            Some("/help") => {
                self.telegram
                    .send_message(chat_id, messages::help())
                    .await?;
            }
            Some("/status") => {
                self.telegram
                    .send_message(chat_id, &messages::status(&self.config))
                    .await?;
            }
            Some("/clear") => {
                let reply = if self.sessions.clear(chat_id) {
                    messages::IMAGE_CLEARED
                } else {
                    messages::NOTHING_TO_CLEAR
                };
                self.telegram.send_message(chat_id, reply).await?;
            }
            Some(text) if !text.starts_with('/') => {
                self.handle_text(chat_id, text).await?;
            }
            _ => {} // Unknown command or empty message; ignore.
        }

        Ok(())
    }

    /// Stash an incoming photo and either edit immediately (caption as
    /// prompt) or wait for a separate instruction message.
    async fn handle_photo(&self, message: Message) -> Result<(), TelegramError> {
        let chat_id = message.chat.id;
        let progress = self
            .telegram
            .send_message(chat_id, "📥 Processing your image...")
            .await?;

        // Telegram sends several resolutions; take the largest.
        let photo = match message
            .photo
            .iter()
            .max_by_key(|p| p.width as u64 * p.height as u64)
        {
            Some(photo) => photo,
            None => return Ok(()),
        };

        let image = match self.telegram.download_file(&photo.file_id).await {
            Ok(image) => image,
            Err(e) => {
                tracing::error!(chat_id, error = %e, "Failed to download photo");
                self.telegram
                    .edit_message_text(
                        chat_id,
                        progress.message_id,
                        "❌ Error processing image. Please try again.",
                    )
                    .await?;
                return Ok(());
            }
        };

        let max_bytes = self.config.max_image_size_mb * 1024 * 1024;
        if image.len() as u64 > max_bytes {
            tracing::warn!(chat_id, bytes = image.len(), "Rejecting oversized image");
            self.telegram
                .edit_message_text(
                    chat_id,
                    progress.message_id,
                    &messages::image_too_large(self.config.max_image_size_mb),
                )
                .await?;
            return Ok(());
        }

        let aspect_ratio =
            aspect::aspect_ratio_for_image(&image, &self.config.default_aspect_ratio);
        self.sessions.set_image(
            chat_id,
            PendingImage {
                image,
                aspect_ratio: aspect_ratio.clone(),
            },
        );

        match message.caption.as_deref().map(str::trim) {
            Some(caption) if !caption.is_empty() => {
                self.run_edit(chat_id, caption, progress.message_id).await
            }
            _ => {
                self.telegram
                    .edit_message_text(
                        chat_id,
                        progress.message_id,
                        &messages::image_received(&aspect_ratio),
                    )
                    .await
            }
        }
    }

    /// A plain text message is an edit instruction for the stashed image.
    async fn handle_text(&self, chat_id: i64, prompt: &str) -> Result<(), TelegramError> {
        if self.sessions.get_image(chat_id).is_none() {
            self.telegram
                .send_message(chat_id, messages::NEED_PHOTO_FIRST)
                .await?;
            return Ok(());
        }

        let progress = self
            .telegram
            .send_message(chat_id, "🎨 Processing your edit request...")
            .await?;
        self.run_edit(chat_id, prompt, progress.message_id).await
    }

    /// Drive one edit job and report the outcome in chat.
    async fn run_edit(
        &self,
        chat_id: i64,
        prompt: &str,
        progress_id: i64,
    ) -> Result<(), TelegramError> {
        let pending = match self.sessions.get_image(chat_id) {
            Some(pending) => pending,
            None => {
                self.telegram
                    .send_message(chat_id, messages::NEED_PHOTO_FIRST)
                    .await?;
                return Ok(());
            }
        };

        self.telegram
            .edit_message_text(
                chat_id,
                progress_id,
                &messages::editing_in_progress(prompt, &pending.aspect_ratio),
            )
            .await?;

        tracing::info!(chat_id, prompt, "Starting edit job");

        match self
            .editor
            .edit(&pending.image, prompt, &pending.aspect_ratio)
            .await
        {
            Ok(edited) => {
                self.telegram
                    .send_photo(chat_id, edited, &messages::edited_caption(prompt))
                    .await?;
                self.telegram.delete_message(chat_id, progress_id).await?;
                self.telegram
                    .send_message(chat_id, messages::EDIT_FOLLOW_UP)
                    .await?;
            }
            Err(e) => {
                // All edit failures look the same to the user.
                tracing::error!(chat_id, error = %e, "Edit job failed");
                self.telegram
                    .edit_message_text(chat_id, progress_id, messages::EDIT_FAILED)
                    .await?;
            }
        }

        Ok(())
    }
}
