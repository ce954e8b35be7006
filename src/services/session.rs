use std::collections::HashMap;
use std::sync::Mutex;

/// Image a conversation is currently editing, kept between the
/// "photo received" and "instruction received" turns. Repeated text
/// instructions re-edit the same stashed image until it is replaced
/// or cleared.
#[derive(Debug, Clone)]
pub struct PendingImage {
    pub image: Vec<u8>,
    pub aspect_ratio: String,
}

/// Per-conversation context store keyed by chat id.
///
/// Nothing here survives a restart; this is session state, not job
/// history.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<i64, PendingImage>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stash an image for a chat, replacing any previous one.
    pub fn set_image(&self, chat_id: i64, pending: PendingImage) {
        self.inner
            .lock()
            .expect("session store lock poisoned")
            .insert(chat_id, pending);
    }

    pub fn get_image(&self, chat_id: i64) -> Option<PendingImage> {
        self.inner
            .lock()
            .expect("session store lock poisoned")
            .get(&chat_id)
            .cloned()
    }

    /// Drop the stashed image for a chat. Returns whether one existed.
    pub fn clear(&self, chat_id: i64) -> bool {
        self.inner
            .lock()
            .expect("session store lock poisoned")
            .remove(&chat_id)
            .is_some()
    }
}
