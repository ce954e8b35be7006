//! User-facing message templates.

use crate::config::AppConfig;

pub fn welcome(first_name: &str) -> String {
    format!(
        "🎨 AI Image Editor Bot\n\n\
         Hi {first_name}!\n\n\
         Two ways to use:\n\n\
         Method 1 (quick): send a photo with your edit instruction as the caption.\n\n\
         Method 2 (step-by-step):\n\
         1. Send me an image\n\
         2. Send a text description of how you want to edit it\n\n\
         Examples:\n\
         • \"Change the car color to red\"\n\
         • \"Add sunglasses to the person\"\n\
         • \"Make the sky sunset colored\"\n\n\
         The bot keeps your image's original aspect ratio!"
    )
}

pub fn help() -> &'static str {
    "🔧 Commands & usage\n\n\
     Commands:\n\
     /start - Start the bot\n\
     /help - Show this help message\n\
     /clear - Clear the current image from memory\n\
     /status - Show bot status\n\n\
     How to edit images:\n\
     1. Send a photo (optionally with your instruction as the caption)\n\
     2. Send your editing instruction as text\n\
     3. Wait for the result - processing usually takes 10-30 seconds\n\n\
     Tips:\n\
     • Be specific in your descriptions\n\
     • The bot keeps the original aspect ratio\n\
     • You can send a new image anytime"
}

pub fn status(config: &AppConfig) -> String {
    format!(
        "🤖 Bot status\n\n\
         ✅ Bot is running\n\
         🔧 Environment: {}\n\
         📊 Max image size: {}MB\n\
         ⏱️ Poll budget: {} polls × {}s\n\
         🎯 Default aspect ratio: {}",
        config.environment,
        config.max_image_size_mb,
        config.bfl_max_polls,
        config.bfl_poll_interval,
        config.default_aspect_ratio,
    )
}

pub fn image_received(aspect_ratio: &str) -> String {
    format!(
        "✅ Image received!\n\
         📐 Detected aspect ratio: {aspect_ratio}\n\n\
         💬 Now send me your editing instructions!"
    )
}

pub fn editing_in_progress(prompt: &str, aspect_ratio: &str) -> String {
    format!(
        "🎨 Editing your image...\n\
         📝 Prompt: {prompt}\n\
         📐 Aspect ratio: {aspect_ratio}\n\n\
         ⏳ This may take 10-30 seconds..."
    )
}

pub fn edited_caption(prompt: &str) -> String {
    format!("✨ Edited image\n📝 Prompt: {prompt}")
}

pub const EDIT_FOLLOW_UP: &str =
    "🔄 You can send another editing instruction for this image, or send a new image to start over!";

pub const EDIT_FAILED: &str = "❌ Failed to edit image. Please try again with a different prompt.";

pub const NEED_PHOTO_FIRST: &str =
    "📷 Please send a photo first!\nUse /start to see how to use the bot.";

pub const IMAGE_CLEARED: &str = "✅ Image cleared! Send a new image to start editing.";

pub const NOTHING_TO_CLEAR: &str = "No image to clear. Send an image first!";

pub fn image_too_large(max_mb: u64) -> String {
    format!("❌ Image too large. Maximum size is {max_mb}MB.")
}
