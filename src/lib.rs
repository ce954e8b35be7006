//! Telegram AI Image Editor Bot
//!
//! This library provides the core functionality for flux-edit-bot: a chat
//! bot that submits images with natural-language edit instructions to the
//! BFL.ai Flux Kontext API, polls the asynchronous job until it completes,
//! and sends the edited image back.

pub mod bot;
pub mod config;
pub mod models;
pub mod services;
pub mod telegram;
