use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use flux_edit_bot::config::AppConfig;
use flux_edit_bot::services::bfl::BflClient;
use flux_edit_bot::services::transport::ReqwestTransport;

/// Live smoke test against the real BFL.ai API.
///
/// Requires BFL_API_KEY (and TELEGRAM_BOT_TOKEN for config loading) in the
/// environment, and spends real API credits.
#[tokio::test]
#[ignore] // Run with: cargo test --test live_api_test -- --ignored
async fn test_edit_round_trip_against_live_api() {
    let config = AppConfig::from_env().expect("Failed to load config");

    let transport = ReqwestTransport::new(Duration::from_secs(config.bfl_request_timeout))
        .expect("Failed to build transport");
    let editor = BflClient::new(
        Arc::new(transport),
        config.bfl_api_url.clone(),
        config.bfl_api_key.clone(),
        config.output_format,
        config.safety_tolerance,
        config.bfl_max_polls,
        Duration::from_secs(config.bfl_poll_interval),
    );

    // A plain 512x512 test card as the source image.
    let mut source = Cursor::new(Vec::new());
    image::RgbImage::from_pixel(512, 512, image::Rgb([200, 60, 60]))
        .write_to(&mut source, image::ImageFormat::Png)
        .expect("Failed to encode source image");

    let edited = editor
        .edit(source.get_ref(), "add a small white circle in the center", "1:1")
        .await
        .expect("Edit job failed");

    assert!(!edited.is_empty());
    // The result must itself be a decodable image.
    let (width, height) =
        flux_edit_bot::services::aspect::read_dimensions(&edited).expect("Result not an image");
    assert!(width > 0 && height > 0);

    println!("✅ Live edit returned a {width}x{height} image");
}
