use std::io::Cursor;

use image::ImageReader;

/// Aspect ratios accepted by the edit API, in fixed precedence order.
///
/// Ordering matters: when an input is equidistant from two entries the
/// earlier one wins (21:9 and 7:3 reduce to the same real ratio, as do
/// 9:21 and 3:7).
pub const SUPPORTED_RATIOS: [(&str, u32, u32); 11] = [
    ("1:1", 1, 1),
    ("4:3", 4, 3),
    ("3:4", 3, 4),
    ("16:9", 16, 9),
    ("9:16", 9, 16),
    ("21:9", 21, 9),
    ("9:21", 9, 21),
    ("3:2", 3, 2),
    ("2:3", 2, 3),
    ("7:3", 7, 3),
    ("3:7", 3, 7),
];

/// Map pixel dimensions onto the nearest supported aspect-ratio label.
///
/// Reduces the pair by gcd, then picks the table entry whose real-valued
/// ratio has the smallest absolute difference to the reduced input. Both
/// dimensions must be positive (guaranteed by the image decode upstream);
/// never fails for positive inputs.
pub fn classify(width: u32, height: u32) -> &'static str {
    let d = gcd(width, height);
    let reduced_w = width / d.max(1);
    let reduced_h = height / d.max(1);
    let current = reduced_w as f64 / reduced_h as f64;

    let mut closest = SUPPORTED_RATIOS[0].0;
    let mut min_diff = f64::INFINITY;

    for (label, w, h) in SUPPORTED_RATIOS {
        let diff = (current - w as f64 / h as f64).abs();
        // Strict comparison keeps the earlier entry on exact ties.
        if diff < min_diff {
            min_diff = diff;
            closest = label;
        }
    }

    closest
}

/// Detect the aspect-ratio label for a raw image buffer.
///
/// Only the header is decoded; an undecodable buffer falls back to the
/// given default label rather than failing the edit.
pub fn aspect_ratio_for_image(image_bytes: &[u8], default_label: &str) -> String {
    match read_dimensions(image_bytes) {
        Ok((width, height)) => {
            let label = classify(width, height);
            tracing::info!(width, height, label, "Detected image aspect ratio");
            label.to_string()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to inspect image, using default aspect ratio");
            default_label.to_string()
        }
    }
}

/// Read pixel width and height from an image buffer without a full decode.
pub fn read_dimensions(image_bytes: &[u8]) -> Result<(u32, u32), image::ImageError> {
    ImageReader::new(Cursor::new(image_bytes))
        .with_guessed_format()?
        .into_dimensions()
}

fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
