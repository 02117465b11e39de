//! Featured image preview markup.

use crate::models::MediaRecord;
use crate::routes::helpers::html_escape;

/// Bounding box of the preview, in pixels.
pub const FEATURED_IMAGE_BOX: (u32, u32) = (200, 200);

/// Scale `(width, height)` down to fit inside `max`, keeping the aspect
/// ratio. Never scales up; unknown (zero) sizes are returned unchanged.
pub fn constrain_dimensions(width: u32, height: u32, max: (u32, u32)) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    if width <= max.0 && height <= max.1 {
        return (width, height);
    }

    let ratio = f64::min(
        f64::from(max.0) / f64::from(width),
        f64::from(max.1) / f64::from(height),
    );
    let scale = |v: u32| ((f64::from(v) * ratio).round() as u32).max(1);
    (scale(width), scale(height))
}

/// Render `<img>` markup for a featured image preview.
///
/// Non-image media renders as the empty string.
pub fn featured_image_html(media: &MediaRecord) -> String {
    if !media.is_image() {
        return String::new();
    }

    let (width, height) = constrain_dimensions(media.width, media.height, FEATURED_IMAGE_BOX);
    let size_class = format!("{}x{}", FEATURED_IMAGE_BOX.0, FEATURED_IMAGE_BOX.1);
    let dimensions = if width > 0 && height > 0 {
        format!("width=\"{width}\" height=\"{height}\" ")
    } else {
        String::new()
    };

    format!(
        "<img {dimensions}src=\"{}\" \
         class=\"attachment-{size_class} size-{size_class}\" alt=\"{}\" />",
        html_escape(&media.url),
        html_escape(&media.alt),
    )
}
