use chrono::NaiveDateTime;

use crate::server::{error::Error, util::time::file_timestamp};

const ALLOWED_EXTENSIONS: [&str; 8] = [
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".webp", ".svg",
];

/// Checks that `name` is an image and returns the name it is stored under.
///
/// The stem is stripped of `.`, `/` and `\`, spaces become `_`, and a timestamp suffix is
/// appended before the lower-cased extension.
pub fn validate_image_name(name: &str, now: NaiveDateTime) -> Result<String, Error> {
    let not_approved = || Error::Validation(format!("file format for {} is not approved", name));

    let dot = name.rfind('.').ok_or_else(not_approved)?;
    let (stem, extension) = name.split_at(dot);
    let extension = extension.to_lowercase();

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(not_approved());
    }

    let stem: String = stem
        .chars()
        .filter(|c| !matches!(c, '.' | '/' | '\\'))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();

    Ok(format!("{}_{}{}", stem, file_timestamp(now), extension))
}

/// Content type sent to storage for a validated image name
pub fn image_mime_type(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tiff" => "image/tiff",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
