use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::SolvemarkError;

static ALLOWED_IMAGE_TYPES: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    [
        "image/jpeg",
        "image/jpg",
        "image/png",
        "image/gif",
        "image/webp",
    ]
    .into()
});

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension().and_then(|e| e.to_str())?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Checks a problem image before it is submitted. Violations stop the
/// submission and carry the user-facing message.
pub fn validate(mime: &str, size_bytes: u64) -> Result<(), SolvemarkError> {
    if !ALLOWED_IMAGE_TYPES.contains(mime) {
        return Err(SolvemarkError::Upload(
            "Please upload a valid image file (JPEG, PNG, GIF, or WebP)".into(),
        ));
    }
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(SolvemarkError::Upload(
            "File size must be less than 10MB".into(),
        ));
    }
    Ok(())
}
