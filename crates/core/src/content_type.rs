//! Content-type classification and derived file naming for attachments.

/// Prefix prepended to the original filename of a derived thumbnail.
pub const THUMBNAIL_PREFIX: &str = "thumbnail-";

/// Whether `content_type` denotes an image, i.e. whether a thumbnail
/// should be derived for it.
pub fn is_image(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("image")
}

/// Build the storage path of the thumbnail for `file_name` under `common_path`.
pub fn thumbnail_file_name(common_path: &str, file_name: &str) -> String {
    join_path(common_path, &format!("{THUMBNAIL_PREFIX}{file_name}"))
}

/// Join two logical storage path segments with a single `/`.
///
/// Blob store paths are logical keys, not host paths, so the separator is
/// always `/` regardless of platform.
pub fn join_path(base: &str, segment: &str) -> String {
    let base = base.trim_end_matches('/');
    let segment = segment.trim_start_matches('/');
    if base.is_empty() {
        segment.to_string()
    } else if segment.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{segment}")
    }
}
