//! Thumbnail derivation for image attachments.

use std::io::Cursor;

use image::ImageFormat;

use crate::error::StorageError;

/// Default thumbnail bounding box width in pixels.
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 100;

/// Default thumbnail bounding box height in pixels.
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 55;

/// Bounding box a thumbnail is scaled into, aspect ratio preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ThumbnailSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_THUMBNAIL_WIDTH,
            height: DEFAULT_THUMBNAIL_HEIGHT,
        }
    }
}

/// Decode `data`, scale it to fit `size` and encode the result as PNG.
///
/// Images already smaller than the box are re-encoded unscaled.
pub fn derive_thumbnail(data: &[u8], size: ThumbnailSize) -> Result<Vec<u8>, StorageError> {
    let source = image::load_from_memory(data)?;
    let scaled = if source.width() <= size.width && source.height() <= size.height {
        source
    } else {
        source.thumbnail(size.width, size.height)
    };

    let mut out = Cursor::new(Vec::new());
    scaled.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
