//! QR scanning: image in, frame string out.

use image::DynamicImage;
use rqrr::PreparedImage;
use std::path::Path;

use super::QrError;

/// Extracts the first QR symbol from `image` and returns its text content.
///
/// The content is a raw frame string; feeding it to the decoder is the
/// caller's job.
pub fn scan_image(image: &DynamicImage) -> Result<String, QrError> {
    let gray = image.to_luma8();
    let mut prepared = PreparedImage::prepare(gray);

    let grids = prepared.detect_grids();
    if grids.is_empty() {
        return Err(QrError::NoSymbolFound);
    }

    let (_, content) = grids[0]
        .decode()
        .map_err(|e| QrError::SymbolUnreadable(format!("{e:?}")))?;
    Ok(content)
}

/// Reads an image file and extracts the first QR symbol's text content.
pub fn scan_image_file<P: AsRef<Path>>(path: P) -> Result<String, QrError> {
    let image = image::open(path.as_ref())?;
    scan_image(&image)
}
