//! QR rendering for frame display.

use image::{DynamicImage, Luma};
use qrcode::{EcLevel as QrcodeEcLevel, QrCode, Version};
use std::path::Path;
use thiserror::Error;

use crate::chunk::EcLevel;

/// Errors from rendering or scanning QR symbols.
#[derive(Error, Debug)]
pub enum QrError {
    #[error("frame does not fit the requested QR symbol: {0}")]
    FrameTooLarge(String),

    #[error("QR rendering failed: {0}")]
    RenderFailed(String),

    #[error("no QR symbol found in image")]
    NoSymbolFound,

    #[error("QR symbol could not be decoded: {0}")]
    SymbolUnreadable(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EcLevel> for QrcodeEcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::Low => QrcodeEcLevel::L,
            EcLevel::Medium => QrcodeEcLevel::M,
            EcLevel::Quartile => QrcodeEcLevel::Q,
            EcLevel::High => QrcodeEcLevel::H,
        }
    }
}

/// Configuration for frame rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Fixed symbol version; `None` lets the library pick the smallest fit.
    /// Animated transfers pin this so every frame renders the same size.
    pub version: Option<u32>,
    pub ec_level: EcLevel,
    /// Module size in pixels.
    pub module_size: u32,
    /// Quiet-zone border in modules; 0 disables it.
    pub border: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            version: Some(10),
            ec_level: EcLevel::Low,
            module_size: 4,
            border: 3,
        }
    }
}

fn build_code(text: &str, config: &RenderConfig) -> Result<QrCode, QrError> {
    match config.version {
        Some(version) => {
            QrCode::with_version(text, Version::Normal(version as i16), config.ec_level.into())
                .map_err(|e| QrError::FrameTooLarge(e.to_string()))
        }
        None => QrCode::with_error_correction_level(text, config.ec_level.into())
            .map_err(|e| QrError::RenderFailed(e.to_string())),
    }
}

/// Renders one frame string as a grayscale QR image.
pub fn render_frame(text: &str, config: &RenderConfig) -> Result<DynamicImage, QrError> {
    let code = build_code(text, config)?;
    let image = code
        .render::<Luma<u8>>()
        .quiet_zone(config.border > 0)
        .module_dimensions(config.module_size, config.module_size)
        .build();
    Ok(DynamicImage::ImageLuma8(image))
}

/// Renders one frame string and writes it to `path` as an image file.
pub fn render_frame_to_file<P: AsRef<Path>>(
    text: &str,
    path: P,
    config: &RenderConfig,
) -> Result<(), QrError> {
    let image = render_frame(text, config)?;
    image.save(path.as_ref())?;
    Ok(())
}

/// Renders one frame string as terminal ASCII art.
pub fn render_frame_ascii(text: &str, config: &RenderConfig) -> Result<String, QrError> {
    let code = build_code(text, config)?;
    let ascii = code
        .render::<char>()
        .quiet_zone(config.border > 0)
        .module_dimensions(2, 1)
        .build();
    Ok(ascii)
}
