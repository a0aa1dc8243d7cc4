//! QR symbol rendering and scanning.
//!
//! Thin wrappers over the `qrcode` and `rqrr` crates. Frame strings are
//! already wire text when they get here; rendering pins the symbol version
//! so every frame of an animated transfer has the same geometry, and
//! scanning just hands back whatever text the symbol carried.

mod render;
mod scan;

pub use render::{render_frame, render_frame_ascii, render_frame_to_file, QrError, RenderConfig};
pub use scan::{scan_image, scan_image_file};
