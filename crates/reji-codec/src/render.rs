//! # Optical Rendering
//!
//! Draws the encoded transport text into a scannable QR image.
//!
//! The matrix comes from the `qrcode` crate; the pixels are written
//! module-by-module into a grayscale buffer and PNG-encoded with `image`.
//! Rendering is pixel-deterministic: the same transport text and options
//! always produce the same bytes.

use std::io::Cursor;

use image::{GrayImage, Luma};
use qrcode::QrCode;
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

// =============================================================================
// Options
// =============================================================================

/// QR error-correction strength.
///
/// Higher levels survive more glare and smudging at the cost of a denser
/// symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EcLevel {
    /// ~7% recovery.
    L,
    /// ~15% recovery.
    M,
    /// ~25% recovery.
    Q,
    /// ~30% recovery.
    H,
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// Rendering options for the payment QR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Target image width/height in pixels. The result is the largest
    /// whole-module image that fits (every module at least 1 px).
    pub size_px: u32,

    /// Quiet-zone margin around the symbol, in modules.
    pub margin_modules: u32,

    /// Error-correction strength.
    pub ec_level: EcLevel,
}

impl Default for RenderOptions {
    fn default() -> Self {
        // The register's checkout QR: 300 px, 2-module margin, level M.
        RenderOptions {
            size_px: 300,
            margin_modules: 2,
            ec_level: EcLevel::M,
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders transport text into PNG image bytes.
///
/// Fails with [`CodecError::Capacity`] when the text does not fit any QR
/// version at the requested error-correction level.
pub fn render_png(transport_text: &str, options: RenderOptions) -> CodecResult<Vec<u8>> {
    let code = QrCode::with_error_correction_level(transport_text, options.ec_level.into())
        .map_err(|err| CodecError::Capacity(err.to_string()))?;

    let modules = code.width() as u32;
    let total_modules = modules + 2 * options.margin_modules;
    let module_px = (options.size_px / total_modules).max(1);
    let image_px = total_modules * module_px;

    let mut img = GrayImage::from_pixel(image_px, image_px, Luma([255u8]));

    let colors = code.to_colors();
    for (idx, color) in colors.iter().enumerate() {
        if *color != qrcode::Color::Dark {
            continue;
        }
        let mx = idx as u32 % modules;
        let my = idx as u32 / modules;
        let x0 = (options.margin_modules + mx) * module_px;
        let y0 = (options.margin_modules + my) * module_px;
        for dy in 0..module_px {
            for dx in 0..module_px {
                img.put_pixel(x0 + dx, y0 + dy, Luma([0u8]));
            }
        }
    }

    let mut bytes = Vec::new();
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .map_err(|err| CodecError::Capacity(err.to_string()))?;

    Ok(bytes)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport;
    use reji_core::{PayloadItem, TransactionPayload};

    fn sample_text() -> String {
        let payload = TransactionPayload {
            items: vec![PayloadItem {
                code: "4901234567894".into(),
                name: "茶".into(),
                unit_price: 150,
                quantity: 2,
                subtotal: 300,
            }],
            total_amount: 330,
        };
        transport::encode(&payload).unwrap()
    }

    #[test]
    fn test_render_produces_png() {
        let bytes = render_png(&sample_text(), RenderOptions::default()).unwrap();

        // PNG signature
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_render_is_deterministic() {
        let text = sample_text();
        let a = render_png(&text, RenderOptions::default()).unwrap();
        let b = render_png(&text, RenderOptions::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_dimensions_fit_request() {
        let text = sample_text();
        let bytes = render_png(&text, RenderOptions::default()).unwrap();

        let img = image::load_from_memory(&bytes).unwrap();
        assert!(img.width() <= 300);
        assert_eq!(img.width(), img.height());
        // Every module gets at least one pixel even for tiny requests.
        let tiny = render_png(
            &text,
            RenderOptions {
                size_px: 10,
                ..RenderOptions::default()
            },
        )
        .unwrap();
        let tiny_img = image::load_from_memory(&tiny).unwrap();
        assert!(tiny_img.width() >= 10);
    }

    #[test]
    fn test_margin_is_blank() {
        let text = sample_text();
        let opts = RenderOptions::default();
        let bytes = render_png(&text, opts).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().into_luma8();

        // The quiet zone is pure white.
        assert_eq!(img.get_pixel(0, 0).0[0], 255);
        assert_eq!(img.get_pixel(img.width() - 1, img.height() - 1).0[0], 255);
    }

    #[test]
    fn test_capacity_overflow_is_reported() {
        // QR caps out below 3 kB of byte-mode data at level H.
        let oversized = "A".repeat(8000);
        let err = render_png(&oversized, RenderOptions {
            ec_level: EcLevel::H,
            ..RenderOptions::default()
        })
        .unwrap_err();
        assert!(matches!(err, CodecError::Capacity(_)));
    }

    #[test]
    fn test_ec_level_mapping() {
        for (ours, theirs) in [
            (EcLevel::L, qrcode::EcLevel::L),
            (EcLevel::M, qrcode::EcLevel::M),
            (EcLevel::Q, qrcode::EcLevel::Q),
            (EcLevel::H, qrcode::EcLevel::H),
        ] {
            assert_eq!(qrcode::EcLevel::from(ours), theirs);
        }
    }
}
