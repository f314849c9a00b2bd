//! Shared constants for photo composition
//!
//! This module centralizes the fixed page geometry and the defaults used
//! by the composer, the CLI and the GUI.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f64 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Page Geometry
// =============================================================================

/// A4 portrait width in millimeters
pub const A4_WIDTH_MM: f64 = 210.0;

/// A4 portrait height in millimeters
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Blank border kept on every side of the page (millimeters)
pub const PAGE_MARGIN_MM: f64 = 10.0;

// =============================================================================
// Output
// =============================================================================

/// File name used when the caller does not pick one
pub const DEFAULT_OUTPUT_FILENAME: &str = "photos.pdf";

/// JPEG quality used when an image has to be re-encoded
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// PDF version written to the output header
pub const PDF_VERSION: &str = "1.7";

// =============================================================================
// Input
// =============================================================================

/// File extensions offered by the image picker
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff", "tga", "ico", "pnm", "qoi",
];

/// Longest edge of a preview thumbnail, in pixels
pub const THUMBNAIL_MAX_EDGE: u32 = 256;
