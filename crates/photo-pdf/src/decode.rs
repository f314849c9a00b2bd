//! Reading and decoding selected images
//!
//! Every selected file goes through an [`ImageLoader`] before it can be
//! placed on a page. The default loader reads from disk and decodes on the
//! blocking pool; tests swap in their own loaders to control timing.

use crate::selection::FileHandle;
use crate::types::{ColorSpace, ComposeError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use std::future::Future;
use std::path::Path;

/// An image ready to be embedded: its pixel size and a JPEG stream
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width_px: u32,
    pub height_px: u32,
    pub color_space: ColorSpace,
    /// Baseline or progressive JPEG data, embedded with `DCTDecode`
    pub jpeg: Vec<u8>,
}

/// Source of decoded images for the composer
pub trait ImageLoader: Send + Sync + 'static {
    /// Read and decode one selected file
    fn load(&self, file: FileHandle) -> impl Future<Output = Result<DecodedImage>> + Send;
}

/// Loads images from the filesystem
#[derive(Debug, Clone, Copy)]
pub struct FsImageLoader {
    jpeg_quality: u8,
}

impl FsImageLoader {
    pub fn new(jpeg_quality: u8) -> Self {
        Self { jpeg_quality }
    }
}

impl ImageLoader for FsImageLoader {
    async fn load(&self, file: FileHandle) -> Result<DecodedImage> {
        let bytes = tokio::fs::read(file.path()).await?;
        let quality = self.jpeg_quality;

        // Decoding and encoding are CPU-bound
        let decoded = tokio::task::spawn_blocking(move || decode_image(&bytes, quality)).await??;

        log::debug!(
            "Decoded {} ({}x{}, {} bytes)",
            file.path().display(),
            decoded.width_px,
            decoded.height_px,
            decoded.jpeg.len()
        );
        Ok(decoded)
    }
}

/// Decode raw file bytes into an embeddable image.
///
/// JPEG sources with one or three components are kept byte-for-byte; every
/// other source is converted to RGB and re-encoded at `jpeg_quality`.
pub fn decode_image(bytes: &[u8], jpeg_quality: u8) -> Result<DecodedImage> {
    let format = image::guess_format(bytes)?;
    let image = image::load_from_memory_with_format(bytes, format)?;
    let (width_px, height_px) = (image.width(), image.height());

    if width_px == 0 || height_px == 0 {
        return Err(ComposeError::InvalidDimensions {
            width: f64::from(width_px),
            height: f64::from(height_px),
        });
    }

    if format == ImageFormat::Jpeg {
        let passthrough = match (image.color(), jpeg_component_count(bytes)) {
            (ColorType::Rgb8, Some(3)) => Some(ColorSpace::Rgb),
            (ColorType::L8, Some(1)) => Some(ColorSpace::Gray),
            _ => None,
        };

        if let Some(color_space) = passthrough {
            return Ok(DecodedImage {
                width_px,
                height_px,
                color_space,
                jpeg: bytes.to_vec(),
            });
        }
    }

    let jpeg = encode_jpeg(image, jpeg_quality)?;
    Ok(DecodedImage {
        width_px,
        height_px,
        color_space: ColorSpace::Rgb,
        jpeg,
    })
}

/// Re-encode any decoded image as an RGB JPEG
fn encode_jpeg(image: DynamicImage, quality: u8) -> Result<Vec<u8>> {
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(image.into_rgb8());

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)?;
    Ok(buffer)
}

/// Number of colour components declared by a JPEG's start-of-frame marker
fn jpeg_component_count(bytes: &[u8]) -> Option<u8> {
    if bytes.len() < 4 || bytes[0] != 0xFF || bytes[1] != 0xD8 {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];

        // Fill bytes before a marker
        if marker == 0xFF {
            pos += 1;
            continue;
        }

        // Standalone markers carry no length
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }

        let length = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;

        // SOF0..SOF15, except DHT (C4), JPG (C8) and DAC (CC)
        let is_sof = (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            // length(2) precision(1) height(2) width(2) components(1)
            return bytes.get(pos + 9).copied();
        }

        // Start of scan: no frame header seen
        if marker == 0xDA {
            return None;
        }

        pos += 2 + length;
    }

    None
}

/// Read only the header of an image file to learn its pixel dimensions
pub async fn probe_dimensions(path: impl AsRef<Path>) -> Result<(u32, u32)> {
    let path = path.as_ref().to_owned();

    let dimensions = tokio::task::spawn_blocking(move || {
        let reader = ImageReader::open(&path)?.with_guessed_format()?;
        Ok::<_, ComposeError>(reader.into_dimensions()?)
    })
    .await??;

    Ok(dimensions)
}
