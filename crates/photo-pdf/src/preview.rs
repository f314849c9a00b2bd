use crate::selection::PreviewHandle;
use crate::types::*;
use image::GenericImageView;

/// RGBA pixels for drawing a preview
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// Decode the file behind `preview` and shrink it so neither edge exceeds
/// `max_edge` pixels. Small images keep their size.
pub async fn load_thumbnail(preview: &PreviewHandle, max_edge: u32) -> Result<Thumbnail> {
    let bytes = tokio::fs::read(preview.path()).await?;

    let thumbnail = tokio::task::spawn_blocking(move || {
        let image = image::load_from_memory(&bytes)?;
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ComposeError::InvalidDimensions {
                width: f64::from(width),
                height: f64::from(height),
            });
        }

        let image = if width > max_edge || height > max_edge {
            image.thumbnail(max_edge, max_edge)
        } else {
            image
        };

        let rgba = image.to_rgba8();
        Ok::<_, ComposeError>(Thumbnail {
            width: rgba.width() as usize,
            height: rgba.height() as usize,
            rgba: rgba.into_raw(),
        })
    })
    .await??;

    Ok(thumbnail)
}
