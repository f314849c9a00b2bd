use photo_pdf::PreviewHandle;
use photo_pdf_runtime::PdfUpdate;
use tokio::sync::mpsc;

/// Decode every thumbnail on its own task; results arrive in completion order
pub fn handle_load_thumbnails(
    previews: Vec<PreviewHandle>,
    max_edge: u32,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    for preview in previews {
        let update_tx = update_tx.clone();
        tokio::spawn(async move {
            let update = match photo_pdf::load_thumbnail(&preview, max_edge).await {
                Ok(thumb) => PdfUpdate::ThumbnailReady {
                    preview,
                    width: thumb.width,
                    height: thumb.height,
                    rgba_data: thumb.rgba,
                },
                Err(e) => {
                    log::warn!("No preview for {}: {}", preview.path().display(), e);
                    PdfUpdate::ThumbnailFailed {
                        preview,
                        message: e.to_string(),
                    }
                }
            };
            let _ = update_tx.send(update);
        });
    }
}
