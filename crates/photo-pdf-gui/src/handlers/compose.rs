use photo_pdf::{ComposeError, ComposeOptions, Composer, FileHandle};
use photo_pdf_runtime::PdfUpdate;
use std::path::PathBuf;
use tokio::sync::mpsc;

pub async fn handle_generate(
    files: Vec<FileHandle>,
    options: ComposeOptions,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let composer = Composer::new(options);
    let result = composer
        .compose_with_progress(&files, |current, total| {
            let _ = update_tx.send(PdfUpdate::Progress {
                operation: "Processing photos".to_string(),
                current,
                total,
            });
        })
        .await;

    let doc = match result {
        Ok(doc) => doc,
        Err(e) => {
            let _ = update_tx.send(failure_update(e));
            return;
        }
    };

    let page_count = doc.get_pages().len();
    let path = composer.options().output_path.clone();
    let update = match photo_pdf::save_pdf(doc, &path).await {
        Ok(()) => PdfUpdate::GenerateComplete { path, page_count },
        Err(e) => PdfUpdate::Error {
            message: format!("Failed to save PDF: {e}"),
        },
    };
    let _ = update_tx.send(update);
}

pub async fn handle_load_config(path: PathBuf, update_tx: &mpsc::UnboundedSender<PdfUpdate>) {
    let update = match ComposeOptions::load(&path).await {
        Ok(options) => PdfUpdate::ConfigLoaded { options },
        Err(e) => PdfUpdate::Error {
            message: format!("Failed to load settings: {e}"),
        },
    };
    let _ = update_tx.send(update);
}

fn failure_update(error: ComposeError) -> PdfUpdate {
    match error {
        ComposeError::NoImages => PdfUpdate::NothingSelected,
        ComposeError::Processing { failures, total } => {
            PdfUpdate::GenerateFailed { failures, total }
        }
        other => PdfUpdate::Error {
            message: format!("Failed to generate PDF: {other}"),
        },
    }
}
