use photo_pdf_runtime::{PdfCommand, PdfUpdate};
use tokio::sync::mpsc;

use crate::handlers;

/// Async worker task that processes commands from the UI and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<PdfCommand>,
    update_tx: mpsc::UnboundedSender<PdfUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut command_rx, &update_tx).await;
    }
    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(
    cmd: PdfCommand,
    command_rx: &mut mpsc::UnboundedReceiver<PdfCommand>,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    match cmd {
        PdfCommand::LoadThumbnails {
            mut previews,
            mut max_edge,
        } => {
            // Drain queued thumbnail requests, keeping only the newest selection
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let PdfCommand::LoadThumbnails {
                    previews: newer,
                    max_edge: newer_edge,
                } = next_cmd
                {
                    log::debug!("Discarding queued thumbnails, using newer selection");
                    previews = newer;
                    max_edge = newer_edge;
                } else {
                    Box::pin(process_command(next_cmd, command_rx, update_tx)).await;
                }
            }

            handlers::preview::handle_load_thumbnails(previews, max_edge, update_tx);
        }
        PdfCommand::Generate { files, options } => {
            handlers::compose::handle_generate(files, options, update_tx).await;
        }
        PdfCommand::LoadConfig { path } => {
            handlers::compose::handle_load_config(path, update_tx).await;
        }
    }
}
