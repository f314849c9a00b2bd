use eframe::egui;
use photo_pdf::constants::{DEFAULT_OUTPUT_FILENAME, IMAGE_EXTENSIONS, THUMBNAIL_MAX_EDGE};
use photo_pdf::{ComposeOptions, FileHandle, PhotoSelection, PreviewHandle};
use photo_pdf_runtime::{PdfCommand, PdfUpdate};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::logger::AppLogger;
use crate::views::{PreviewState, show_log_panel, show_selection};

const EMPTY_SELECTION_NOTICE: &str = "Please select at least one photo";
const GENERATE_FAILED_NOTICE: &str = "Failed to generate PDF. Please try again.";

#[derive(Clone)]
struct ProgressState {
    operation: String,
    current: usize,
    total: usize,
}

/// Message window shown until dismissed
struct Notice {
    title: &'static str,
    message: String,
    details: Vec<String>,
}

pub struct PhotoPdfApp {
    selection: PhotoSelection,
    previews: HashMap<PreviewHandle, PreviewState>,
    output_path: String,
    jpeg_quality: u8,
    status: String,
    generating: bool,
    notice: Option<Notice>,
    show_log: bool,
    logger: AppLogger,

    // Async infrastructure
    command_tx: mpsc::UnboundedSender<PdfCommand>,
    update_rx: mpsc::UnboundedReceiver<PdfUpdate>,

    // Progress tracking
    progress: Option<ProgressState>,

    _tokio_handle: tokio::runtime::Handle,
}

impl PhotoPdfApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        tokio_handle: tokio::runtime::Handle,
        logger: AppLogger,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        // Spawn worker task
        tokio_handle.spawn(crate::worker::worker_task(command_rx, update_tx));

        let defaults = ComposeOptions::default();
        Self {
            selection: PhotoSelection::new(),
            previews: HashMap::new(),
            output_path: defaults.output_path.display().to_string(),
            jpeg_quality: defaults.jpeg_quality,
            status: String::new(),
            generating: false,
            notice: None,
            show_log: false,
            logger,
            command_tx,
            update_rx,
            progress: None,
            _tokio_handle: tokio_handle,
        }
    }

    fn options(&self) -> ComposeOptions {
        ComposeOptions {
            output_path: PathBuf::from(self.output_path.trim()),
            jpeg_quality: self.jpeg_quality,
        }
    }

    fn send(&mut self, cmd: PdfCommand) {
        if self.command_tx.send(cmd).is_err() {
            log::error!("Background worker is not running");
            self.status = "Error: background worker stopped".to_string();
            self.generating = false;
        }
    }

    /// Replace the selection with `paths`; previews of the old selection are dropped
    fn select_files(&mut self, paths: Vec<PathBuf>) {
        let files: Vec<FileHandle> = paths
            .into_iter()
            .filter_map(|path| match FileHandle::from_path(&path) {
                Ok(file) => Some(file),
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    None
                }
            })
            .collect();

        self.selection = self.selection.select(files);
        self.previews.clear();
        self.status = format!("Selected {} photos", self.selection.len());
        log::info!("{}", self.status);

        if !self.selection.is_empty() {
            self.send(PdfCommand::LoadThumbnails {
                previews: self.selection.previews().to_vec(),
                max_edge: THUMBNAIL_MAX_EDGE,
            });
        }
    }

    fn remove_file(&mut self, index: usize) {
        match self.selection.remove(index) {
            Ok(selection) => {
                self.selection = selection;
                let selection = &self.selection;
                self.previews.retain(|preview, _| selection.is_current(preview));
                self.status = format!("{} photos selected", self.selection.len());
            }
            Err(e) => log::warn!("Remove ignored: {e}"),
        }
    }

    fn generate(&mut self) {
        self.generating = true;
        self.status = "Generating PDF...".to_string();
        self.send(PdfCommand::Generate {
            files: self.selection.files().to_vec(),
            options: self.options(),
        });
    }

    fn finish_generate(&mut self) {
        self.generating = false;
        self.progress = None;
    }

    fn handle_update(&mut self, ctx: &egui::Context, update: PdfUpdate) {
        if !accepts(&self.selection, &update) {
            log::debug!("Dropping stale preview update");
            return;
        }

        match update {
            PdfUpdate::Progress {
                operation,
                current,
                total,
            } => {
                self.progress = Some(ProgressState {
                    operation,
                    current,
                    total,
                });
            }
            PdfUpdate::ThumbnailReady {
                preview,
                width,
                height,
                rgba_data,
            } => {
                let color_image =
                    egui::ColorImage::from_rgba_unmultiplied([width, height], &rgba_data);
                let texture = ctx.load_texture(
                    format!("preview-{}-{}", preview.generation(), preview.key()),
                    color_image,
                    egui::TextureOptions::LINEAR,
                );
                self.previews.insert(preview, PreviewState::Ready(texture));
            }
            PdfUpdate::ThumbnailFailed { preview, message } => {
                self.previews.insert(preview, PreviewState::Failed(message));
            }
            PdfUpdate::GenerateComplete { path, page_count } => {
                self.finish_generate();
                self.status = format!("Generated {} pages → {}", page_count, path.display());
            }
            PdfUpdate::NothingSelected => {
                self.finish_generate();
                self.status.clear();
                self.notice = Some(Notice {
                    title: "No photos",
                    message: EMPTY_SELECTION_NOTICE.to_string(),
                    details: Vec::new(),
                });
            }
            PdfUpdate::GenerateFailed { failures, total } => {
                self.finish_generate();
                self.status = format!("Failed to process {} of {} photos", failures.len(), total);
                self.notice = Some(Notice {
                    title: "Error",
                    message: GENERATE_FAILED_NOTICE.to_string(),
                    details: failures.iter().map(ToString::to_string).collect(),
                });
            }
            PdfUpdate::ConfigLoaded { options } => {
                self.output_path = options.output_path.display().to_string();
                self.jpeg_quality = options.jpeg_quality;
                self.status = "Loaded settings".to_string();
            }
            PdfUpdate::Error { message } => {
                if self.generating {
                    self.notice = Some(Notice {
                        title: "Error",
                        message: GENERATE_FAILED_NOTICE.to_string(),
                        details: vec![message.clone()],
                    });
                }
                self.finish_generate();
                self.status = format!("Error: {message}");
            }
        }
    }

    fn show_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.generating, egui::Button::new("📂 Select Photos…"))
                .clicked()
            {
                if let Some(paths) = rfd::FileDialog::new()
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .pick_files()
                {
                    self.select_files(paths);
                }
            }

            let can_generate = !self.selection.is_empty() && !self.generating;
            if ui
                .add_enabled(can_generate, egui::Button::new("📄 Generate PDF"))
                .clicked()
            {
                self.generate();
            }

            ui.separator();

            ui.label("Output:");
            ui.text_edit_singleline(&mut self.output_path);
            if ui.button("…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("PDF", &["pdf"])
                    .set_file_name(DEFAULT_OUTPUT_FILENAME)
                    .save_file()
                {
                    self.output_path = path.display().to_string();
                }
            }

            ui.separator();

            ui.add(egui::Slider::new(&mut self.jpeg_quality, 1..=100).text("JPEG quality"));

            if ui.button("Load Settings…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("JSON", &["json"])
                    .pick_file()
                {
                    self.send(PdfCommand::LoadConfig { path });
                }
            }
        });
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.notice else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(notice.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&notice.message);
                for line in &notice.details {
                    ui.small(line);
                }
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.notice = None;
        }
    }
}

/// Thumbnail updates only apply to previews the selection still holds
fn accepts(selection: &PhotoSelection, update: &PdfUpdate) -> bool {
    update
        .preview()
        .is_none_or(|preview| selection.is_current(preview))
}

impl eframe::App for PhotoPdfApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Dropped image files replace the selection
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if !dropped.is_empty() && !self.generating {
            self.select_files(dropped);
        }

        // Process all pending updates from worker
        while let Ok(update) = self.update_rx.try_recv() {
            self.handle_update(ctx, update);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.show_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            if let Some(ref progress) = self.progress {
                ui.label(&progress.operation);
                ui.add(
                    egui::ProgressBar::new(progress.current as f32 / progress.total.max(1) as f32)
                        .show_percentage(),
                );
            }

            ui.horizontal(|ui| {
                let status = self
                    .logger
                    .latest_message()
                    .filter(|_| self.status.is_empty())
                    .unwrap_or_else(|| self.status.clone());
                ui.label(status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.toggle_value(&mut self.show_log, "Log");
                });
            });

            if self.show_log {
                ui.separator();
                show_log_panel(ui, &self.logger);
            }
        });

        let mut remove = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            remove = show_selection(ui, &self.selection, &self.previews);
        });
        if let Some(index) = remove {
            self.remove_file(index);
        }

        self.show_notice(ctx);

        // Keep polling while background work is outstanding
        if self.generating || self.previews.len() < self.selection.len() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
