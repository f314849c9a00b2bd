use std::path::PathBuf;

// Re-export types from the library crate
pub use photo_pdf::{ComposeOptions, FileHandle, ImageFailure, PreviewHandle};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum PdfCommand {
    /// Decode thumbnails for a freshly made selection
    LoadThumbnails {
        previews: Vec<PreviewHandle>,
        max_edge: u32,
    },
    Generate {
        files: Vec<FileHandle>,
        options: ComposeOptions,
    },
    LoadConfig {
        path: PathBuf,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum PdfUpdate {
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    ThumbnailReady {
        preview: PreviewHandle,
        width: usize,
        height: usize,
        rgba_data: Vec<u8>,
    },
    ThumbnailFailed {
        preview: PreviewHandle,
        message: String,
    },
    GenerateComplete {
        path: PathBuf,
        page_count: usize,
    },
    /// Generate was requested with nothing selected
    NothingSelected,
    /// One or more images could not be read; nothing was written
    GenerateFailed {
        failures: Vec<ImageFailure>,
        total: usize,
    },
    ConfigLoaded {
        options: ComposeOptions,
    },
    Error {
        message: String,
    },
}

impl PdfUpdate {
    /// Preview a thumbnail update refers to
    pub fn preview(&self) -> Option<&PreviewHandle> {
        match self {
            PdfUpdate::ThumbnailReady { preview, .. }
            | PdfUpdate::ThumbnailFailed { preview, .. } => Some(preview),
            _ => None,
        }
    }
}
