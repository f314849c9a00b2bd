use crate::constants::{A4_HEIGHT_MM, A4_WIDTH_MM};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("No images selected")]
    NoImages,
    #[error("Failed to process {} of {total} images", .failures.len())]
    Processing {
        failures: Vec<ImageFailure>,
        total: usize,
    },
    #[error("Invalid dimensions {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("Index {index} out of range for selection of {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Unsupported media type: {}", .0.display())]
    UnsupportedMediaType(PathBuf),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ComposeError>;

impl ComposeError {
    /// Whether this error is the "nothing selected" notice rather than a failure
    pub fn is_empty_selection(&self) -> bool {
        matches!(self, ComposeError::NoImages)
    }
}

/// One image that could not be read or decoded during composition
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFailure {
    /// Position of the image in the selection
    pub index: usize,
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for ImageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {}: {}",
            self.index + 1,
            self.path.display(),
            self.reason
        )
    }
}

/// Page dimensions in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageSize {
    pub const fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }

    /// A4 portrait, the only format the composer writes
    pub const fn a4() -> Self {
        Self::new(A4_WIDTH_MM, A4_HEIGHT_MM)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::a4()
    }
}

/// Colour space of an embedded JPEG stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Rgb,
    Gray,
}

impl ColorSpace {
    /// PDF name for the colour space
    pub fn pdf_name(self) -> &'static [u8] {
        match self {
            ColorSpace::Rgb => b"DeviceRGB",
            ColorSpace::Gray => b"DeviceGray",
        }
    }
}

/// Result of a successful compose-and-save
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeSummary {
    pub path: PathBuf,
    pub page_count: usize,
}
