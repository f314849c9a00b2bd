//! Photo selection state
//!
//! A [`PhotoSelection`] is an immutable value: selecting or removing files
//! returns a new selection and leaves the old one untouched. Files and
//! previews are stored side by side and always share indices.

use crate::types::{ComposeError, Result};
use image::ImageFormat;
use std::path::{Path, PathBuf};

/// A selected image file and its media type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    path: PathBuf,
    media_type: &'static str,
}

impl FileHandle {
    /// Create a handle for an image file.
    ///
    /// The media type is derived from the file extension; paths that do not
    /// name a readable image format are rejected.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)
            .map_err(|_| ComposeError::UnsupportedMediaType(path.to_path_buf()))?;

        if !format.reading_enabled() {
            return Err(ComposeError::UnsupportedMediaType(path.to_path_buf()));
        }

        Ok(Self {
            path: path.to_path_buf(),
            media_type: format.to_mime_type(),
        })
    }

    /// Create handles for several paths, keeping their order
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Self>> {
        paths.iter().map(Self::from_path).collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// MIME type, e.g. `image/jpeg`
    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    /// File name for display, falling back to the full path
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Display reference for one selected file.
///
/// A preview is only meaningful for the selection generation that issued
/// it; see [`PhotoSelection::is_current`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle {
    generation: u64,
    key: usize,
    path: PathBuf,
}

impl PreviewHandle {
    /// Generation of the selection that issued this preview
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stable key within the generation (the file's original position)
    pub fn key(&self) -> usize {
        self.key
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Ordered set of selected files with their paired previews
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoSelection {
    files: Vec<FileHandle>,
    previews: Vec<PreviewHandle>,
    generation: u64,
}

impl PhotoSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `files`.
    ///
    /// Issues a fresh preview per file under a new generation, which
    /// supersedes every preview handed out before. An empty list is valid
    /// and yields an empty selection.
    pub fn select(&self, files: Vec<FileHandle>) -> Self {
        let generation = self.generation + 1;
        let previews = files
            .iter()
            .enumerate()
            .map(|(key, file)| PreviewHandle {
                generation,
                key,
                path: file.path.clone(),
            })
            .collect();

        log::debug!(
            "Selected {} files (generation {})",
            files.len(),
            generation
        );

        Self {
            files,
            previews,
            generation,
        }
    }

    /// Remove the file and preview at `index`.
    ///
    /// Out-of-range indices are rejected and leave the selection as it was.
    pub fn remove(&self, index: usize) -> Result<Self> {
        if index >= self.files.len() {
            return Err(ComposeError::IndexOutOfRange {
                index,
                len: self.files.len(),
            });
        }

        let mut files = self.files.clone();
        let mut previews = self.previews.clone();
        files.remove(index);
        previews.remove(index);

        Ok(Self {
            files,
            previews,
            generation: self.generation,
        })
    }

    pub fn files(&self) -> &[FileHandle] {
        &self.files
    }

    pub fn previews(&self) -> &[PreviewHandle] {
        &self.previews
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `preview` was issued by this selection's generation and is
    /// still part of it.
    pub fn is_current(&self, preview: &PreviewHandle) -> bool {
        preview.generation == self.generation && self.previews.contains(preview)
    }

    /// Iterate over `(file, preview)` pairs in selection order
    pub fn iter(&self) -> impl Iterator<Item = (&FileHandle, &PreviewHandle)> {
        self.files.iter().zip(self.previews.iter())
    }
}
