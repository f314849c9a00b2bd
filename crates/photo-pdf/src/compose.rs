//! Document assembly
//!
//! Composition runs in two phases:
//! 1. Fan out: every selected file is read and decoded on its own task.
//! 2. Fan in: once *all* tasks have settled, pages are written strictly in
//!    selection order. If any image failed, nothing is written and the
//!    failures are reported together.

use crate::decode::{DecodedImage, FsImageLoader, ImageLoader};
use crate::layout::{PageLayout, fit_to_page};
use crate::options::ComposeOptions;
use crate::render::{DocumentBuilder, save_pdf};
use crate::selection::FileHandle;
use crate::types::*;
use lopdf::Document;
use std::sync::Arc;

/// Composes selected photos into a PDF using an [`ImageLoader`]
pub struct Composer<L = FsImageLoader> {
    loader: Arc<L>,
    options: ComposeOptions,
    page_size: PageSize,
}

impl Composer<FsImageLoader> {
    /// Composer that reads images from disk
    pub fn new(options: ComposeOptions) -> Self {
        let loader = FsImageLoader::new(options.jpeg_quality);
        Self::with_loader(options, loader)
    }
}

impl<L: ImageLoader> Composer<L> {
    pub fn with_loader(options: ComposeOptions, loader: L) -> Self {
        Self {
            loader: Arc::new(loader),
            options,
            page_size: PageSize::a4(),
        }
    }

    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    /// Build the document in memory
    pub async fn compose(&self, files: &[FileHandle]) -> Result<Document> {
        self.compose_with_progress(files, |_, _| {}).await
    }

    /// Build the document, calling `on_progress(done, total)` as images
    /// are collected in selection order
    pub async fn compose_with_progress<F>(
        &self,
        files: &[FileHandle],
        mut on_progress: F,
    ) -> Result<Document>
    where
        F: FnMut(usize, usize),
    {
        if files.is_empty() {
            return Err(ComposeError::NoImages);
        }
        self.options.validate()?;

        let total = files.len();
        let placed = self.load_all(files, &mut on_progress).await?;

        // All images decoded: write pages in selection order
        let mut builder = DocumentBuilder::new(self.page_size);
        for (index, (image, layout)) in placed.iter().enumerate() {
            if index > 0 {
                builder.add_page();
            }
            builder.draw_image(image, layout);
        }

        log::info!("Composed {} pages", total);
        Ok(builder.finish())
    }

    /// Compose and save to the configured output path
    pub async fn compose_to_file(&self, files: &[FileHandle]) -> Result<ComposeSummary> {
        let doc = self.compose(files).await?;
        let page_count = doc.get_pages().len();
        save_pdf(doc, &self.options.output_path).await?;

        Ok(ComposeSummary {
            path: self.options.output_path.clone(),
            page_count,
        })
    }

    /// Decode and lay out every file concurrently, wait for all of them,
    /// and return the results indexed like `files`.
    async fn load_all<F>(
        &self,
        files: &[FileHandle],
        on_progress: &mut F,
    ) -> Result<Vec<(DecodedImage, PageLayout)>>
    where
        F: FnMut(usize, usize),
    {
        let total = files.len();
        let page_size = self.page_size;

        // Launch everything before awaiting anything
        let handles: Vec<_> = files
            .iter()
            .cloned()
            .map(|file| {
                let loader = Arc::clone(&self.loader);
                tokio::spawn(async move {
                    let image = loader.load(file).await?;
                    let layout = fit_to_page(
                        page_size,
                        f64::from(image.width_px),
                        f64::from(image.height_px),
                    )?;
                    Ok::<_, ComposeError>((image, layout))
                })
            })
            .collect();

        let mut slots: Vec<Option<(DecodedImage, PageLayout)>> = vec![None; total];
        let mut failures = Vec::new();

        for (index, handle) in handles.into_iter().enumerate() {
            let reason = match handle.await {
                Ok(Ok(placed)) => {
                    slots[index] = Some(placed);
                    None
                }
                Ok(Err(e)) => Some(e.to_string()),
                Err(e) => Some(ComposeError::from(e).to_string()),
            };

            if let Some(reason) = reason {
                let path = files[index].path().to_path_buf();
                log::warn!("Failed to load {}: {}", path.display(), reason);
                failures.push(ImageFailure {
                    index,
                    path,
                    reason,
                });
            }

            on_progress(index + 1, total);
        }

        if !failures.is_empty() {
            return Err(ComposeError::Processing { failures, total });
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

/// Compose `files` with the default filesystem loader
pub async fn compose(files: &[FileHandle], options: &ComposeOptions) -> Result<Document> {
    Composer::new(options.clone()).compose(files).await
}

/// Compose `files` and save the result to `options.output_path`
pub async fn compose_to_file(
    files: &[FileHandle],
    options: &ComposeOptions,
) -> Result<ComposeSummary> {
    Composer::new(options.clone()).compose_to_file(files).await
}
