//! Compose photos into a multi-page PDF, one image per A4 page
//!
//! The crate covers the whole pipeline:
//! 1. Select image files and pair each with a preview ([`PhotoSelection`])
//! 2. Decode every image concurrently ([`ImageLoader`])
//! 3. Fit each image onto the page ([`fit_to_page`])
//! 4. Write the pages in selection order and save ([`Composer`])

mod compose;
pub mod constants;
mod decode;
mod layout;
mod options;
mod preview;
mod render;
mod selection;
mod types;

pub use compose::{Composer, compose, compose_to_file};
pub use decode::{DecodedImage, FsImageLoader, ImageLoader, decode_image, probe_dimensions};
pub use layout::{PageLayout, fit_to_page, fit_with_margin};
pub use options::*;
pub use preview::{Thumbnail, load_thumbnail};
pub use render::{DocumentBuilder, save_pdf};
pub use selection::{FileHandle, PhotoSelection, PreviewHandle};
pub use types::*;
