//! Page-fit layout
//!
//! Places an image on a page so that it fills the printable area (the page
//! minus a uniform margin) along its limiting axis, keeps its aspect ratio
//! and sits in the middle of the page. All values are millimeters with the
//! origin at the top-left corner of the page.

use crate::constants::PAGE_MARGIN_MM;
use crate::types::{ComposeError, PageSize, Result};

/// Position and size of an image on a page, in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageLayout {
    /// Distance from the left page edge
    pub x: f64,
    /// Distance from the top page edge
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PageLayout {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Distance from the bottom page edge to the bottom of the image.
    ///
    /// PDF user space grows upward, so this is the `y` to use when the
    /// layout is written into a content stream.
    pub fn bottom_offset(&self, page: PageSize) -> f64 {
        page.height_mm - self.y - self.height
    }
}

/// Fit an image of `image_width` x `image_height` (any unit, usually pixels)
/// onto `page` with the standard 10 mm margin.
pub fn fit_to_page(page: PageSize, image_width: f64, image_height: f64) -> Result<PageLayout> {
    fit_with_margin(page, PAGE_MARGIN_MM, image_width, image_height)
}

/// Fit an image onto `page`, keeping `margin_mm` clear on every side.
///
/// The image is scaled so its limiting dimension spans the printable area
/// exactly and the other dimension follows from the aspect ratio. Zero,
/// negative or non-finite dimensions are rejected.
pub fn fit_with_margin(
    page: PageSize,
    margin_mm: f64,
    image_width: f64,
    image_height: f64,
) -> Result<PageLayout> {
    ensure_positive(image_width, image_height)?;
    ensure_positive(page.width_mm, page.height_mm)?;

    let usable_width = page.width_mm - 2.0 * margin_mm;
    let usable_height = page.height_mm - 2.0 * margin_mm;
    ensure_positive(usable_width, usable_height)?;

    let image_ratio = image_width / image_height;
    let usable_ratio = usable_width / usable_height;

    let (width, height) = if image_ratio > usable_ratio {
        // Wider than the printable area: width is the limiting dimension
        (usable_width, usable_width / image_ratio)
    } else {
        (usable_height * image_ratio, usable_height)
    };

    let x = (page.width_mm - width) / 2.0;
    let y = (page.height_mm - height) / 2.0;

    Ok(PageLayout::new(x, y, width, height))
}

fn ensure_positive(width: f64, height: f64) -> Result<()> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(ComposeError::InvalidDimensions { width, height })
    }
}
