//! PDF output for composed photos
//!
//! [`DocumentBuilder`] starts with one empty page. The first image is drawn
//! on that page; every later image is preceded by [`DocumentBuilder::add_page`].
//! Pages are only turned into PDF objects by [`DocumentBuilder::finish`].

use crate::constants::{PDF_VERSION, mm_to_pt};
use crate::decode::DecodedImage;
use crate::layout::PageLayout;
use crate::types::{PageSize, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

/// Content collected for one output page
#[derive(Debug, Default)]
struct PendingPage {
    ops: Vec<String>,
    xobjects: Dictionary,
}

/// Sequential writer for a one-image-per-page document
pub struct DocumentBuilder {
    output: Document,
    page_size: PageSize,
    pages: Vec<PendingPage>,
    image_count: usize,
}

impl DocumentBuilder {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            output: Document::with_version(PDF_VERSION),
            page_size,
            pages: vec![PendingPage::default()],
            image_count: 0,
        }
    }

    /// Start a new empty page; later drawing goes there
    pub fn add_page(&mut self) {
        self.pages.push(PendingPage::default());
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Embed `image` and place it on the current page at `layout`
    pub fn draw_image(&mut self, image: &DecodedImage, layout: &PageLayout) {
        let xobject_id = self.output.add_object(image_xobject(image));
        let name = format!("Im{}", self.image_count);
        self.image_count += 1;

        let command = placement_command(&name, layout, self.page_size);
        let page = self.current_page();
        page.xobjects.set(name.as_bytes(), Object::Reference(xobject_id));
        page.ops.push(command);
    }

    fn current_page(&mut self) -> &mut PendingPage {
        if self.pages.is_empty() {
            self.pages.push(PendingPage::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Write the page tree and catalog and hand back the document
    pub fn finish(mut self) -> Document {
        let pages_tree_id = self.output.new_object_id();
        let width_pt = mm_to_pt(self.page_size.width_mm) as f32;
        let height_pt = mm_to_pt(self.page_size.height_mm) as f32;

        let mut page_refs = Vec::new();
        for page in std::mem::take(&mut self.pages) {
            let page_id = write_page(&mut self.output, page, pages_tree_id, width_pt, height_pt);
            page_refs.push(Object::Reference(page_id));
        }

        // Create pages tree
        let count = page_refs.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(page_refs)),
            ("Count", Object::Integer(count)),
        ]);
        self.output
            .objects
            .insert(pages_tree_id, Object::Dictionary(pages_dict));

        // Create catalog
        let catalog_id = self.output.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_tree_id)),
        ]));
        self.output.trailer.set("Root", catalog_id);

        self.output
    }
}

fn write_page(
    output: &mut Document,
    page: PendingPage,
    parent_id: ObjectId,
    width_pt: f32,
    height_pt: f32,
) -> ObjectId {
    let content = page.ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut resources = Dictionary::new();
    if !page.xobjects.is_empty() {
        resources.set("XObject", Object::Dictionary(page.xobjects));
    }

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(width_pt),
            Object::Real(height_pt),
        ]),
    );
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    output.add_object(page_dict)
}

/// Image XObject wrapping the JPEG stream as-is
fn image_xobject(image: &DecodedImage) -> Stream {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(i64::from(image.width_px)));
    dict.set("Height", Object::Integer(i64::from(image.height_px)));
    dict.set(
        "ColorSpace",
        Object::Name(image.color_space.pdf_name().to_vec()),
    );
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));

    let mut stream = Stream::new(dict, image.jpeg.clone());
    // Already DCT-compressed
    stream.allows_compression = false;
    stream
}

/// Content stream command drawing an image XObject into `layout`.
///
/// Image space is the unit square, so the matrix scales it to the layout
/// size and moves it to the layout's lower-left corner in PDF space.
fn placement_command(xobject_name: &str, layout: &PageLayout, page: PageSize) -> String {
    let width = mm_to_pt(layout.width);
    let height = mm_to_pt(layout.height);
    let x = mm_to_pt(layout.x);
    let y = mm_to_pt(layout.bottom_offset(page));

    format!(
        "q {:.4} 0 0 {:.4} {:.4} {:.4} cm /{} Do Q\n",
        width, height, x, y, xobject_name
    )
}

/// Save a finished document to `path`.
///
/// The bytes go to a temporary sibling first and are renamed into place,
/// so a failed save never leaves a truncated PDF behind.
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, crate::types::ComposeError>(writer)
    })
    .await??;

    let mut staging = path.clone().into_os_string();
    staging.push(".part");

    if let Err(e) = tokio::fs::write(&staging, bytes).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&staging, &path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }

    log::info!("Saved {}", path.display());
    Ok(())
}
