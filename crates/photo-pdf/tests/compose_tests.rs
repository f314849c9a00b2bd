use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use lopdf::Document;
use lopdf::content::Content;
use photo_pdf::constants::POINTS_PER_MM;
use photo_pdf::*;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

fn write_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let format = ImageFormat::from_path(&path).unwrap();
    let image = match format {
        ImageFormat::Png => {
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 128, 255, 128])))
        }
        _ => DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 100, 50]))),
    };
    image.save_with_format(&path, format).unwrap();
    path
}

fn handles(paths: &[PathBuf]) -> Vec<FileHandle> {
    FileHandle::from_paths(paths).unwrap()
}

/// (Width, Height) of the image XObject on each page, in page order
fn page_images(doc: &Document) -> Vec<(i64, i64)> {
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
            let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
            assert_eq!(xobjects.len(), 1, "one image per page");

            let (_, reference) = xobjects.iter().next().unwrap();
            let stream = doc
                .get_object(reference.as_reference().unwrap())
                .unwrap()
                .as_stream()
                .unwrap();
            assert_eq!(
                stream.dict.get(b"Filter").unwrap().as_name().unwrap(),
                b"DCTDecode"
            );
            (
                stream.dict.get(b"Width").unwrap().as_i64().unwrap(),
                stream.dict.get(b"Height").unwrap().as_i64().unwrap(),
            )
        })
        .collect()
}

/// Image placement on each page as millimeters: (x, y-from-bottom, width, height)
fn page_placements(doc: &Document) -> Vec<(f64, f64, f64, f64)> {
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            let cm = content
                .operations
                .iter()
                .find(|op| op.operator == "cm")
                .expect("placement matrix");
            let v: Vec<f64> = cm
                .operands
                .iter()
                .map(|o| f64::from(o.as_float().unwrap()) / POINTS_PER_MM)
                .collect();
            (v[4], v[5], v[0], v[3])
        })
        .collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}

#[tokio::test]
async fn test_compose_landscape_then_portrait() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_image(dir.path(), "landscape.jpg", 1000, 500),
        write_image(dir.path(), "portrait.jpg", 500, 1000),
    ];

    let doc = compose(&handles(&paths), &ComposeOptions::default())
        .await
        .unwrap();

    assert_eq!(doc.get_pages().len(), 2);
    assert_eq!(page_images(&doc), vec![(1000, 500), (500, 1000)]);

    let placements = page_placements(&doc);

    // Page 1: 190 x 95 at (10, 101)
    let (x, y, w, h) = placements[0];
    assert_close(w, 190.0);
    assert_close(h, 95.0);
    assert_close(x, 10.0);
    assert_close(y, 297.0 - 101.0 - 95.0);

    // Page 2: 138.5 x 277 at (35.75, 10)
    let (x, y, w, h) = placements[1];
    assert_close(w, 138.5);
    assert_close(h, 277.0);
    assert_close(x, 35.75);
    assert_close(y, 10.0);
}

#[tokio::test]
async fn test_every_page_is_a4_portrait() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_image(dir.path(), "a.jpg", 300, 200),
        write_image(dir.path(), "b.png", 200, 300),
        write_image(dir.path(), "c.bmp", 50, 50),
    ];

    let doc = compose(&handles(&paths), &ComposeOptions::default())
        .await
        .unwrap();

    for &page_id in doc.get_pages().values() {
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        let width = f64::from(media_box[2].as_float().unwrap()) / POINTS_PER_MM;
        let height = f64::from(media_box[3].as_float().unwrap()) / POINTS_PER_MM;
        assert_close(width, 210.0);
        assert_close(height, 297.0);
    }
}

#[tokio::test]
async fn test_compose_empty_selection() {
    let result = compose(&[], &ComposeOptions::default()).await;
    match result {
        Err(ComposeError::NoImages) => {}
        other => panic!("Expected NoImages, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_compose_to_file_empty_selection_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("photos.pdf");
    let options = ComposeOptions {
        output_path: output.clone(),
        ..Default::default()
    };

    let result = compose_to_file(&[], &options).await;
    assert!(result.unwrap_err().is_empty_selection());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_compose_to_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_image(dir.path(), "one.jpg", 120, 80),
        write_image(dir.path(), "two.png", 80, 120),
        write_image(dir.path(), "three.gif", 64, 64),
    ];
    let output = dir.path().join("album.pdf");
    let options = ComposeOptions {
        output_path: output.clone(),
        ..Default::default()
    };

    let summary = compose_to_file(&handles(&paths), &options).await.unwrap();
    assert_eq!(summary.page_count, 3);
    assert_eq!(summary.path, output);

    let bytes = std::fs::read(&output).unwrap();
    let loaded = Document::load_mem(&bytes).unwrap();
    assert_eq!(page_images(&loaded), vec![(120, 80), (80, 120), (64, 64)]);

    // No staging file left behind
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".part"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_one_bad_image_aborts_everything() {
    let dir = TempDir::new().unwrap();
    let good = write_image(dir.path(), "good.jpg", 100, 100);
    let bad = dir.path().join("bad.jpg");
    std::fs::write(&bad, b"this is not a jpeg").unwrap();

    let output = dir.path().join("photos.pdf");
    let options = ComposeOptions {
        output_path: output.clone(),
        ..Default::default()
    };

    let result = compose_to_file(&handles(&[good, bad.clone()]), &options).await;
    match result {
        Err(ComposeError::Processing { failures, total }) => {
            assert_eq!(total, 2);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].index, 1);
            assert_eq!(failures[0].path, bad);
        }
        other => panic!("Expected Processing error, got {:?}", other),
    }

    assert!(!output.exists());
}

#[tokio::test]
async fn test_missing_file_is_a_processing_error() {
    let dir = TempDir::new().unwrap();
    let good = write_image(dir.path(), "good.png", 10, 10);
    let missing = dir.path().join("gone.jpg");

    let result = compose(&handles(&[missing, good]), &ComposeOptions::default()).await;
    match result {
        Err(ComposeError::Processing { failures, total }) => {
            assert_eq!(total, 2);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].index, 0);
        }
        other => panic!("Expected Processing error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_all_failures_reported_in_order() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.jpg");
    let second = dir.path().join("second.png");
    std::fs::write(&first, b"nope").unwrap();
    std::fs::write(&second, b"also nope").unwrap();

    let result = compose(&handles(&[first, second]), &ComposeOptions::default()).await;
    match result {
        Err(ComposeError::Processing { failures, .. }) => {
            let indices: Vec<_> = failures.iter().map(|f| f.index).collect();
            assert_eq!(indices, vec![0, 1]);
        }
        other => panic!("Expected Processing error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_invalid_options_rejected_before_loading() {
    let dir = TempDir::new().unwrap();
    let path = write_image(dir.path(), "a.jpg", 10, 10);
    let options = ComposeOptions {
        jpeg_quality: 0,
        ..Default::default()
    };

    let result = compose(&handles(&[path]), &options).await;
    assert!(matches!(result, Err(ComposeError::Config(_))));
}

#[tokio::test]
async fn test_progress_reports_every_image() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<_> = (0..4)
        .map(|i| write_image(dir.path(), &format!("{i}.jpg"), 20 + i, 20))
        .collect();

    let composer = Composer::new(ComposeOptions::default());
    let mut seen = Vec::new();
    composer
        .compose_with_progress(&handles(&paths), |done, total| seen.push((done, total)))
        .await
        .unwrap();

    assert_eq!(seen, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
}

// =============================================================================
// Custom loaders
// =============================================================================

/// Finishes later images first: file `n.jpg` sleeps `(count - n) * 10` ms
struct ReversedLoader {
    count: u64,
}

impl ImageLoader for ReversedLoader {
    async fn load(&self, file: FileHandle) -> Result<DecodedImage> {
        let n: u32 = file
            .path()
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ComposeError::Config("bad test file name".to_string()))?;

        tokio::time::sleep(Duration::from_millis((self.count - u64::from(n)) * 10)).await;

        Ok(DecodedImage {
            width_px: 100 + n,
            height_px: 100,
            color_space: ColorSpace::Rgb,
            jpeg: vec![0xFF, 0xD8, 0xFF, 0xD9],
        })
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_page_order_ignores_completion_order() {
    let count = 6;
    let files: Vec<_> = (0..count)
        .map(|n| FileHandle::from_path(format!("{n}.jpg")).unwrap())
        .collect();

    let composer = Composer::with_loader(ComposeOptions::default(), ReversedLoader { count });
    let doc = composer.compose(&files).await.unwrap();

    let widths: Vec<_> = page_images(&doc).into_iter().map(|(w, _)| w).collect();
    assert_eq!(widths, vec![100, 101, 102, 103, 104, 105]);
}

/// Returns a zero-height image for one file
struct DegenerateLoader;

impl ImageLoader for DegenerateLoader {
    async fn load(&self, file: FileHandle) -> Result<DecodedImage> {
        let height_px = if file.display_name() == "flat.png" { 0 } else { 10 };
        Ok(DecodedImage {
            width_px: 10,
            height_px,
            color_space: ColorSpace::Rgb,
            jpeg: vec![0xFF, 0xD8, 0xFF, 0xD9],
        })
    }
}

#[tokio::test]
async fn test_zero_dimension_image_is_a_processing_error() {
    let files = vec![
        FileHandle::from_path("fine.png").unwrap(),
        FileHandle::from_path("flat.png").unwrap(),
    ];

    let composer = Composer::with_loader(ComposeOptions::default(), DegenerateLoader);
    match composer.compose(&files).await {
        Err(ComposeError::Processing { failures, .. }) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].index, 1);
            assert!(failures[0].reason.contains("Invalid dimensions"));
        }
        other => panic!("Expected Processing error, got {:?}", other.map(|_| ())),
    }
}
