use photo_pdf::*;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_default_options() {
    let options = ComposeOptions::default();
    assert_eq!(options.output_path, PathBuf::from("photos.pdf"));
    assert_eq!(options.jpeg_quality, 92);
    assert!(options.validate().is_ok());
}

#[test]
fn test_validate_empty_output_path() {
    let options = ComposeOptions {
        output_path: PathBuf::new(),
        ..Default::default()
    };
    assert!(matches!(options.validate(), Err(ComposeError::Config(_))));
}

#[test]
fn test_validate_quality_bounds() {
    for quality in [0, 101, 255] {
        let options = ComposeOptions {
            jpeg_quality: quality,
            ..Default::default()
        };
        assert!(options.validate().is_err(), "quality {quality} accepted");
    }

    for quality in [1, 50, 100] {
        let options = ComposeOptions {
            jpeg_quality: quality,
            ..Default::default()
        };
        assert!(options.validate().is_ok(), "quality {quality} rejected");
    }
}

#[tokio::test]
async fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("photopdf.json");

    let options = ComposeOptions {
        output_path: PathBuf::from("holiday/album.pdf"),
        jpeg_quality: 75,
    };
    options.save(&config).await.unwrap();

    let loaded = ComposeOptions::load(&config).await.unwrap();
    assert_eq!(loaded, options);
}

#[tokio::test]
async fn test_load_partial_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("partial.json");
    std::fs::write(&config, r#"{ "jpeg_quality": 60 }"#).unwrap();

    let loaded = ComposeOptions::load(&config).await.unwrap();
    assert_eq!(loaded.jpeg_quality, 60);
    assert_eq!(loaded.output_path, PathBuf::from("photos.pdf"));
}

#[tokio::test]
async fn test_load_malformed_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("broken.json");
    std::fs::write(&config, "{ not json").unwrap();

    let result = ComposeOptions::load(&config).await;
    assert!(matches!(result, Err(ComposeError::Config(_))));
}

#[tokio::test]
async fn test_load_missing_config() {
    let result = ComposeOptions::load("/nonexistent/photopdf.json").await;
    assert!(matches!(result, Err(ComposeError::Io(_))));
}
