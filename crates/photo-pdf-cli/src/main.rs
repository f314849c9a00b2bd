use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use photo_pdf::{ComposeError, ComposeOptions, FileHandle, PageSize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photopdf", about = "Compose photos into an A4 PDF", version)]
struct Cli {
    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose images into a PDF, one per page, in the order given
    Compose {
        /// Input images
        images: Vec<PathBuf>,

        /// Output PDF file [default: photos.pdf]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JPEG quality (1-100) for images that need re-encoding
        #[arg(long)]
        quality: Option<u8>,

        /// JSON settings file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show where each image would be placed without writing anything
    Layout {
        /// Input images
        #[arg(required = true, num_args = 1..)]
        images: Vec<PathBuf>,
    },

    /// Write the default settings as JSON
    InitConfig {
        /// Settings file to create
        path: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Flags take precedence over the settings file
fn apply_overrides(
    mut options: ComposeOptions,
    output: Option<PathBuf>,
    quality: Option<u8>,
) -> ComposeOptions {
    if let Some(output) = output {
        options.output_path = output;
    }
    if let Some(quality) = quality {
        options.jpeg_quality = quality;
    }
    options
}

fn file_handles(images: &[PathBuf]) -> Result<Vec<FileHandle>> {
    images
        .iter()
        .map(|path| {
            FileHandle::from_path(path).with_context(|| format!("Cannot use {}", path.display()))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Compose {
            images,
            output,
            quality,
            config,
        } => {
            let base = match config {
                Some(path) => ComposeOptions::load(&path)
                    .await
                    .with_context(|| format!("Failed to read settings {}", path.display()))?,
                None => ComposeOptions::default(),
            };
            let options = apply_overrides(base, output, quality);
            let files = file_handles(&images)?;

            match photo_pdf::compose_to_file(&files, &options).await {
                Ok(summary) => {
                    println!(
                        "Composed {} pages → {}",
                        summary.page_count,
                        summary.path.display()
                    );
                }
                Err(ComposeError::NoImages) => bail!("Please select at least one photo"),
                Err(ComposeError::Processing { failures, total }) => {
                    for failure in &failures {
                        eprintln!("  {failure}");
                    }
                    bail!(
                        "Failed to generate PDF: {} of {} images could not be processed",
                        failures.len(),
                        total
                    );
                }
                Err(e) => return Err(e).context("Failed to generate PDF"),
            }
        }
        Commands::Layout { images } => {
            let files = file_handles(&images)?;
            let page = PageSize::a4();
            let mut failed = 0;

            println!("Page layout ({} × {} mm):", page.width_mm, page.height_mm);
            for (index, file) in files.iter().enumerate() {
                let placed = photo_pdf::probe_dimensions(file.path())
                    .await
                    .and_then(|(w, h)| {
                        let layout = photo_pdf::fit_to_page(page, f64::from(w), f64::from(h))?;
                        Ok((w, h, layout))
                    });

                match placed {
                    Ok((w, h, layout)) => println!(
                        "  {:>3}. {} ({}×{} px) → {:.2} × {:.2} mm at ({:.2}, {:.2})",
                        index + 1,
                        file.display_name(),
                        w,
                        h,
                        layout.width,
                        layout.height,
                        layout.x,
                        layout.y
                    ),
                    Err(e) => {
                        failed += 1;
                        println!("  {:>3}. {}: {}", index + 1, file.display_name(), e);
                    }
                }
            }

            if failed > 0 {
                bail!("{} of {} images could not be read", failed, files.len());
            }
        }
        Commands::InitConfig { path } => {
            ComposeOptions::default()
                .save(&path)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote default settings → {}", path.display());
        }
    }

    Ok(())
}
