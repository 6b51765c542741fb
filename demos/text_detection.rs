//! Text Detection Example
//!
//! This example treats a grayscale image as a text likelihood map, runs the
//! detector and region refiner on it and prints the resulting detections as
//! JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example text_detection -- [OPTIONS] <MAP>
//! ```
//!
//! # Arguments
//!
//! * `-c, --config` - Path to a JSON or TOML parameter file
//! * `--box-thresh` - Override the box score threshold
//! * `--letterbox` - Undo a square letterbox when refining boxes
//! * `--frame-width`, `--frame-height` - Size of the source frame in pixels
//! * `<MAP>` - Grayscale image holding the 8-bit likelihood map

use clap::Parser;
use ocr_postprocess::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

/// Command-line arguments for the text detection example
#[derive(Parser)]
#[command(name = "text_detection")]
#[command(about = "Text Detection Example - detects text regions in a likelihood map")]
struct Args {
    /// Grayscale image holding the likelihood map
    map: PathBuf,

    /// Path to a JSON or TOML parameter file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Box score threshold (overrides the config value)
    #[arg(long)]
    box_thresh: Option<f32>,

    /// Undo a square letterbox when refining boxes
    #[arg(long)]
    letterbox: bool,

    /// Source frame width in pixels (default: map width)
    #[arg(long)]
    frame_width: Option<u32>,

    /// Source frame height in pixels (default: map height)
    #[arg(long)]
    frame_height: Option<u32>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    ocr_postprocess::utils::init_tracing();
    let args = Args::parse();

    info!("Text Detection Example");

    if !args.map.exists() {
        error!("Map image not found: {}", args.map.display());
        return Err("Map image not found".into());
    }

    let ctx = OcrContext::init(args.config.as_deref())?;
    let mut params = (*ctx.params).clone();
    if let Some(box_thresh) = args.box_thresh {
        params.det_box_thresh = box_thresh;
    }

    let gray = image::open(&args.map)?.to_luma8();
    let (width, height) = gray.dimensions();
    info!("Loaded map: {} ({}x{})", args.map.display(), width, height);

    let tensor = Tensor::new(
        params.det_output_name.clone(),
        vec![height as usize, width as usize],
        gray.into_raw(),
    );
    let mut roi = Roi::with_tensors(vec![tensor]);

    let start = Instant::now();
    let detector = TextRegionDetector::new(&params);
    let detected = detector.apply(&mut roi);

    let refiner = RegionRefiner::new(RefineConfig {
        use_letterbox: args.letterbox,
        ..Default::default()
    });
    let refined = refiner.apply(
        &mut roi,
        args.frame_width.unwrap_or(width),
        args.frame_height.unwrap_or(height),
    );
    info!(
        "Detected {} text regions ({} refined) in {:?}",
        detected,
        refined,
        start.elapsed()
    );

    println!("{}", serde_json::to_string_pretty(&roi.detections)?);
    Ok(())
}
