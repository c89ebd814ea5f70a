use pano_stitch::image::io::load_rgb_image;
use pano_stitch::overlap::{FeatureOverlapEstimator, OverlapEstimator};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let left = args.next().ok_or_else(usage)?;
    let right = args.next().ok_or_else(usage)?;

    let image1 = load_rgb_image(Path::new(&left))?;
    let image2 = load_rgb_image(Path::new(&right))?;
    let report = FeatureOverlapEstimator::default().estimate(&image1, &image2);

    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
    println!("{json}");
    Ok(())
}

fn usage() -> String {
    "Usage: overlap_probe <left-image> <right-image>".to_string()
}
