use pano_stitch::config::stitch::{self, EstimatorKind, StitchMode, StitchToolConfig};
use pano_stitch::diagnostics::StitchReport;
use pano_stitch::image::io::{load_rgb_image, save_rgb_image, write_json_file};
use pano_stitch::image::ImageRgb;
use pano_stitch::overlap::{FeatureOverlapEstimator, OverlapEstimator, PixelCorrelationEstimator};
use pano_stitch::stitcher::concatenate_horizontal;
use pano_stitch::PanoramaAssembler;
use std::env;
use std::path::Path;
use std::time::Instant;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = stitch::load_config(Path::new(&config_path))?;

    let images = config
        .inputs
        .iter()
        .map(|p| load_rgb_image(p))
        .collect::<Result<Vec<_>, _>>()?;

    let t0 = Instant::now();
    let (panorama, report) = match config.mode {
        StitchMode::Concatenate => {
            let panorama = concatenate_horizontal(&images).map_err(|e| e.to_string())?;
            (panorama, None)
        }
        StitchMode::Blend => match config.estimator {
            EstimatorKind::Feature => assemble(
                FeatureOverlapEstimator::new(config.feature.clone()),
                &config,
                &images,
            )?,
            EstimatorKind::Pixel => assemble(
                PixelCorrelationEstimator::new(config.pixel.clone()),
                &config,
                &images,
            )?,
        },
    };
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

    save_rgb_image(&panorama, &config.output.panorama)?;
    println!(
        "Panorama {}x{} from {} images in {:.1} ms written to {}",
        panorama.w,
        panorama.h,
        images.len(),
        elapsed_ms,
        config.output.panorama.display()
    );

    if let Some(report) = &report {
        for step in &report.steps {
            println!(
                "  step {}: overlap={} strategy={:?}{}",
                step.index,
                step.overlap,
                step.estimate.strategy,
                step.estimate
                    .fallback
                    .map(|r| format!(" fallback={r:?}"))
                    .unwrap_or_default()
            );
        }
    }
    if let (Some(path), Some(report)) = (&config.output.report_json, &report) {
        write_json_file(path, report)?;
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}

fn assemble<E: OverlapEstimator>(
    estimator: E,
    config: &StitchToolConfig,
    images: &[ImageRgb],
) -> Result<(ImageRgb, Option<StitchReport>), String> {
    let assembler = PanoramaAssembler::new(estimator).with_blend(config.blend.clone());
    let (panorama, report) = assembler
        .stitch_with_report(images)
        .map_err(|e| e.to_string())?;
    Ok((panorama.into_owned(), Some(report)))
}

fn usage() -> String {
    "Usage: pano_stitch <config.json>".to_string()
}
