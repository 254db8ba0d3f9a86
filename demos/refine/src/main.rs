use argh::FromArgs;
use serde::Serialize;
use std::path::PathBuf;

use pinpoint::grounding::{PlotVisualizer, RefineConfig, RefinePipeline, ReplayModel};

#[derive(FromArgs)]
/// Locate an object in an image with the two-pass refinement pipeline
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// description of the object to locate
    #[argh(option, short = 'p')]
    text_prompt: String,

    /// recorded model output to replay, one list of detections per pass
    #[argh(option, short = 'd')]
    detections: PathBuf,

    /// optional JSON configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// confidence cutoff of the first pass
    #[argh(option)]
    first_threshold: Option<f64>,

    /// confidence cutoff of the second pass
    #[argh(option)]
    second_threshold: Option<f64>,

    /// directory for cropped images and plots
    #[argh(option, short = 'o')]
    output_dir: Option<PathBuf>,

    /// write annotated plots of every detection
    #[argh(switch)]
    plot: bool,
}

#[derive(Serialize)]
struct Response {
    center: Option<[f64; 2]>,
    cropped_image: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut config = match &args.config {
        Some(path) => RefineConfig::from_json_file(path)?,
        None => RefineConfig::default(),
    };
    if let Some(t) = args.first_threshold {
        config.first_threshold = t;
    }
    if let Some(t) = args.second_threshold {
        config.second_threshold = t;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    std::fs::create_dir_all(&config.output_dir)?;

    let model = ReplayModel::from_json_file(&args.detections)?;
    let pipeline = RefinePipeline::new(model, config.clone());

    let refinement = if args.plot {
        pipeline
            .with_visualizer(PlotVisualizer::new(&config.output_dir))
            .locate(&args.image_path, &args.text_prompt)?
    } else {
        pipeline.locate(&args.image_path, &args.text_prompt)?
    };

    let response = match refinement {
        Some(found) => {
            let center = found.center_in_source();
            log::info!("located '{}' at ({:.1}, {:.1})", args.text_prompt, center.x, center.y);
            Response {
                center: Some([center.x, center.y]),
                cropped_image: Some(found.cropped_image_path),
            }
        }
        None => Response {
            center: None,
            cropped_image: None,
        },
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
