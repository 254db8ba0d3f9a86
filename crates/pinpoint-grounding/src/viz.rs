use std::path::{Path, PathBuf};

use pinpoint_image::Image;
use pinpoint_imgproc::draw::{draw_filled_circle, draw_rect};
use pinpoint_io::functional::write_image_any_rgb8;

use crate::{
    artifacts::artifact_path,
    boxes::DetectionBox,
    detector::Detections,
    error::GroundingError,
};

const BOX_COLOR: [u8; 3] = [255, 128, 0];
const CENTER_COLOR: [u8; 3] = [0, 0, 255];
const BEST_COLOR: [u8; 3] = [0, 255, 0];
const CENTER_RADIUS: i64 = 10;

/// Renders detections for inspection.
///
/// Visualization is observational: the pipeline logs and ignores any error returned
/// here.
pub trait Visualizer {
    /// Renders every box returned by one detector call.
    ///
    /// Returns the path of the written file, if any.
    fn draw_raw(&self, detections: &Detections) -> Result<Option<PathBuf>, GroundingError>;

    /// Renders the boxes kept by the containment filter and the selected box on the
    /// image they were detected on.
    fn draw_selection(
        &self,
        image: &Image<u8, 3>,
        kept: &[DetectionBox],
        best: &DetectionBox,
    ) -> Result<Option<PathBuf>, GroundingError>;
}

/// Visualizer that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopVisualizer;

impl Visualizer for NoopVisualizer {
    fn draw_raw(&self, _detections: &Detections) -> Result<Option<PathBuf>, GroundingError> {
        Ok(None)
    }

    fn draw_selection(
        &self,
        _image: &Image<u8, 3>,
        _kept: &[DetectionBox],
        _best: &DetectionBox,
    ) -> Result<Option<PathBuf>, GroundingError> {
        Ok(None)
    }
}

/// Visualizer writing annotated png plots to a directory.
///
/// Boxes are outlined in orange, box centers are blue dots and the selected box
/// center is a green dot.
#[derive(Debug, Clone)]
pub struct PlotVisualizer {
    output_dir: PathBuf,
}

impl PlotVisualizer {
    /// Creates a visualizer writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// The directory plots are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn annotate(image: &Image<u8, 3>, boxes: &[DetectionBox]) -> Image<u8, 3> {
        let mut canvas = image.clone();
        for b in boxes {
            let g = &b.scaled;
            draw_rect(
                &mut canvas,
                (g.x_min() as i64, g.y_min() as i64),
                (g.x_max() as i64, g.y_max() as i64),
                BOX_COLOR,
                2,
            );
            draw_filled_circle(&mut canvas, center_px(b), CENTER_RADIUS, CENTER_COLOR);
        }
        canvas
    }

    fn save(&self, canvas: &Image<u8, 3>) -> Result<Option<PathBuf>, GroundingError> {
        let path = artifact_path(&self.output_dir, "detection_result", "png");
        write_image_any_rgb8(&path, canvas)?;
        log::debug!("saved detection plot to {}", path.display());
        Ok(Some(path))
    }
}

fn center_px(b: &DetectionBox) -> (i64, i64) {
    (b.scaled.center.x as i64, b.scaled.center.y as i64)
}

impl Visualizer for PlotVisualizer {
    fn draw_raw(&self, detections: &Detections) -> Result<Option<PathBuf>, GroundingError> {
        let canvas = Self::annotate(&detections.image, &detections.boxes);
        self.save(&canvas)
    }

    fn draw_selection(
        &self,
        image: &Image<u8, 3>,
        kept: &[DetectionBox],
        best: &DetectionBox,
    ) -> Result<Option<PathBuf>, GroundingError> {
        let mut canvas = Self::annotate(image, kept);
        draw_filled_circle(&mut canvas, center_px(best), CENTER_RADIUS, BEST_COLOR);
        self.save(&canvas)
    }
}
