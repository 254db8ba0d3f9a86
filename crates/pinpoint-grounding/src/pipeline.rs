use std::path::{Path, PathBuf};

use crate::{
    boxes::{DetectionBox, Point2, Region},
    config::RefineConfig,
    cropper::crop,
    detector::{detect, Detections},
    error::GroundingError,
    model::GroundingModel,
    region::enclosing_region,
    select::{select, Selection},
    viz::{NoopVisualizer, Visualizer},
};

/// Prompt and threshold used by [`RefinePipeline::warm_up`].
const WARM_UP_PROMPT: &str = "test";
const WARM_UP_THRESHOLD: f64 = 0.1;

/// The steps of a refinement run, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Detection on the full image.
    FirstPass,
    /// Cropping the full image to the region of the first pass boxes.
    Crop,
    /// Detection on the cropped image.
    SecondPass,
    /// Containment filtering and best box selection.
    Selection,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::FirstPass => "first detection pass",
            Stage::Crop => "cropping to the detected region",
            Stage::SecondPass => "second detection pass",
            Stage::Selection => "best box selection",
        };
        f.write_str(name)
    }
}

/// The located object.
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    /// Center of the selected box in cropped image pixels.
    pub center: Point2,
    /// Top-left corner of the crop in source image pixels.
    pub region_top_left: Point2,
    /// The cropped image the second pass ran on.
    pub cropped_image_path: PathBuf,
    /// Enclosing region of the first pass boxes, before rounding and clamping.
    pub region: Region,
    /// The selected box, in cropped image coordinates.
    pub best: DetectionBox,
}

impl Refinement {
    /// The selected center in source image pixels.
    pub fn center_in_source(&self) -> Point2 {
        self.center + self.region_top_left
    }
}

/// Two-pass, coarse-then-refine object localisation.
///
/// The pipeline holds no per-request state, so a single instance can serve
/// concurrent requests whenever the model and visualizer are `Sync`.
pub struct RefinePipeline<M, V = NoopVisualizer> {
    model: M,
    visualizer: V,
    config: RefineConfig,
}

impl<M: GroundingModel> RefinePipeline<M> {
    /// Creates a pipeline that does not render anything.
    pub fn new(model: M, config: RefineConfig) -> Self {
        Self {
            model,
            visualizer: NoopVisualizer,
            config,
        }
    }
}

impl<M: GroundingModel, V: Visualizer> RefinePipeline<M, V> {
    /// Replaces the visualizer.
    pub fn with_visualizer<W: Visualizer>(self, visualizer: W) -> RefinePipeline<M, W> {
        RefinePipeline {
            model: self.model,
            visualizer,
            config: self.config,
        }
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &RefineConfig {
        &self.config
    }

    /// The wrapped model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Locates `prompt` in the image using the configured thresholds.
    ///
    /// See [`RefinePipeline::refine`].
    pub fn locate(
        &self,
        image_path: impl AsRef<Path>,
        prompt: &str,
    ) -> Result<Option<Refinement>, GroundingError> {
        self.refine(
            image_path,
            prompt,
            self.config.first_threshold,
            self.config.second_threshold,
        )
    }

    /// Locates `prompt` in the image at `image_path`.
    ///
    /// 1. Detect on the full image with `first_threshold`.
    /// 2. Crop to the region enclosing every first pass box.
    /// 3. Detect on the crop with `second_threshold`.
    /// 4. Select the most specific, most confident box.
    ///
    /// # Returns
    ///
    /// `None` when either pass finds nothing; no crop is written if the first pass
    /// is empty. Otherwise the selected center relative to the cropped image, the
    /// crop's top-left corner in the source image and the cropped image path.
    ///
    /// # Errors
    ///
    /// Any failure is reported as [`GroundingError::DetectionFailure`] naming the
    /// failing [`Stage`]. Nothing is retried.
    pub fn refine(
        &self,
        image_path: impl AsRef<Path>,
        prompt: &str,
        first_threshold: f64,
        second_threshold: f64,
    ) -> Result<Option<Refinement>, GroundingError> {
        let image_path = image_path.as_ref();

        let first = self
            .detect_and_draw(image_path, prompt, first_threshold)
            .map_err(|e| GroundingError::detection_failure(Stage::FirstPass.to_string(), e))?;

        if first.is_empty() {
            log::warn!("no objects detected during the first detection pass");
            return Ok(None);
        }
        log::info!("first pass found {} boxes", first.len());

        let region = enclosing_region(&first.boxes)
            .map_err(|e| GroundingError::detection_failure(Stage::Crop.to_string(), e))?;

        let cropped = crop(&region, image_path, &self.config.output_dir)
            .map_err(|e| GroundingError::detection_failure(Stage::Crop.to_string(), e))?;

        let second = self
            .detect_and_draw(&cropped.path, prompt, second_threshold)
            .map_err(|e| GroundingError::detection_failure(Stage::SecondPass.to_string(), e))?;

        if second.is_empty() {
            log::warn!("no objects detected during the second detection pass");
            return Ok(None);
        }

        let Selection { best, .. } = self
            .select_and_draw(&second)
            .map_err(|e| GroundingError::detection_failure(Stage::Selection.to_string(), e))?;

        Ok(Some(Refinement {
            center: best.scaled.center,
            region_top_left: cropped.window.top_left(),
            cropped_image_path: cropped.path,
            region,
            best,
        }))
    }

    /// Runs a single detection pass and selects the best box, without cropping.
    ///
    /// Returns `None` when nothing clears `threshold`.
    pub fn detect_best(
        &self,
        image_path: impl AsRef<Path>,
        prompt: &str,
        threshold: f64,
    ) -> Result<Option<DetectionBox>, GroundingError> {
        let detections = self
            .detect_and_draw(image_path.as_ref(), prompt, threshold)
            .map_err(|e| GroundingError::detection_failure(Stage::FirstPass.to_string(), e))?;

        if detections.is_empty() {
            return Ok(None);
        }

        let selection = self
            .select_and_draw(&detections)
            .map_err(|e| GroundingError::detection_failure(Stage::Selection.to_string(), e))?;

        Ok(Some(selection.best))
    }

    /// Runs one throwaway detection so that the first real request does not pay the
    /// model start-up cost.
    pub fn warm_up(&self, image_path: impl AsRef<Path>) -> Result<(), GroundingError> {
        let detections = detect(&self.model, image_path, WARM_UP_PROMPT, WARM_UP_THRESHOLD)
            .map_err(|e| GroundingError::detection_failure("warm-up detection", e))?;
        log::info!("warm-up detection finished with {} boxes", detections.len());
        Ok(())
    }

    fn detect_and_draw(
        &self,
        image_path: &Path,
        prompt: &str,
        threshold: f64,
    ) -> Result<Detections, GroundingError> {
        let detections = detect(&self.model, image_path, prompt, threshold)?;

        if self.config.draw_raw {
            match self.visualizer.draw_raw(&detections) {
                Ok(Some(path)) => log::info!("raw detections drawn to {}", path.display()),
                Ok(None) => {}
                Err(e) => log::warn!("failed to draw raw detections: {e}"),
            }
        }

        Ok(detections)
    }

    fn select_and_draw(&self, detections: &Detections) -> Result<Selection, GroundingError> {
        let selection = select(&detections.boxes)?;
        let best = &selection.best;

        log::info!(
            "selected box: confidence {:.3}, center ({:.1}, {:.1}), size ({:.1}, {:.1}), phrase '{}'",
            best.confidence,
            best.scaled.center.x,
            best.scaled.center.y,
            best.scaled.width,
            best.scaled.height,
            best.phrase
        );

        match self
            .visualizer
            .draw_selection(&detections.image, &selection.kept, best)
        {
            Ok(Some(path)) => log::info!("selection drawn to {}", path.display()),
            Ok(None) => {}
            Err(e) => log::warn!("failed to draw the selection: {e}"),
        }

        Ok(selection)
    }
}
