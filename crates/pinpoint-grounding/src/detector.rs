use std::path::Path;

use pinpoint_image::Image;
use pinpoint_io::functional::read_image_any_rgb8;

use crate::{
    boxes::DetectionBox,
    error::GroundingError,
    model::{GroundingModel, PredictThresholds},
};

/// The boxes found by one model call, together with the image they were found on.
#[derive(Debug, Clone)]
pub struct Detections {
    /// The decoded source image.
    pub image: Image<u8, 3>,
    /// The boxes in detector order.
    pub boxes: Vec<DetectionBox>,
}

impl Detections {
    /// Whether the model found nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Number of boxes found.
    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }
}

/// Runs the model once on the image at `image_path`.
///
/// `threshold` is used both as the box and as the phrase confidence cutoff.
///
/// # Arguments
///
/// * `model` - The open-vocabulary detector.
/// * `image_path` - Path to the image to detect on.
/// * `prompt` - Free-text description of the object.
/// * `threshold` - Confidence cutoff.
///
/// # Returns
///
/// The decoded image and the detected boxes, scaled to its pixel dimensions. No
/// detection clearing the threshold yields an empty set.
///
/// # Errors
///
/// [`GroundingError::NotFound`] if the file does not exist; the model is not invoked
/// in that case.
pub fn detect<M: GroundingModel>(
    model: &M,
    image_path: impl AsRef<Path>,
    prompt: &str,
    threshold: f64,
) -> Result<Detections, GroundingError> {
    let image_path = image_path.as_ref();
    if !image_path.exists() {
        return Err(GroundingError::NotFound(image_path.to_path_buf()));
    }

    let image = read_image_any_rgb8(image_path)?;

    log::debug!(
        "running model inference on {} ({}) with threshold {threshold}",
        image_path.display(),
        image.size()
    );

    let raw = model
        .predict(&image, prompt, PredictThresholds::uniform(threshold))
        .map_err(|e| GroundingError::Model(Box::new(e)))?;

    let size = image.size();
    let boxes = raw
        .into_iter()
        .map(|r| DetectionBox::from_raw(r, size))
        .collect::<Vec<_>>();

    if boxes.is_empty() {
        log::info!("no objects detected in {}", image_path.display());
    }

    Ok(Detections { image, boxes })
}
