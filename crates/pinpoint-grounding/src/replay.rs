use std::{collections::VecDeque, path::Path, sync::Mutex};

use pinpoint_image::Image;

use crate::{
    error::GroundingError,
    model::{GroundingModel, PredictThresholds, RawDetection},
};

/// Errors reported by [`ReplayModel`].
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// Every recorded pass has already been served.
    #[error("No recorded detections left to replay")]
    Exhausted,

    /// A previous call panicked while holding the recording.
    #[error("Recorded detections are poisoned")]
    Poisoned,
}

/// A [`GroundingModel`] serving previously recorded detections.
///
/// Each call to `predict` consumes the next recorded pass, regardless of the image
/// or caption, and keeps the detections whose confidence is above the box
/// threshold. Useful to replay model output captured offline.
///
/// The recording format is a JSON array with one array of [`RawDetection`] per pass:
///
/// ```json
/// [
///   [{ "center": [0.5, 0.5], "size": [0.4, 0.4], "confidence": 0.35, "phrase": "microwave" }],
///   [{ "center": [0.3, 0.6], "size": [0.1, 0.1], "confidence": 0.62, "phrase": "button" }]
/// ]
/// ```
#[derive(Debug)]
pub struct ReplayModel {
    passes: Mutex<VecDeque<Vec<RawDetection>>>,
}

impl ReplayModel {
    /// Creates a model replaying `passes` in order.
    pub fn new(passes: Vec<Vec<RawDetection>>) -> Self {
        Self {
            passes: Mutex::new(passes.into()),
        }
    }

    /// Loads a recording from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GroundingError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GroundingError::NotFound(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        let passes: Vec<Vec<RawDetection>> =
            serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(Self::new(passes))
    }

    /// Number of passes not yet served.
    pub fn remaining(&self) -> usize {
        self.passes.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl GroundingModel for ReplayModel {
    type Error = ReplayError;

    fn predict(
        &self,
        _image: &Image<u8, 3>,
        caption: &str,
        thresholds: PredictThresholds,
    ) -> Result<Vec<RawDetection>, Self::Error> {
        let pass = self
            .passes
            .lock()
            .map_err(|_| ReplayError::Poisoned)?
            .pop_front()
            .ok_or(ReplayError::Exhausted)?;

        log::debug!("replaying {} recorded detections for '{caption}'", pass.len());

        Ok(pass
            .into_iter()
            .filter(|d| d.confidence > thresholds.box_threshold)
            .collect())
    }
}
