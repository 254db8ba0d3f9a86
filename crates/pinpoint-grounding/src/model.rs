use pinpoint_image::Image;
use serde::{Deserialize, Serialize};

/// Confidence cutoffs passed to the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictThresholds {
    /// Minimum box confidence for a detection to be reported.
    pub box_threshold: f64,
    /// Minimum token confidence for a prompt word to be part of the matched phrase.
    pub text_threshold: f64,
}

impl PredictThresholds {
    /// Uses the same value for both cutoffs.
    pub const fn uniform(threshold: f64) -> Self {
        Self {
            box_threshold: threshold,
            text_threshold: threshold,
        }
    }
}

/// A detection as reported by the model, in normalized image coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    /// Box center `[cx, cy]` as fractions of the image width and height.
    pub center: [f64; 2],
    /// Box size `[w, h]` as fractions of the image width and height.
    pub size: [f64; 2],
    /// Box confidence.
    pub confidence: f64,
    /// The part of the caption matched by the box.
    pub phrase: String,
}

/// An open-vocabulary detector.
///
/// Given an rgb8 image and a caption, the model returns every box whose
/// confidence clears the thresholds. An empty result is not an error.
///
/// Implementations must not keep per-request state: the pipeline passes the image
/// explicitly wherever it is needed, so a model shared by reference can serve
/// several pipelines at once when its inference is re-entrant.
pub trait GroundingModel {
    /// Error reported by the model.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs the model on `image` with the text prompt `caption`.
    fn predict(
        &self,
        image: &Image<u8, 3>,
        caption: &str,
        thresholds: PredictThresholds,
    ) -> Result<Vec<RawDetection>, Self::Error>;
}

impl<M: GroundingModel + ?Sized> GroundingModel for &M {
    type Error = M::Error;

    fn predict(
        &self,
        image: &Image<u8, 3>,
        caption: &str,
        thresholds: PredictThresholds,
    ) -> Result<Vec<RawDetection>, Self::Error> {
        (**self).predict(image, caption, thresholds)
    }
}
