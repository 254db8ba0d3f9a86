use std::path::PathBuf;

/// Errors that can occur while locating an object.
#[derive(Debug, thiserror::Error)]
pub enum GroundingError {
    /// The referenced image file does not exist.
    #[error("Image file does not exist: {0}")]
    NotFound(PathBuf),

    /// A collection that must be non-empty was empty.
    #[error("Invariant violated: {0}")]
    InvariantViolation(&'static str),

    /// A pipeline stage failed. Carries the original error as its source.
    #[error("{context}: {source}")]
    DetectionFailure {
        /// The stage that failed.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The crop window is empty once clamped to the image.
    #[error("Region ({0}, {1}, {2}, {3}) does not overlap the image")]
    InvalidRegion(f64, f64, f64, f64),

    /// The external model reported an error.
    #[error("Model inference failed. {0}")]
    Model(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Error related to image I/O.
    #[error(transparent)]
    Io(#[from] pinpoint_io::IoError),

    /// Error related to image buffers.
    #[error(transparent)]
    Image(#[from] pinpoint_image::ImageError),

    /// Error reading a file.
    #[error("Failed to read the file. {0}")]
    File(#[from] std::io::Error),

    /// Error parsing a JSON document.
    #[error("Failed to parse JSON. {0}")]
    Json(#[from] serde_json::Error),
}

impl GroundingError {
    /// Wraps `source` as a [`GroundingError::DetectionFailure`] for the given stage.
    pub fn detection_failure(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        GroundingError::DetectionFailure {
            context: context.into(),
            source: source.into(),
        }
    }
}
