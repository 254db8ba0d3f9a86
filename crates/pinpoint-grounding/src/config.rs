use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GroundingError;

/// Configuration for the refinement pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Confidence cutoff of the coarse pass on the full image.
    pub first_threshold: f64,
    /// Confidence cutoff of the refined pass on the crop.
    pub second_threshold: f64,
    /// Directory receiving cropped images.
    pub output_dir: PathBuf,
    /// Whether to render the raw output of every detector call.
    pub draw_raw: bool,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            first_threshold: 0.2,
            second_threshold: 0.2,
            output_dir: PathBuf::from("."),
            draw_raw: true,
        }
    }
}

impl RefineConfig {
    /// Loads a configuration from a JSON file. Missing fields take their default.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GroundingError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GroundingError::NotFound(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}
