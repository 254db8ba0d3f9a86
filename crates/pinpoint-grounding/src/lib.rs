#![deny(missing_docs)]
//! # Pinpoint Grounding
//!
//! Locates a single target object in a photograph from a free-text description.
//!
//! An open-vocabulary detector (anything implementing [`GroundingModel`]) is run
//! twice: once on the full image to find the area of interest, and once more on a
//! crop of that area. The most specific, most confident box of the second pass is
//! returned together with the offset needed to map it back to the full image.

/// Box and region geometry.
pub mod boxes;

/// Pipeline configuration.
pub mod config;

/// Cropping of images to regions.
pub mod cropper;

/// Detector adapter turning raw model output into boxes.
pub mod detector;

/// Error types for the grounding pipeline.
pub mod error;

/// Containment filtering of redundant boxes.
pub mod filter;

/// Interface to the external open-vocabulary model.
pub mod model;

/// The two-pass refinement pipeline.
pub mod pipeline;

/// Enclosing region computation.
pub mod region;

/// Model replaying recorded detections.
pub mod replay;

/// Best box selection.
pub mod select;

/// Rendering of detections to image files.
pub mod viz;

/// Unique names for the files the pipeline writes.
mod artifacts;

pub use crate::boxes::{BoxGeometry, DetectionBox, Point2, Region};
pub use crate::config::RefineConfig;
pub use crate::detector::{detect, Detections};
pub use crate::error::GroundingError;
pub use crate::filter::filter_redundant;
pub use crate::model::{GroundingModel, PredictThresholds, RawDetection};
pub use crate::pipeline::{RefinePipeline, Refinement, Stage};
pub use crate::region::enclosing_region;
pub use crate::replay::ReplayModel;
pub use crate::select::{select, select_best, Selection};
pub use crate::viz::{NoopVisualizer, PlotVisualizer, Visualizer};
