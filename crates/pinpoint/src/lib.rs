//! # Pinpoint
//!
//! Locate a single object in a photograph from a free-text description.
//!
//! ```no_run
//! use pinpoint::grounding::{RefineConfig, RefinePipeline, ReplayModel};
//!
//! let model = ReplayModel::from_json_file("recording.json")?;
//! let pipeline = RefinePipeline::new(model, RefineConfig::default());
//!
//! if let Some(found) = pipeline.locate("kitchen.jpg", "microwave button")? {
//!     let center = found.center_in_source();
//!     println!("button at ({:.0}, {:.0})", center.x, center.y);
//! }
//! # Ok::<(), pinpoint::grounding::GroundingError>(())
//! ```

#[doc(inline)]
pub use pinpoint_image as image;

#[doc(inline)]
pub use pinpoint_imgproc as imgproc;

#[doc(inline)]
pub use pinpoint_io as io;

#[doc(inline)]
pub use pinpoint_grounding as grounding;
