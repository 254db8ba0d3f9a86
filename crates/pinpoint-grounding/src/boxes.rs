use pinpoint_image::ImageSize;
use serde::{Deserialize, Serialize};

use crate::model::RawDetection;

/// A point in the image plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    /// Horizontal coordinate, growing to the right.
    pub x: f64,
    /// Vertical coordinate, growing downwards.
    pub y: f64,
}

impl Point2 {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point2 {
    type Output = Point2;

    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// An axis-aligned box given by its center and its size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxGeometry {
    /// Center of the box.
    pub center: Point2,
    /// Width of the box.
    pub width: f64,
    /// Height of the box.
    pub height: f64,
}

impl BoxGeometry {
    /// Creates a box from its center and size.
    pub const fn new(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            center: Point2::new(cx, cy),
            width,
            height,
        }
    }

    /// Smallest x coordinate covered by the box.
    #[inline]
    pub fn x_min(&self) -> f64 {
        self.center.x - self.width / 2.0
    }

    /// Largest x coordinate covered by the box.
    #[inline]
    pub fn x_max(&self) -> f64 {
        self.center.x + self.width / 2.0
    }

    /// Smallest y coordinate covered by the box.
    #[inline]
    pub fn y_min(&self) -> f64 {
        self.center.y - self.height / 2.0
    }

    /// Largest y coordinate covered by the box.
    #[inline]
    pub fn y_max(&self) -> f64 {
        self.center.y + self.height / 2.0
    }

    /// Whether `point` lies strictly inside the box on both axes.
    pub fn contains_point(&self, point: Point2) -> bool {
        self.x_min() < point.x
            && point.x < self.x_max()
            && self.y_min() < point.y
            && point.y < self.y_max()
    }

    /// Whether the center of `other` lies strictly inside this box.
    #[inline]
    pub fn contains_center_of(&self, other: &BoxGeometry) -> bool {
        self.contains_point(other.center)
    }

    /// Scales the box componentwise by the image dimensions.
    pub fn scale(&self, size: ImageSize) -> BoxGeometry {
        let (w, h) = (size.width as f64, size.height as f64);
        BoxGeometry::new(
            self.center.x * w,
            self.center.y * h,
            self.width * w,
            self.height * h,
        )
    }
}

/// One candidate detection of (part of) the text prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionBox {
    /// Geometry as fractions of the image dimensions.
    pub normalized: BoxGeometry,
    /// Geometry in pixels of the image the box was detected on.
    pub scaled: BoxGeometry,
    /// Score reported by the detector.
    pub confidence: f64,
    /// The sub-phrase of the prompt this box matched.
    pub phrase: String,
}

impl DetectionBox {
    /// Builds a box from raw model output for an image of the given size.
    ///
    /// Negative sizes are clamped to zero.
    pub fn from_raw(raw: RawDetection, size: ImageSize) -> Self {
        let normalized = BoxGeometry::new(
            raw.center[0],
            raw.center[1],
            raw.size[0].max(0.0),
            raw.size[1].max(0.0),
        );
        Self {
            scaled: normalized.scale(size),
            normalized,
            confidence: raw.confidence,
            phrase: raw.phrase,
        }
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Left edge.
    pub x_min: f64,
    /// Top edge.
    pub y_min: f64,
    /// Right edge.
    pub x_max: f64,
    /// Bottom edge.
    pub y_max: f64,
}

impl Region {
    /// Creates a region from its edges.
    pub const fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// The top-left corner.
    #[inline]
    pub fn top_left(&self) -> Point2 {
        Point2::new(self.x_min, self.y_min)
    }

    /// Width of the region.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height of the region.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Whether the full extent of `geometry` lies inside the region, up to `eps`.
    pub fn covers(&self, geometry: &BoxGeometry, eps: f64) -> bool {
        geometry.x_min() >= self.x_min - eps
            && geometry.x_max() <= self.x_max + eps
            && geometry.y_min() >= self.y_min - eps
            && geometry.y_max() <= self.y_max + eps
    }
}
