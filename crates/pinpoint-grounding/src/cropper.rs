use std::path::{Path, PathBuf};

use pinpoint_image::{Image, ImageSize};
use pinpoint_imgproc::crop::crop_image;
use pinpoint_io::functional::{read_image_any_rgb8, write_image_any_rgb8};

use crate::{
    artifacts::artifact_path,
    boxes::{Point2, Region},
    error::GroundingError,
};

/// Integer pixel window actually cut out of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    /// Left column.
    pub x: usize,
    /// Top row.
    pub y: usize,
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl CropWindow {
    /// Rounds `region` to whole pixels and clamps it to an image of `size`.
    ///
    /// # Errors
    ///
    /// [`GroundingError::InvalidRegion`] if nothing of the region is left.
    pub fn from_region(region: &Region, size: ImageSize) -> Result<Self, GroundingError> {
        let clamp = |v: f64, max: usize| v.round().clamp(0.0, max as f64) as usize;

        let x0 = clamp(region.x_min, size.width);
        let y0 = clamp(region.y_min, size.height);
        let x1 = clamp(region.x_max, size.width);
        let y1 = clamp(region.y_max, size.height);

        if x1 <= x0 || y1 <= y0 {
            return Err(GroundingError::InvalidRegion(
                region.x_min,
                region.y_min,
                region.x_max,
                region.y_max,
            ));
        }

        Ok(Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    /// The top-left corner in source image coordinates.
    pub fn top_left(&self) -> Point2 {
        Point2::new(self.x as f64, self.y as f64)
    }

    /// The size of the cropped image.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// An image file written by [`crop`].
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedImage {
    /// Where the crop was written.
    pub path: PathBuf,
    /// The window of the source image it covers.
    pub window: CropWindow,
}

/// Cuts `region` out of `image`.
pub fn crop_image_to_region(
    image: &Image<u8, 3>,
    region: &Region,
) -> Result<(Image<u8, 3>, CropWindow), GroundingError> {
    let window = CropWindow::from_region(region, image.size())?;
    let mut cropped = Image::from_size_val(window.size(), 0u8)?;
    crop_image(image, &mut cropped, window.x, window.y)?;
    Ok((cropped, window))
}

/// Crops the image at `image_path` to `region` and writes the result as a new
/// jpeg file in `output_dir`.
///
/// The source image is left untouched. Region coordinates are rounded to whole
/// pixels and clamped to the image bounds.
///
/// # Errors
///
/// [`GroundingError::NotFound`] if `image_path` does not exist.
pub fn crop(
    region: &Region,
    image_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
) -> Result<CroppedImage, GroundingError> {
    let image_path = image_path.as_ref();
    if !image_path.exists() {
        return Err(GroundingError::NotFound(image_path.to_path_buf()));
    }

    let image = read_image_any_rgb8(image_path)?;
    let (cropped, window) = crop_image_to_region(&image, region)?;

    let path = artifact_path(output_dir.as_ref(), "cropped_image", "jpg");
    write_image_any_rgb8(&path, &cropped)?;

    log::debug!("cropped {:?} of {} into {}", window, image_path.display(), path.display());

    Ok(CroppedImage { path, window })
}
