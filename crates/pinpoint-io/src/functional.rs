use std::path::Path;

use pinpoint_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads an image from the given file path as rgb8.
///
/// The method tries to read from any image format supported by the image crate.
/// Grayscale and alpha images are converted to three channels.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An rgb8 image containing the image data.
///
/// # Errors
///
/// [`IoError::FileDoesNotExist`] is returned before any decoding if the path does
/// not exist.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Writes an rgb8 image to the given file path.
///
/// The encoder is chosen from the file extension (`png`, `jpg` or `jpeg`).
///
/// # Arguments
///
/// * `file_path` - The destination path.
/// * `image` - The image to encode.
pub fn write_image_any_rgb8(file_path: impl AsRef<Path>, image: &Image<u8, 3>) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    let format = file_path
        .extension()
        .and_then(|ext| image::ImageFormat::from_extension(ext))
        .filter(|format| matches!(format, image::ImageFormat::Png | image::ImageFormat::Jpeg))
        .ok_or_else(|| IoError::InvalidFileExtension(file_path.to_path_buf()))?;

    image::save_buffer_with_format(
        file_path,
        image.as_slice(),
        image.width() as u32,
        image.height() as u32,
        image::ExtendedColorType::Rgb8,
        format,
    )?;

    Ok(())
}
