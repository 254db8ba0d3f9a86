/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image has a zero dimension.
    #[error("Image dimensions must be non-zero, got {0}x{1}")]
    EmptyImage(usize, usize),

    /// Error when an image does not fit inside another one.
    #[error("Image size ({0}, {1}) does not fit inside ({2}, {3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a pixel is accessed outside the image.
    #[error("Pixel ({0}, {1}) is out of bounds")]
    PixelIndexOutOfBounds(usize, usize),
}
