use thiserror::Error;

/// Failure to build an [`Image`](crate::Image) from a file.
///
/// The message is the decoder's own message, unchanged.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Decode(#[from] ::image::ImageError),
    #[error("image too large: {width}x{height}")]
    TooLarge { width: u32, height: u32 },
}
