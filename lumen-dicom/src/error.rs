//! Error types for loading DICOM images.

use core::fmt;

/// The error type for loading DICOM images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// The compressed pixel data could not be decoded.
    Codec(lumen_ljpeg::DecodeError),
    /// No pixel data could be recovered, and the settings ask for an error
    /// instead of a placeholder.
    MissingPixelData,
    /// The declared image dimensions exceed the configured limit.
    ImageTooLarge {
        /// The number of columns.
        width: u32,
        /// The number of rows.
        height: u32,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "failed to decode pixel data: {e}"),
            Self::MissingPixelData => write!(f, "no pixel data found"),
            Self::ImageTooLarge { width, height } => {
                write!(f, "image dimensions {width}x{height} are too large")
            }
        }
    }
}

impl core::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<lumen_ljpeg::DecodeError> for LoadError {
    fn from(e: lumen_ljpeg::DecodeError) -> Self {
        Self::Codec(e)
    }
}

/// Result type for loading DICOM images.
pub type Result<T> = core::result::Result<T, LoadError>;

macro_rules! bail {
    ($err:expr) => {
        return Err($err.into())
    };
}

pub(crate) use bail;
