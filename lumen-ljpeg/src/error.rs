//! Error types for lossless JPEG decoding.

use core::fmt;

/// The main error type for lossless JPEG decoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The data does not start with a start-of-image marker.
    NotAJpeg,
    /// Errors related to marker segments and their layout.
    Format(FormatError),
    /// Errors related to Huffman tables and entropy-coded data.
    Huffman(HuffmanError),
    /// The stream uses a feature outside of the lossless process.
    Unsupported(UnsupportedError),
}

impl DecodeError {
    /// Whether the error stems from malformed data, as opposed to
    /// a missing start-of-image marker or an unsupported feature.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format(_) | Self::Huffman(_))
    }
}

/// Errors related to marker segments and their layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// The declared length of a segment does not match the bytes consumed.
    SegmentLength(&'static str),
    /// Unexpected end of data.
    UnexpectedEof,
    /// The frame has a zero width or height.
    InvalidDimensions,
    /// The sample precision is outside of 2..=16.
    InvalidPrecision,
    /// The scan selects a predictor outside of 1..=7.
    InvalidPredictor,
    /// A scan appeared before any frame header.
    MissingFrameHeader,
    /// A scan references a component that the frame does not declare.
    UnknownComponent,
    /// A frame or scan declares no components, or too many of them.
    InvalidComponentCount,
    /// The point transform is not smaller than the sample precision.
    InvalidPointTransform,
    /// A quantization table has an invalid identifier or precision.
    InvalidQuantizationTable,
    /// The expected restart marker was not found at a restart boundary.
    MissingRestartMarker,
}

/// Errors related to Huffman tables and entropy-coded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffmanError {
    /// The table identifier is larger than 3.
    InvalidTableId,
    /// The table class is larger than 2.
    InvalidTableClass,
    /// The code lengths do not fit into the lookup table.
    TableOverflow,
    /// A scan component refers to a table that was never defined.
    MissingTable,
    /// The entropy-coded data contains a code that is not in the table.
    InvalidCode,
}

/// Features that are outside of the lossless process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedError {
    /// A frame type other than lossless Huffman-coded (SOF3).
    Process(u8),
    /// Component sampling factors other than 1x1.
    Sampling,
    /// The image height is defined by a DNL marker.
    DefineNumberOfLines,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAJpeg => write!(f, "not a JPEG file"),
            Self::Format(e) => write!(f, "{e}"),
            Self::Huffman(e) => write!(f, "{e}"),
            Self::Unsupported(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SegmentLength(segment) => {
                write!(f, "{segment} segment length does not match its contents")
            }
            Self::UnexpectedEof => write!(f, "unexpected end of data"),
            Self::InvalidDimensions => write!(f, "invalid image dimensions"),
            Self::InvalidPrecision => write!(f, "invalid sample precision"),
            Self::InvalidPredictor => write!(f, "invalid predictor selection"),
            Self::MissingFrameHeader => write!(f, "scan appeared before the frame header"),
            Self::UnknownComponent => write!(f, "scan references an unknown component"),
            Self::InvalidComponentCount => write!(f, "invalid number of components"),
            Self::InvalidPointTransform => write!(f, "invalid point transform"),
            Self::InvalidQuantizationTable => write!(f, "invalid quantization table"),
            Self::MissingRestartMarker => write!(f, "missing restart marker"),
        }
    }
}

impl fmt::Display for HuffmanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTableId => write!(f, "Huffman table ID > 3"),
            Self::InvalidTableClass => write!(f, "Huffman table class > 2"),
            Self::TableOverflow => write!(f, "Huffman code lengths overflow the lookup table"),
            Self::MissingTable => write!(f, "missing Huffman table"),
            Self::InvalidCode => write!(f, "invalid Huffman code"),
        }
    }
}

impl fmt::Display for UnsupportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Process(marker) => write!(f, "unsupported frame type SOF{}", marker & 0x0f),
            Self::Sampling => write!(f, "unsupported component sampling factors"),
            Self::DefineNumberOfLines => write!(f, "image height defined by DNL marker"),
        }
    }
}

impl core::error::Error for DecodeError {}
impl core::error::Error for FormatError {}
impl core::error::Error for HuffmanError {}
impl core::error::Error for UnsupportedError {}

impl From<FormatError> for DecodeError {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

impl From<HuffmanError> for DecodeError {
    fn from(e: HuffmanError) -> Self {
        Self::Huffman(e)
    }
}

impl From<UnsupportedError> for DecodeError {
    fn from(e: UnsupportedError) -> Self {
        Self::Unsupported(e)
    }
}

/// Result type for lossless JPEG decoding operations.
pub type Result<T> = core::result::Result<T, DecodeError>;

macro_rules! bail {
    ($err:expr) => {
        return Err($err.into())
    };
}

macro_rules! err {
    ($err:expr) => {
        Err($err.into())
    };
}

pub(crate) use bail;
pub(crate) use err;
