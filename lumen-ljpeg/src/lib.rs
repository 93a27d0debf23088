/*!
A memory-safe, pure-Rust decoder for lossless JPEG.

`lumen-ljpeg` decodes images coded with the lossless, Huffman-coded process
of ITU-T T.81 (also known as ISO/IEC 10918-1, "process 14" or SOF3). This is
the process behind the JPEG Lossless transfer syntaxes of DICOM.

All seven predictors, point transforms, restart intervals, multiple
components and sample precisions from 2 to 16 bits are supported. Lossy
processes, arithmetic coding and hierarchical mode are not.

# Example
```rust,no_run
use lumen_ljpeg::{DecodeSettings, Samples, decode};

let data = std::fs::read("image.jpg").unwrap();
let image = decode(&data, &DecodeSettings::default()).unwrap();

match image.samples {
    Samples::U8(samples) => println!("{} 8-bit samples", samples.len()),
    Samples::U16(samples) => println!("{} 16-bit samples", samples.len()),
}
```

# Logging
With the `logging` feature, the decoder reports tolerated defects (such as
missing restart markers or truncated entropy-coded data) through the `log`
crate.

# Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

mod bit_reader;
mod checksum;
mod decode;
mod error;
mod frame;
mod huffman;
mod log;
mod marker;
mod predictor;
mod quantization;
mod reader;
mod scan;

pub use checksum::{CRC_TABLE, crc32};
pub use error::{DecodeError, FormatError, HuffmanError, Result, UnsupportedError};
pub use reader::Reader;

/// Settings to apply during decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeSettings {
    /// Whether a restart interval that is not followed by the expected
    /// restart marker should be an error.
    ///
    /// By default, the decoder skips forward to the next restart marker.
    pub strict_restarts: bool,
}

/// A decoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// The number of samples per line.
    pub width: u16,
    /// The number of lines.
    pub height: u16,
    /// The sample precision in bits.
    pub precision: u8,
    /// The number of components.
    pub num_components: usize,
    /// The samples, row-major, with the components of each pixel interleaved
    /// in the order the frame header declares them.
    pub samples: Samples,
}

/// Decoded samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Samples {
    /// Samples with a precision of at most 8 bits.
    U8(Vec<u8>),
    /// Samples with a precision of more than 8 bits.
    U16(Vec<u16>),
}

impl Samples {
    /// The number of samples.
    pub fn len(&self) -> usize {
        match self {
            Self::U8(s) => s.len(),
            Self::U16(s) => s.len(),
        }
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode a lossless JPEG image.
///
/// Decoding stops at the end-of-image marker or at the end of the data,
/// whichever comes first.
pub fn decode(data: &[u8], settings: &DecodeSettings) -> Result<Image> {
    decode::decode(data, settings)
}
