//! Typed pixel samples.

use lumen_ljpeg::{Image, Samples};

/// The stored samples of an image, in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelData {
    /// Unsigned 8-bit samples.
    Unsigned8(Vec<u8>),
    /// Unsigned 16-bit samples.
    Unsigned16(Vec<u16>),
    /// Signed 16-bit samples.
    Signed16(Vec<i16>),
}

impl PixelData {
    /// Interpret native, little-endian pixel data.
    ///
    /// Only 8 and 16 bits allocated are supported. A trailing odd byte of
    /// 16-bit data is ignored. Returns `None` for other allocations and for
    /// empty data.
    pub fn from_raw(bytes: &[u8], bits_allocated: u16, pixel_representation: u16) -> Option<Self> {
        let pixels = match (bits_allocated, pixel_representation) {
            (8, _) => Self::Unsigned8(bytes.to_vec()),
            (16, 1) => Self::Signed16(
                bytes
                    .chunks_exact(2)
                    .map(|b| i16::from_le_bytes([b[0], b[1]]))
                    .collect(),
            ),
            (16, _) => Self::Unsigned16(
                bytes
                    .chunks_exact(2)
                    .map(|b| u16::from_le_bytes([b[0], b[1]]))
                    .collect(),
            ),
            _ => return None,
        };

        (!pixels.is_empty()).then_some(pixels)
    }

    /// Convert the output of the lossless JPEG decoder.
    ///
    /// Signed samples are sign-extended from the precision of the codec.
    pub(crate) fn from_decoded(image: Image, signed: bool) -> Option<Self> {
        let pixels = if signed {
            let shift = 16 - u32::from(image.precision.clamp(1, 16));
            let extend = |s: u16| ((s << shift) as i16) >> shift;

            match image.samples {
                Samples::U8(s) => Self::Signed16(s.into_iter().map(|v| extend(u16::from(v))).collect()),
                Samples::U16(s) => Self::Signed16(s.into_iter().map(extend).collect()),
            }
        } else {
            match image.samples {
                Samples::U8(s) => Self::Unsigned8(s),
                Samples::U16(s) => Self::Unsigned16(s),
            }
        };

        (!pixels.is_empty()).then_some(pixels)
    }

    /// The number of samples.
    pub fn len(&self) -> usize {
        match self {
            Self::Unsigned8(s) => s.len(),
            Self::Unsigned16(s) => s.len(),
            Self::Signed16(s) => s.len(),
        }
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The sample at the given index.
    pub fn get(&self, index: usize) -> Option<i32> {
        match self {
            Self::Unsigned8(s) => s.get(index).map(|v| i32::from(*v)),
            Self::Unsigned16(s) => s.get(index).map(|v| i32::from(*v)),
            Self::Signed16(s) => s.get(index).map(|v| i32::from(*v)),
        }
    }
}
