//! The scan header (SOS segment).

use crate::error::{FormatError, Result, bail};
use crate::reader::Reader;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanComponent {
    /// Identifier of the frame component coded in this scan.
    pub(crate) selector: u8,
    pub(crate) dc_table: u8,
    pub(crate) ac_table: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScanHeader {
    pub(crate) components: SmallVec<[ScanComponent; 4]>,
    /// The predictor in the lossless process.
    pub(crate) selection: u8,
    pub(crate) spectral_end: u8,
    pub(crate) ah: u8,
    /// The point transform in the lossless process.
    pub(crate) al: u8,
}

impl ScanHeader {
    /// Read a scan header, starting at the segment length.
    pub(crate) fn read(reader: &mut Reader<'_>) -> Result<Self> {
        let eof = || FormatError::UnexpectedEof;
        let length = usize::from(reader.read_u16().ok_or_else(eof)?);
        let num_comp = reader.read_byte().ok_or_else(eof)?;
        let mut count = 3;

        let mut components = SmallVec::new();

        for _ in 0..num_comp {
            if count > length {
                bail!(FormatError::SegmentLength("scan header"));
            }

            let selector = reader.read_byte().ok_or_else(eof)?;
            let tables = reader.read_byte().ok_or_else(eof)?;
            count += 2;

            components.push(ScanComponent {
                selector,
                dc_table: tables >> 4,
                ac_table: tables & 0x0f,
            });
        }

        let selection = reader.read_byte().ok_or_else(eof)?;
        let spectral_end = reader.read_byte().ok_or_else(eof)?;
        let approximation = reader.read_byte().ok_or_else(eof)?;
        count += 3;

        if count != length {
            bail!(FormatError::SegmentLength("scan header"));
        }

        if !(1..=4).contains(&num_comp) {
            bail!(FormatError::InvalidComponentCount);
        }

        Ok(Self {
            components,
            selection,
            spectral_end,
            ah: approximation >> 4,
            al: approximation & 0x0f,
        })
    }
}
