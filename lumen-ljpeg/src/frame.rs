//! The frame header (SOF segment).

use crate::error::{FormatError, Result, UnsupportedError, bail};
use crate::reader::Reader;
use smallvec::SmallVec;

/// A component declared by the frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameComponent {
    pub(crate) id: u8,
    pub(crate) h_samp: u8,
    pub(crate) v_samp: u8,
    pub(crate) quant_table: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FrameHeader {
    pub(crate) precision: u8,
    /// Number of lines.
    pub(crate) dim_y: u16,
    /// Number of samples per line.
    pub(crate) dim_x: u16,
    /// Components in the order they are declared. A repeated identifier
    /// updates the earlier entry.
    pub(crate) components: SmallVec<[FrameComponent; 4]>,
}

impl FrameHeader {
    /// Read a frame header, starting at the segment length.
    pub(crate) fn read(reader: &mut Reader<'_>) -> Result<Self> {
        let eof = || FormatError::UnexpectedEof;
        let length = usize::from(reader.read_u16().ok_or_else(eof)?);
        let mut count = 2;

        let precision = reader.read_byte().ok_or_else(eof)?;
        let dim_y = reader.read_u16().ok_or_else(eof)?;
        let dim_x = reader.read_u16().ok_or_else(eof)?;
        let num_comp = reader.read_byte().ok_or_else(eof)?;
        count += 6;

        let mut components: SmallVec<[FrameComponent; 4]> = SmallVec::new();

        for _ in 0..num_comp {
            if count > length {
                bail!(FormatError::SegmentLength("frame header"));
            }

            let id = reader.read_byte().ok_or_else(eof)?;
            count += 1;

            if count >= length {
                bail!(FormatError::SegmentLength("frame header"));
            }

            let sampling = reader.read_byte().ok_or_else(eof)?;
            let quant_table = reader.read_byte().ok_or_else(eof)?;
            count += 2;

            let component = FrameComponent {
                id,
                h_samp: sampling >> 4,
                v_samp: sampling & 0x0f,
                quant_table,
            };

            match components.iter_mut().find(|c| c.id == id) {
                Some(existing) => *existing = component,
                None => components.push(component),
            }
        }

        if count != length {
            bail!(FormatError::SegmentLength("frame header"));
        }

        if !(2..=16).contains(&precision) {
            bail!(FormatError::InvalidPrecision);
        }

        if components.is_empty() {
            bail!(FormatError::InvalidComponentCount);
        }

        if dim_x == 0 {
            bail!(FormatError::InvalidDimensions);
        }

        if dim_y == 0 {
            bail!(UnsupportedError::DefineNumberOfLines);
        }

        Ok(Self {
            precision,
            dim_y,
            dim_x,
            components,
        })
    }

    pub(crate) fn component_index(&self, id: u8) -> Option<usize> {
        self.components.iter().position(|c| c.id == id)
    }
}
