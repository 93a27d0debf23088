//! Quantization table definitions (DQT segment).
//!
//! The lossless process does not dequantize, but streams produced by some
//! encoders still carry the segment.

use crate::error::{FormatError, Result, bail};
use crate::reader::Reader;

#[derive(Debug, Clone, Default)]
pub(crate) struct QuantizationTables {
    tables: [Option<[u16; 64]>; 4],
}

impl QuantizationTables {
    /// Read a DQT segment, starting at the segment length.
    pub(crate) fn read(&mut self, reader: &mut Reader<'_>) -> Result<()> {
        let eof = || FormatError::UnexpectedEof;
        let length = usize::from(reader.read_u16().ok_or_else(eof)?);
        let mut count = 2;

        while count < length {
            let precision_and_id = reader.read_byte().ok_or_else(eof)?;
            count += 1;

            let id = usize::from(precision_and_id & 0x0f);
            let wide = match precision_and_id >> 4 {
                0 => false,
                1 => true,
                _ => bail!(FormatError::InvalidQuantizationTable),
            };

            let mut table = [0; 64];

            for entry in &mut table {
                *entry = if wide {
                    count += 2;
                    reader.read_u16().ok_or_else(eof)?
                } else {
                    count += 1;
                    u16::from(reader.read_byte().ok_or_else(eof)?)
                };
            }

            *self
                .tables
                .get_mut(id)
                .ok_or(FormatError::InvalidQuantizationTable)? = Some(table);
        }

        if count != length {
            bail!(FormatError::SegmentLength("quantization table"));
        }

        Ok(())
    }

    pub(crate) fn num_tables(&self) -> usize {
        self.tables.iter().flatten().count()
    }
}
