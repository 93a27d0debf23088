//! Huffman table definitions (DHT segment) and lookup-table decoding.
//!
//! Codes of up to 8 bits resolve with a single lookup into a 256-entry
//! primary table. Each unused primary entry points to a 256-entry extension
//! block indexed by the following 8 bits, so codes of up to 16 bits resolve
//! with at most two lookups.

use crate::bit_reader::BitReader;
use crate::error::{FormatError, HuffmanError, Result, bail};
use crate::log::lwarn;
use crate::reader::Reader;

/// Flags a primary entry that refers to an extension block.
const ESCAPE: u32 = 0x8000_0000;

#[derive(Debug, Clone)]
pub(crate) struct HuffmanTable {
    /// `value | (length << 8)`, or `block | ESCAPE`.
    primary: [u32; 256],
    /// Extension blocks, where block `n` is stored at index `n - 1`.
    blocks: Vec<[u32; 256]>,
}

impl HuffmanTable {
    /// Build the lookup table from the number of codes of each length
    /// (1 to 16) and the symbol values in code order.
    pub(crate) fn build(counts: &[u8; 16], values: &[u8]) -> Result<Self> {
        let mut values = values.iter().copied();
        let mut next_value = || values.next().ok_or(FormatError::UnexpectedEof);

        let mut primary = [0; 256];
        let mut k = 0;

        for length in 1..=8 {
            let span = 256 >> length;

            for _ in 0..counts[length - 1] {
                let entry = u32::from(next_value()?) | ((length as u32) << 8);
                primary
                    .get_mut(k..k + span)
                    .ok_or(HuffmanError::TableOverflow)?
                    .fill(entry);
                k += span;
            }
        }

        let num_escapes = 256 - k;

        for (block, entry) in (1..).zip(primary[k..].iter_mut()) {
            *entry = block | ESCAPE;
        }

        let mut blocks: Vec<[u32; 256]> = Vec::new();
        let mut k = 0;

        for length in 9..=16 {
            let span = 256 >> (length - 8);

            for _ in 0..counts[length - 1] {
                let entry = u32::from(next_value()?) | ((length as u32) << 8);

                if k == 0 {
                    if blocks.len() == num_escapes {
                        bail!(HuffmanError::TableOverflow);
                    }

                    blocks.push([0; 256]);
                }

                let block = blocks.last_mut().ok_or(HuffmanError::TableOverflow)?;
                block
                    .get_mut(k..k + span)
                    .ok_or(HuffmanError::TableOverflow)?
                    .fill(entry);
                k += span;

                if k == 256 {
                    k = 0;
                }
            }
        }

        Ok(Self { primary, blocks })
    }

    /// Decode the next symbol.
    #[inline]
    pub(crate) fn decode(&self, reader: &mut BitReader<'_>) -> Result<u8> {
        let bits = reader.peek_bits(16);
        let mut entry = self.primary[(bits >> 8) as usize];

        if entry & ESCAPE != 0 {
            let block = (entry & !ESCAPE) as usize;

            entry = block
                .checked_sub(1)
                .and_then(|b| self.blocks.get(b))
                .map(|b| b[(bits & 0xff) as usize])
                .unwrap_or(0);

            if entry == 0 {
                bail!(HuffmanError::InvalidCode);
            }
        }

        reader.consume(entry >> 8);

        Ok((entry & 0xff) as u8)
    }
}

/// The Huffman tables defined so far, indexed by table identifier and class.
#[derive(Debug, Clone, Default)]
pub(crate) struct HuffmanTables {
    tables: [[Option<HuffmanTable>; 2]; 4],
}

impl HuffmanTables {
    /// Read a DHT segment, starting at the segment length. A segment can
    /// define several tables, each replacing the previous definition of its
    /// slot.
    pub(crate) fn read(&mut self, reader: &mut Reader<'_>) -> Result<()> {
        let eof = || FormatError::UnexpectedEof;
        let length = usize::from(reader.read_u16().ok_or_else(eof)?);
        let mut count = 2;

        while count < length {
            let class_and_id = reader.read_byte().ok_or_else(eof)?;
            count += 1;

            let id = class_and_id & 0x0f;

            if id > 3 {
                bail!(HuffmanError::InvalidTableId);
            }

            let class = class_and_id >> 4;

            if class > 2 {
                bail!(HuffmanError::InvalidTableClass);
            }

            let mut counts = [0; 16];
            counts.copy_from_slice(reader.read_bytes(16).ok_or_else(eof)?);
            count += 16;

            let num_values: usize = counts.iter().map(|c| usize::from(*c)).sum();

            if count + num_values > length {
                bail!(FormatError::SegmentLength("Huffman table"));
            }

            let values = reader.read_bytes(num_values).ok_or_else(eof)?;
            count += num_values;

            if class == 2 {
                lwarn!("ignoring Huffman table {} with class 2", id);
                continue;
            }

            self.tables[usize::from(id)][usize::from(class)] =
                Some(HuffmanTable::build(&counts, values)?);
        }

        if count != length {
            bail!(FormatError::SegmentLength("Huffman table"));
        }

        Ok(())
    }

    /// The DC table with the given identifier, the only class used by the
    /// lossless process.
    pub(crate) fn dc(&self, id: u8) -> Option<&HuffmanTable> {
        self.tables.get(usize::from(id))?[0].as_ref()
    }
}
