//! A bit reader for entropy-coded segments.
//!
//! Stuffed zero bytes after `0xFF` are removed, and reading stops at the
//! first marker. Reads beyond that point yield zero bits.

use crate::error::{FormatError, Result, bail};
use crate::log::lwarn;
use crate::marker::{EOI, is_rst};

#[derive(Debug, Clone)]
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    /// Offset of the next byte to load, or of the pending marker.
    pos: usize,
    buffer: u64,
    /// Number of valid bits at the bottom of `buffer`.
    bits: u32,
    /// The marker that stopped loading, without the leading `0xFF`.
    marker: Option<u8>,
    /// Whether more bits were consumed than the segment contains.
    overrun: bool,
}

impl<'a> BitReader<'a> {
    #[inline]
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            buffer: 0,
            bits: 0,
            marker: None,
            overrun: false,
        }
    }

    fn fill(&mut self) {
        while self.bits <= 48 && self.marker.is_none() {
            let Some(&byte) = self.data.get(self.pos) else {
                break;
            };

            if byte == 0xff {
                match self.data.get(self.pos + 1).copied() {
                    // Stuffed byte.
                    Some(0x00) => self.pos += 2,
                    // Fill byte in front of a marker.
                    Some(0xff) => {
                        self.pos += 1;
                        continue;
                    }
                    Some(marker) => {
                        self.marker = Some(marker);
                        break;
                    }
                    None => {
                        self.pos += 1;
                        break;
                    }
                }
            } else {
                self.pos += 1;
            }

            self.buffer = (self.buffer << 8) | u64::from(byte);
            self.bits += 8;
        }
    }

    /// Look at the next `count` (at most 32) bits without consuming them.
    #[inline]
    pub(crate) fn peek_bits(&mut self, count: u32) -> u32 {
        debug_assert!(count <= 32);

        if self.bits < count {
            self.fill();
        }

        let mask = (1_u64 << count) - 1;

        let bits = if self.bits >= count {
            self.buffer >> (self.bits - count)
        } else {
            self.buffer << (count - self.bits)
        };

        (bits & mask) as u32
    }

    #[inline]
    pub(crate) fn consume(&mut self, count: u32) {
        if count > self.bits {
            if !self.overrun {
                lwarn!("entropy-coded data ended prematurely, padding with zeros");
            }

            self.overrun = true;
            self.bits = 0;
        } else {
            self.bits -= count;
        }
    }

    #[inline]
    pub(crate) fn read_bits(&mut self, count: u32) -> u32 {
        if count == 0 {
            return 0;
        }

        let bits = self.peek_bits(count);
        self.consume(count);

        bits
    }

    /// Whether a restart marker stopped loading and fewer than a byte of
    /// buffered bits remain in front of it.
    #[inline]
    pub(crate) fn at_restart(&mut self) -> bool {
        if self.bits < 8 {
            self.fill();
        }

        self.marker.is_some_and(is_rst) && self.bits < 8
    }

    /// Drop the remaining bits of the current interval and consume the next
    /// restart marker.
    ///
    /// In strict mode, the marker must directly follow and carry the expected
    /// number. Otherwise the reader resynchronizes to the next restart marker.
    pub(crate) fn restart(&mut self, expected: u8, strict: bool) -> Result<()> {
        self.buffer = 0;
        self.bits = 0;

        let marker = match self.marker {
            Some(marker) => Some(marker),
            None => match self.data.get(self.pos..self.pos + 2) {
                Some(&[0xff, marker]) if marker != 0x00 => Some(marker),
                _ => None,
            },
        };

        match marker {
            Some(marker) if marker == expected || (!strict && is_rst(marker)) => {
                self.pos += 2;
                self.marker = None;
                self.overrun = false;

                return Ok(());
            }
            _ if strict => bail!(FormatError::MissingRestartMarker),
            _ => {}
        }

        lwarn!(
            "expected restart marker {:#04x}, resynchronizing",
            expected
        );

        let next = self.data.get(self.pos..).and_then(|tail| {
            tail.windows(2)
                .position(|w| w[0] == 0xff && (is_rst(w[1]) || w[1] == EOI))
        });

        match next {
            Some(offset) => {
                let marker = self.data[self.pos + offset + 1];
                self.pos += offset;

                if marker == EOI {
                    self.marker = Some(EOI);
                } else {
                    self.pos += 2;
                    self.marker = None;
                    self.overrun = false;
                }
            }
            None => {
                self.pos = self.data.len();
                self.marker = None;
            }
        }

        Ok(())
    }

    /// The offset at which the marker following the entropy-coded segment is
    /// expected.
    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }
}
