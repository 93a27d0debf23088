//! Walking the elements of a data set.

use log::{debug, warn};

use crate::metadata::DicomMetadata;
use crate::reader::Reader;
use crate::tag::{Field, Tag};
use crate::transfer_syntax::TransferSyntax;
use crate::vr::Vr;

const PREAMBLE_LEN: usize = 128;
const MAGIC: &[u8] = b"DICM";
const UNDEFINED_LENGTH: u32 = 0xFFFF_FFFF;
const MIN_ELEMENT_LEN: usize = 8;

/// The outcome of scanning a data set.
#[derive(Debug, Clone)]
pub struct ScanResult<'a> {
    /// The recognized attributes, without defaults applied.
    pub metadata: DicomMetadata,
    /// The pixel data element, if one was found.
    pub pixel_data: Option<PixelDataElement<'a>>,
    /// Whether an element extended past the end of the data, so that the
    /// scan stopped early.
    pub truncated: bool,
}

/// The location and encoding of the pixel data.
#[derive(Debug, Clone, Copy)]
pub struct PixelDataElement<'a> {
    /// The offset of the value within the scanned data.
    pub offset: usize,
    /// The value, for native pixel data with a defined length.
    ///
    /// Encapsulated pixel data has no value here; its fragments start at
    /// `offset`.
    pub value: Option<&'a [u8]>,
    /// The number of bits allocated for each sample. 16 if absent.
    pub bits_allocated: u16,
    /// 0 for unsigned samples, 1 for two's complement.
    pub pixel_representation: u16,
    /// The transfer syntax in effect, if the data declares one.
    pub transfer_syntax: Option<TransferSyntax>,
}

impl PixelDataElement<'_> {
    /// Whether the samples are signed.
    pub fn is_signed(&self) -> bool {
        self.pixel_representation == 1
    }

    /// Whether the pixel data is encapsulated lossless JPEG.
    pub fn is_jpeg_lossless(&self) -> bool {
        self.transfer_syntax.is_some_and(TransferSyntax::is_jpeg_lossless)
    }
}

/// Whether the data starts with a 128-byte preamble followed by `DICM`.
pub fn has_preamble(data: &[u8]) -> bool {
    data.get(PREAMBLE_LEN..PREAMBLE_LEN + MAGIC.len()) == Some(MAGIC)
}

/// Scan a data set, optionally preceded by a preamble.
///
/// Scanning never fails: if an element extends past the end of the data, the
/// attributes gathered so far are returned and `truncated` is set.
pub fn scan(data: &[u8]) -> ScanResult<'_> {
    let mut scanner = Scanner::new(data);

    if has_preamble(data) {
        scanner.reader.jump(PREAMBLE_LEN + MAGIC.len());
    }

    scanner.run();

    ScanResult {
        metadata: scanner.metadata,
        pixel_data: scanner.pixel_data,
        truncated: scanner.truncated,
    }
}

enum Step {
    Continue,
    Stop,
}

struct Scanner<'a> {
    data: &'a [u8],
    reader: Reader<'a>,
    metadata: DicomMetadata,
    transfer_syntax: Option<TransferSyntax>,
    pixel_data: Option<PixelDataElement<'a>>,
    truncated: bool,
}

impl<'a> Scanner<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            reader: Reader::new(data),
            metadata: DicomMetadata::default(),
            transfer_syntax: None,
            pixel_data: None,
            truncated: false,
        }
    }

    fn run(&mut self) {
        while self.reader.remaining() >= MIN_ELEMENT_LEN {
            let start = self.reader.offset();

            match self.element() {
                Some(Step::Continue) => {}
                Some(Step::Stop) => break,
                None => {
                    warn!("data set is truncated, element at offset {start} is incomplete");

                    self.truncated = true;
                    break;
                }
            }
        }
    }

    fn element(&mut self) -> Option<Step> {
        let tag = Tag(self.reader.read_u16()?, self.reader.read_u16()?);

        let length = if tag.0 == Tag::ITEM_GROUP || !self.is_explicit_vr(tag) {
            self.reader.read_u32()?
        } else {
            let vr = Vr::parse(self.reader.read_bytes(2)?);

            if vr.is_some_and(Vr::is_long_form) {
                self.reader.skip_bytes(2)?;
                self.reader.read_u32()?
            } else {
                u32::from(self.reader.read_u16()?)
            }
        };

        let field = Field::from_tag(tag);
        let offset = self.reader.offset();

        if length == UNDEFINED_LENGTH {
            if field == Some(Field::PixelData) {
                return Some(self.pixel_data(offset, None));
            }

            debug!("skipping {tag} with undefined length");

            let end = find_delimiter(self.data, offset)?;
            self.reader.jump(end);

            return Some(Step::Continue);
        }

        let value = self.reader.read_bytes(length as usize)?;

        match field {
            Some(Field::PixelData) => return Some(self.pixel_data(offset, Some(value))),
            Some(Field::TransferSyntaxUid) => {
                self.metadata.set(Field::TransferSyntaxUid, value);
                self.transfer_syntax = self
                    .metadata
                    .transfer_syntax_uid
                    .as_deref()
                    .map(TransferSyntax::from_uid);
            }
            Some(field) => self.metadata.set(field, value),
            None => {}
        }

        Some(Step::Continue)
    }

    /// Whether the element whose header is being read carries a VR.
    fn is_explicit_vr(&self, tag: Tag) -> bool {
        if tag.0 == Tag::META_GROUP {
            return true;
        }

        match self.transfer_syntax {
            Some(ts) => !ts.is_implicit_vr(),
            None => self.reader.peek_bytes(2).and_then(Vr::parse).is_some(),
        }
    }

    fn pixel_data(&mut self, offset: usize, value: Option<&'a [u8]>) -> Step {
        let element = PixelDataElement {
            offset,
            value,
            bits_allocated: self
                .metadata
                .bits_allocated
                .filter(|b| *b != 0)
                .unwrap_or(16),
            pixel_representation: self.metadata.pixel_representation.unwrap_or(0),
            transfer_syntax: self.transfer_syntax,
        };
        self.pixel_data = Some(element);

        if element.is_jpeg_lossless() {
            debug!("found encapsulated lossless JPEG pixel data at offset {offset}");

            Step::Stop
        } else if value.is_none() {
            warn!(
                "unsupported encapsulated transfer syntax {}",
                self.metadata
                    .transfer_syntax_uid
                    .as_deref()
                    .unwrap_or("(none)")
            );

            Step::Stop
        } else {
            debug!("found native pixel data at offset {offset}");

            Step::Continue
        }
    }
}

/// Find the end of a value with undefined length, which is the end of the
/// first item or sequence delimitation item after `start`.
fn find_delimiter(data: &[u8], start: usize) -> Option<usize> {
    let last = data.len().checked_sub(MIN_ELEMENT_LEN)?;

    (start..last)
        .find(|&i| matches!(&data[i..i + 4], [0xFE, 0xFF, 0x0D | 0xDD, 0xE0]))
        .map(|i| i + MIN_ELEMENT_LEN)
}
