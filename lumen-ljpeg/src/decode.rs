//! The marker state machine and entropy decoding of lossless scans.

use crate::bit_reader::BitReader;
use crate::error::{
    DecodeError, FormatError, HuffmanError, Result, UnsupportedError, bail, err,
};
use crate::frame::FrameHeader;
use crate::huffman::{HuffmanTable, HuffmanTables};
use crate::log::{ldebug, ltrace, lwarn};
use crate::marker::{
    COM, DHT, DNL, DQT, DRI, EOI, RST0, SOF3, SOI, SOS, is_app, is_rst, is_sof,
};
use crate::predictor::Predictor;
use crate::quantization::QuantizationTables;
use crate::reader::Reader;
use crate::scan::ScanHeader;
use crate::{DecodeSettings, Image, Samples};
use smallvec::SmallVec;

pub(crate) fn decode(data: &[u8], settings: &DecodeSettings) -> Result<Image> {
    let mut reader = Reader::new(data);

    if reader.read_bytes(2) != Some(&[0xff, SOI][..]) {
        bail!(DecodeError::NotAJpeg);
    }

    let mut decoder = Decoder::new(settings, data.len());

    loop {
        let Some(marker) = next_marker(&mut reader) else {
            lwarn!("missing end-of-image marker");
            break;
        };

        ltrace!("marker {:#04x} at offset {}", marker, reader.offset() - 2);

        match marker {
            SOF3 => decoder.read_frame(&mut reader)?,
            DHT => decoder.huffman.read(&mut reader)?,
            DQT => decoder.quantization.read(&mut reader)?,
            DRI => decoder.read_restart_interval(&mut reader)?,
            SOS => decoder.read_scan(&mut reader)?,
            EOI => break,
            SOI => {
                lwarn!("ignoring repeated start-of-image marker");
            }
            DNL => {
                ldebug!("ignoring DNL segment");
                skip_segment(&mut reader)?;
            }
            m if is_sof(m) => bail!(UnsupportedError::Process(m)),
            m if is_rst(m) => {
                lwarn!("ignoring restart marker {:#04x} outside of a scan", m);
            }
            m if is_app(m) || m == COM => skip_segment(&mut reader)?,
            m => {
                lwarn!("skipping unknown marker {:#04x}", m);
                skip_segment(&mut reader)?;
            }
        }
    }

    decoder.finish()
}

/// Advance past the next marker and return its code. Bytes that are not part
/// of a marker are skipped.
fn next_marker(reader: &mut Reader<'_>) -> Option<u8> {
    loop {
        if reader.read_byte()? != 0xff {
            continue;
        }

        let mut marker = reader.read_byte()?;

        while marker == 0xff {
            marker = reader.read_byte()?;
        }

        if marker != 0x00 {
            return Some(marker);
        }
    }
}

fn skip_segment(reader: &mut Reader<'_>) -> Result<()> {
    let length = reader.read_u16().ok_or(FormatError::UnexpectedEof)?;

    if length < 2 {
        bail!(FormatError::SegmentLength("marker"));
    }

    reader
        .skip_bytes(usize::from(length) - 2)
        .ok_or(FormatError::UnexpectedEof)?;

    Ok(())
}

struct Decoder<'a> {
    settings: &'a DecodeSettings,
    /// Length of the whole input, bounding the number of samples.
    data_len: usize,
    frame: Option<FrameHeader>,
    huffman: HuffmanTables,
    quantization: QuantizationTables,
    restart_interval: u16,
    /// One plane of samples per frame component.
    planes: Vec<Vec<u16>>,
    num_scans: usize,
}

impl<'a> Decoder<'a> {
    fn new(settings: &'a DecodeSettings, data_len: usize) -> Self {
        Self {
            settings,
            data_len,
            frame: None,
            huffman: HuffmanTables::default(),
            quantization: QuantizationTables::default(),
            restart_interval: 0,
            planes: Vec::new(),
            num_scans: 0,
        }
    }

    fn read_frame(&mut self, reader: &mut Reader<'_>) -> Result<()> {
        let frame = FrameHeader::read(reader)?;

        ldebug!(
            "frame: {}x{}, {} bits, {} components",
            frame.dim_x,
            frame.dim_y,
            frame.precision,
            frame.components.len()
        );

        for component in &frame.components {
            ltrace!(
                "component {}: sampling {}x{}, quantization table {}",
                component.id,
                component.h_samp,
                component.v_samp,
                component.quant_table
            );

            if component.h_samp != 1 || component.v_samp != 1 {
                bail!(UnsupportedError::Sampling);
            }
        }

        if self.frame.is_some() {
            lwarn!("replacing earlier frame header");
        }

        let plane_len = usize::from(frame.dim_x) * usize::from(frame.dim_y);

        // Every sample takes at least one bit of entropy-coded data.
        if plane_len * frame.components.len() > self.data_len.saturating_mul(8) {
            bail!(FormatError::InvalidDimensions);
        }

        self.planes = vec![vec![0; plane_len]; frame.components.len()];
        self.frame = Some(frame);

        Ok(())
    }

    fn read_restart_interval(&mut self, reader: &mut Reader<'_>) -> Result<()> {
        let length = reader.read_u16().ok_or(FormatError::UnexpectedEof)?;

        if length != 4 {
            bail!(FormatError::SegmentLength("restart interval"));
        }

        self.restart_interval = reader.read_u16().ok_or(FormatError::UnexpectedEof)?;
        ldebug!("restart interval: {}", self.restart_interval);

        Ok(())
    }

    fn read_scan(&mut self, reader: &mut Reader<'_>) -> Result<()> {
        let scan = ScanHeader::read(reader)?;
        let frame = self.frame.as_ref().ok_or(FormatError::MissingFrameHeader)?;
        let predictor = Predictor::new(scan.selection)?;

        if scan.al >= frame.precision {
            bail!(FormatError::InvalidPointTransform);
        }

        ldebug!(
            "scan: {} components, predictor {}, point transform {}",
            scan.components.len(),
            scan.selection,
            scan.al
        );
        ltrace!("spectral end {}, approximation high {}", scan.spectral_end, scan.ah);

        let mut components: SmallVec<[(usize, &HuffmanTable); 4]> = SmallVec::new();

        for component in &scan.components {
            let index = frame
                .component_index(component.selector)
                .ok_or(FormatError::UnknownComponent)?;
            let table = self
                .huffman
                .dc(component.dc_table)
                .ok_or(HuffmanError::MissingTable)?;
            ltrace!(
                "scan component {}: DC table {}, AC table {}",
                component.selector,
                component.dc_table,
                component.ac_table
            );

            components.push((index, table));
        }

        let params = ScanParams {
            width: usize::from(frame.dim_x),
            height: usize::from(frame.dim_y),
            default_prediction: 1 << (frame.precision - scan.al - 1),
            predictor,
            restart_interval: usize::from(self.restart_interval),
            strict_restarts: self.settings.strict_restarts,
        };

        let start = reader.offset();
        let mut bits = BitReader::new(reader.tail());

        decode_scan(&params, &components, &mut self.planes, &mut bits)?;

        if scan.al > 0 {
            for (index, _) in &components {
                for sample in &mut self.planes[*index] {
                    *sample <<= scan.al;
                }
            }
        }

        reader.jump(start + bits.position());
        self.num_scans += 1;

        Ok(())
    }

    fn finish(self) -> Result<Image> {
        let frame = self.frame.ok_or(FormatError::MissingFrameHeader)?;

        if self.num_scans == 0 {
            lwarn!("image contains no scan");
        }

        ltrace!(
            "{} quantization tables defined",
            self.quantization.num_tables()
        );

        let num_components = frame.components.len();
        let plane_len = usize::from(frame.dim_x) * usize::from(frame.dim_y);
        let interleaved = (0..plane_len).flat_map(|i| self.planes.iter().map(move |p| p[i]));

        let samples = if frame.precision <= 8 {
            Samples::U8(interleaved.map(|s| s as u8).collect())
        } else {
            Samples::U16(interleaved.collect())
        };

        Ok(Image {
            width: frame.dim_x,
            height: frame.dim_y,
            precision: frame.precision,
            num_components,
            samples,
        })
    }
}

struct ScanParams {
    width: usize,
    height: usize,
    default_prediction: i32,
    predictor: Predictor,
    /// Number of MCUs between restart markers, or 0 if there are none.
    restart_interval: usize,
    strict_restarts: bool,
}

/// Decode the entropy-coded data of one scan into the planes of the
/// components it contains. Each MCU holds one sample of every component.
fn decode_scan(
    params: &ScanParams,
    components: &[(usize, &HuffmanTable)],
    planes: &mut [Vec<u16>],
    reader: &mut BitReader<'_>,
) -> Result<()> {
    let width = params.width;
    let num_mcus = width * params.height;
    let mut mcus_in_interval = 0;
    let mut interval_row = 0;
    let mut restarts: u8 = 0;

    for i in 0..num_mcus {
        let (x, y) = (i % width, i / width);

        if mcus_in_interval == 0 {
            interval_row = y;
        }

        for &(index, table) in components {
            let plane = &mut planes[index];

            let prediction = if mcus_in_interval == 0 {
                params.default_prediction
            } else if y == interval_row {
                i32::from(plane[i - 1])
            } else if x == 0 {
                i32::from(plane[i - width])
            } else {
                params.predictor.predict(
                    i32::from(plane[i - 1]),
                    i32::from(plane[i - width]),
                    i32::from(plane[i - width - 1]),
                )
            };

            let difference = decode_difference(reader, table)?;
            plane[i] = ((prediction + difference) & 0xffff) as u16;
        }

        mcus_in_interval += 1;

        if i + 1 < num_mcus {
            let due = if params.restart_interval > 0 {
                mcus_in_interval == params.restart_interval
            } else {
                // Restart markers in a stream without a restart interval.
                reader.at_restart()
            };

            if due {
                ltrace!("restart after MCU {}", i);
                reader.restart(RST0 + restarts, params.strict_restarts)?;
                restarts = (restarts + 1) % 8;
                mcus_in_interval = 0;
            }
        }
    }

    Ok(())
}

/// Decode a difference category and its additional bits (T.81, H.1.2.2).
#[inline]
fn decode_difference(reader: &mut BitReader<'_>, table: &HuffmanTable) -> Result<i32> {
    match table.decode(reader)? {
        0 => Ok(0),
        category @ 1..=15 => {
            let k = u32::from(category);
            let raw = reader.read_bits(k) as i32;

            if raw < 1 << (k - 1) {
                Ok(raw - ((1 << k) - 1))
            } else {
                Ok(raw)
            }
        }
        16 => Ok(32768),
        _ => err!(HuffmanError::InvalidCode),
    }
}
