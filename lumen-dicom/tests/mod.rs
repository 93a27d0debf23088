//! Test suite for lumen-dicom.
//!
//! Files are assembled in memory by the writer below. Compressed pixel data
//! is produced by a minimal lossless JPEG encoder (one component, first
//! predictor, no restart intervals).

use lumen_dicom::{
    DicomImage, LoadError, LoadSettings, MissingPixelPolicy, PixelData, PixelSpacing, Tag,
    TransferSyntax, Window, load,
};
use lumen_ljpeg::DecodeError;

const UNDEFINED_LENGTH: u32 = 0xFFFF_FFFF;

struct Writer {
    data: Vec<u8>,
    implicit: bool,
}

impl Writer {
    fn new() -> Self {
        let mut data = vec![0; 128];
        data.extend_from_slice(b"DICM");

        Self {
            data,
            implicit: false,
        }
    }

    /// A data set without preamble and file meta information.
    fn bare() -> Self {
        Self {
            data: Vec::new(),
            implicit: false,
        }
    }

    fn transfer_syntax(mut self, uid: &str) -> Self {
        let mut value = uid.as_bytes().to_vec();

        if value.len() % 2 == 1 {
            value.push(0);
        }

        self.explicit_header(Tag::TRANSFER_SYNTAX_UID, b"UI", value.len() as u32);
        self.data.extend_from_slice(&value);
        self.implicit = uid == TransferSyntax::IMPLICIT_VR_LITTLE_ENDIAN;
        self
    }

    fn header(&mut self, tag: Tag, vr: &[u8; 2], len: u32) {
        if self.implicit {
            self.tag(tag);
            self.data.extend_from_slice(&len.to_le_bytes());
        } else {
            self.explicit_header(tag, vr, len);
        }
    }

    fn explicit_header(&mut self, tag: Tag, vr: &[u8; 2], len: u32) {
        self.tag(tag);
        self.data.extend_from_slice(vr);

        if matches!(vr, b"OB" | b"OW" | b"SQ" | b"UN" | b"UT") {
            self.data.extend_from_slice(&[0, 0]);
            self.data.extend_from_slice(&len.to_le_bytes());
        } else {
            self.data.extend_from_slice(&(len as u16).to_le_bytes());
        }
    }

    fn tag(&mut self, tag: Tag) {
        self.data.extend_from_slice(&tag.0.to_le_bytes());
        self.data.extend_from_slice(&tag.1.to_le_bytes());
    }

    fn element(mut self, tag: Tag, vr: &[u8; 2], value: &[u8]) -> Self {
        self.header(tag, vr, value.len() as u32);
        self.data.extend_from_slice(value);
        self
    }

    fn string(self, tag: Tag, vr: &[u8; 2], value: &str) -> Self {
        let mut value = value.as_bytes().to_vec();

        if value.len() % 2 == 1 {
            value.push(b' ');
        }

        self.element(tag, vr, &value)
    }

    fn us(self, tag: Tag, value: u16) -> Self {
        self.element(tag, b"US", &value.to_le_bytes())
    }

    fn dimensions(self, rows: u16, columns: u16) -> Self {
        self.us(Tag::ROWS, rows).us(Tag::COLUMNS, columns)
    }

    fn native_u16(self, samples: &[u16]) -> Self {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        self.element(Tag::PIXEL_DATA, b"OW", &bytes)
    }

    fn encapsulated(mut self, fragment: &[u8]) -> Self {
        let mut fragment = fragment.to_vec();

        if fragment.len() % 2 == 1 {
            fragment.push(0);
        }

        self.header(Tag::PIXEL_DATA, b"OB", UNDEFINED_LENGTH);

        // Empty basic offset table.
        self.tag(Tag::ITEM);
        self.data.extend_from_slice(&0u32.to_le_bytes());

        self.tag(Tag::ITEM);
        self.data
            .extend_from_slice(&(fragment.len() as u32).to_le_bytes());
        self.data.extend_from_slice(&fragment);

        self.tag(Tag::SEQUENCE_DELIMITATION);
        self.data.extend_from_slice(&0u32.to_le_bytes());
        self
    }

    fn finish(self) -> Vec<u8> {
        self.data
    }
}

fn table_counts() -> [u8; 16] {
    let mut counts = [0; 16];
    counts[1] = 3;

    for length in 3..=16 {
        counts[length - 1] = 1;
    }

    counts
}

const TABLE_VALUES: [u8; 17] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];

fn canonical_codes() -> Vec<(u32, u32)> {
    let mut codes = vec![(0, 0); TABLE_VALUES.len()];
    let mut values = TABLE_VALUES.iter();
    let mut code = 0;

    for (length, count) in (1..).zip(table_counts()) {
        for _ in 0..count {
            codes[usize::from(*values.next().unwrap())] = (code, length);
            code += 1;
        }

        code <<= 1;
    }

    codes
}

#[derive(Default)]
struct BitWriter {
    data: Vec<u8>,
    current: u32,
    bits: u32,
}

impl BitWriter {
    fn write(&mut self, value: u32, count: u32) {
        for i in (0..count).rev() {
            self.current = (self.current << 1) | ((value >> i) & 1);
            self.bits += 1;

            if self.bits == 8 {
                let byte = self.current as u8;
                self.data.push(byte);

                if byte == 0xff {
                    self.data.push(0x00);
                }

                self.current = 0;
                self.bits = 0;
            }
        }
    }

    fn flush(&mut self) {
        while self.bits != 0 {
            self.write(1, 1);
        }
    }
}

fn segment(out: &mut Vec<u8>, marker: u8, payload: &[u8]) {
    out.extend([0xff, marker]);
    out.extend((payload.len() as u16 + 2).to_be_bytes());
    out.extend(payload);
}

fn lossless_jpeg(width: u16, height: u16, precision: u8, samples: &[u16]) -> Vec<u8> {
    let mut out = vec![0xff, 0xd8];

    let mut dht = vec![0x00];
    dht.extend(table_counts());
    dht.extend(TABLE_VALUES);
    segment(&mut out, 0xc4, &dht);

    let mut sof = vec![precision];
    sof.extend(height.to_be_bytes());
    sof.extend(width.to_be_bytes());
    sof.extend([1, 1, 0x11, 0x00]);
    segment(&mut out, 0xc3, &sof);

    segment(&mut out, 0xda, &[1, 1, 0x00, 1, 0, 0]);

    let codes = canonical_codes();
    let width = usize::from(width);
    let mut writer = BitWriter::default();

    for (i, sample) in samples.iter().enumerate() {
        let prediction = if i == 0 {
            1 << (precision - 1)
        } else if i % width == 0 {
            i32::from(samples[i - width])
        } else {
            i32::from(samples[i - 1])
        };

        let difference = i32::from(*sample) - prediction;
        let category = 32 - difference.unsigned_abs().leading_zeros();
        let (code, length) = codes[category as usize];
        writer.write(code, length);

        if category > 0 {
            let bits = if difference < 0 {
                difference + (1 << category) - 1
            } else {
                difference
            };
            writer.write(bits as u32, category);
        }
    }

    writer.flush();
    out.extend(writer.data);
    out.extend([0xff, 0xd9]);
    out
}

fn pattern(len: usize, precision: u8) -> Vec<u16> {
    let mask = (1 << precision) - 1;

    (0..len)
        .map(|i| ((i * 37 + (i % 3) * 1000) & mask) as u16)
        .collect()
}

fn seeded() -> LoadSettings {
    LoadSettings {
        noise_seed: Some(42),
        ..LoadSettings::default()
    }
}

fn gray(image: &DicomImage) -> Vec<u8> {
    image.display.data.chunks_exact(4).map(|p| p[0]).collect()
}

#[test]
fn no_pixel_data_gives_placeholder() {
    let data = Writer::new()
        .string(Tag::PATIENT_NAME, b"PN", "DOE^JOHN")
        .finish();

    let image = load(&data, &seeded()).unwrap();

    assert!(image.placeholder);
    assert!(image.pixel_data.is_none());
    assert_eq!((image.width(), image.height()), (512, 512));
    assert_eq!(image.display.data.len(), 512 * 512 * 4);
    assert_eq!(image.metadata.patient_name.as_deref(), Some("DOE^JOHN"));

    for px in image.display.data.chunks_exact(4) {
        assert!(px[0] < 50);
        assert_eq!(px[3], 255);
    }
}

#[test]
fn placeholder_is_deterministic_with_seed() {
    let data = Writer::new().dimensions(8, 8).finish();

    let a = load(&data, &seeded()).unwrap();
    let b = load(&data, &seeded()).unwrap();

    assert_eq!(a.display, b.display);
    assert_eq!((a.width(), a.height()), (8, 8));
}

#[test]
fn missing_pixel_data_can_be_an_error() {
    let data = Writer::new().dimensions(8, 8).finish();
    let settings = LoadSettings {
        missing_pixels: MissingPixelPolicy::Error,
        ..LoadSettings::default()
    };

    assert_eq!(load(&data, &settings).unwrap_err(), LoadError::MissingPixelData);
}

#[test]
fn metadata() {
    let data = Writer::new()
        .transfer_syntax(TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN)
        .string(Tag::STUDY_DATE, b"DA", "20240131")
        .string(Tag::MODALITY, b"CS", "CT")
        .string(Tag::INSTITUTION_NAME, b"LO", "General Hospital")
        .string(Tag::PATIENT_NAME, b"PN", "DOE^JANE")
        .string(Tag::PATIENT_ID, b"LO", "12345")
        .string(Tag::PATIENT_SEX, b"CS", "F")
        .string(Tag::SLICE_THICKNESS, b"DS", "2.5")
        .string(Tag::SERIES_NUMBER, b"IS", "4")
        .string(Tag::PHOTOMETRIC_INTERPRETATION, b"CS", "MONOCHROME2")
        .dimensions(4, 6)
        .string(Tag::PIXEL_SPACING, b"DS", "0.5\\0.6")
        .us(Tag::BITS_ALLOCATED, 16)
        .us(Tag::BITS_STORED, 12)
        .us(Tag::HIGH_BIT, 11)
        .us(Tag::PIXEL_REPRESENTATION, 0)
        .string(Tag::WINDOW_CENTER, b"DS", "50\\400")
        .string(Tag::WINDOW_WIDTH, b"DS", "350\\1500")
        .string(Tag::RESCALE_INTERCEPT, b"DS", "-1024")
        .string(Tag::RESCALE_SLOPE, b"DS", "1")
        .finish();

    let image = load(&data, &seeded()).unwrap();
    let m = &image.metadata;

    assert_eq!(
        m.transfer_syntax_uid.as_deref(),
        Some(TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN)
    );
    assert_eq!(m.study_date.as_deref(), Some("20240131"));
    assert_eq!(m.modality.as_deref(), Some("CT"));
    assert_eq!(m.institution_name.as_deref(), Some("General Hospital"));
    assert_eq!(m.patient_name.as_deref(), Some("DOE^JANE"));
    assert_eq!(m.patient_id.as_deref(), Some("12345"));
    assert_eq!(m.patient_sex.as_deref(), Some("F"));
    assert_eq!(m.slice_thickness, Some(2.5));
    assert_eq!(m.series_number, Some(4));
    assert_eq!(m.photometric_interpretation.as_deref(), Some("MONOCHROME2"));
    assert_eq!((m.rows, m.columns), (Some(4), Some(6)));
    assert_eq!(m.bits_allocated, Some(16));
    assert_eq!(m.bits_stored, Some(12));
    assert_eq!(m.high_bit, Some(11));
    assert_eq!(m.pixel_representation, Some(0));
    assert_eq!(m.window_center, Some(50.0));
    assert_eq!(m.window_width, Some(350.0));
    assert_eq!(m.rescale_intercept, Some(-1024.0));
    assert_eq!(m.rescale_slope, Some(1.0));

    let spacing = Some(PixelSpacing {
        row: 0.5,
        column: 0.6,
    });
    assert_eq!(image.pixel_spacing, spacing);
    assert_eq!((image.width(), image.height()), (6, 4));
}

#[test]
fn native_signed_with_rescale() {
    let stored: [i16; 4] = [924, 1024, 1124, 2000];
    let bytes: Vec<u8> = stored.iter().flat_map(|s| s.to_le_bytes()).collect();

    let data = Writer::new()
        .transfer_syntax(TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN)
        .dimensions(2, 2)
        .us(Tag::BITS_ALLOCATED, 16)
        .us(Tag::PIXEL_REPRESENTATION, 1)
        .string(Tag::WINDOW_CENTER, b"DS", "0")
        .string(Tag::WINDOW_WIDTH, b"DS", "200")
        .string(Tag::RESCALE_INTERCEPT, b"DS", "-1024")
        .element(Tag::PIXEL_DATA, b"OW", &bytes)
        .finish();

    let image = load(&data, &seeded()).unwrap();

    assert!(!image.placeholder);
    assert_eq!(image.pixel_data, Some(PixelData::Signed16(stored.to_vec())));
    assert_eq!(gray(&image), vec![0, 128, 255, 255]);
    assert_eq!(image.checksum, lumen_ljpeg::crc32(&data));
}

#[test]
fn window_override_and_render() {
    let data = Writer::new()
        .dimensions(1, 3)
        .native_u16(&[0, 100, 200])
        .finish();

    let settings = LoadSettings {
        window: Some(Window {
            center: 100.0,
            width: 100.0,
        }),
        ..seeded()
    };

    let image = load(&data, &settings).unwrap();
    assert_eq!(gray(&image), vec![0, 128, 255]);

    let wide = image
        .render(Window {
            center: 100.0,
            width: 400.0,
        })
        .unwrap();
    let values: Vec<u8> = wide.data.chunks_exact(4).map(|p| p[0]).collect();
    assert_eq!(values, vec![64, 128, 191]);
}

#[test]
fn implicit_vr_data_set() {
    let data = Writer::new()
        .transfer_syntax(TransferSyntax::IMPLICIT_VR_LITTLE_ENDIAN)
        .dimensions(1, 4)
        .us(Tag::BITS_ALLOCATED, 8)
        .string(Tag::MODALITY, b"CS", "MR")
        .element(Tag::PIXEL_DATA, b"OB", &[1, 2, 3, 4])
        .finish();

    let image = load(&data, &seeded()).unwrap();

    assert_eq!(image.metadata.modality.as_deref(), Some("MR"));
    assert_eq!(image.pixel_data, Some(PixelData::Unsigned8(vec![1, 2, 3, 4])));
    assert_eq!((image.width(), image.height()), (4, 1));
}

#[test]
fn data_set_without_preamble() {
    let data = Writer::bare()
        .dimensions(1, 2)
        .native_u16(&[7, 9])
        .finish();

    let image = load(&data, &seeded()).unwrap();
    assert_eq!(image.pixel_data, Some(PixelData::Unsigned16(vec![7, 9])));
}

#[test]
fn sequences_are_skipped() {
    let mut writer = Writer::new()
        .transfer_syntax(TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN)
        .string(Tag::MODALITY, b"CS", "CT");

    writer.explicit_header(Tag(0x0008, 0x1115), b"SQ", UNDEFINED_LENGTH);
    writer.tag(Tag::ITEM);
    writer.data.extend_from_slice(&UNDEFINED_LENGTH.to_le_bytes());
    let mut writer = writer.dimensions(7, 7);
    writer.tag(Tag::ITEM_DELIMITATION);
    writer.data.extend_from_slice(&0u32.to_le_bytes());
    writer.tag(Tag::SEQUENCE_DELIMITATION);
    writer.data.extend_from_slice(&0u32.to_le_bytes());

    let data = writer.dimensions(2, 3).finish();
    let image = load(&data, &seeded()).unwrap();

    assert_eq!(image.metadata.modality.as_deref(), Some("CT"));
    assert_eq!((image.metadata.rows, image.metadata.columns), (Some(2), Some(3)));
}

#[test]
fn truncated_file_keeps_metadata() {
    let mut data = Writer::new()
        .string(Tag::PATIENT_NAME, b"PN", "DOE^JOHN")
        .dimensions(4, 4)
        .native_u16(&[0; 16])
        .finish();
    data.truncate(data.len() - 10);

    let image = load(&data, &seeded()).unwrap();

    assert!(image.placeholder);
    assert_eq!(image.metadata.patient_name.as_deref(), Some("DOE^JOHN"));
    assert_eq!((image.width(), image.height()), (4, 4));
}

#[test]
fn jpeg_lossless() {
    let samples = pattern(5 * 4, 12);
    let data = Writer::new()
        .transfer_syntax(TransferSyntax::JPEG_LOSSLESS)
        .dimensions(4, 5)
        .us(Tag::BITS_ALLOCATED, 16)
        .us(Tag::BITS_STORED, 12)
        .us(Tag::PIXEL_REPRESENTATION, 0)
        .string(Tag::WINDOW_CENTER, b"DS", "2048")
        .string(Tag::WINDOW_WIDTH, b"DS", "4096")
        .encapsulated(&lossless_jpeg(5, 4, 12, &samples))
        .finish();

    let image = load(&data, &seeded()).unwrap();

    assert!(!image.placeholder);
    assert_eq!(image.pixel_data, Some(PixelData::Unsigned16(samples.clone())));

    let expected: Vec<u8> = samples
        .iter()
        .map(|s| (f64::from(*s) / 4096.0 * 255.0).round() as u8)
        .collect();
    assert_eq!(gray(&image), expected);
}

#[test]
fn jpeg_lossless_signed() {
    let samples: [u16; 4] = [0x0fff, 0x0800, 0x07ff, 0x0000];
    let data = Writer::new()
        .transfer_syntax(TransferSyntax::JPEG_LOSSLESS)
        .dimensions(2, 2)
        .us(Tag::PIXEL_REPRESENTATION, 1)
        .encapsulated(&lossless_jpeg(2, 2, 12, &samples))
        .finish();

    let image = load(&data, &seeded()).unwrap();

    assert_eq!(
        image.pixel_data,
        Some(PixelData::Signed16(vec![-1, -2048, 2047, 0]))
    );
}

#[test]
fn corrupt_jpeg_is_fatal() {
    let data = Writer::new()
        .transfer_syntax(TransferSyntax::JPEG_LOSSLESS)
        .dimensions(2, 2)
        .encapsulated(&[0x12; 10])
        .finish();

    assert_eq!(
        load(&data, &seeded()).unwrap_err(),
        LoadError::Codec(DecodeError::NotAJpeg)
    );
}

#[test]
fn unsupported_compression_gives_placeholder() {
    let data = Writer::new()
        .transfer_syntax("1.2.840.10008.1.2.4.50")
        .dimensions(2, 2)
        .encapsulated(&[0xff, 0xd8, 0xff, 0xd9])
        .finish();

    let image = load(&data, &seeded()).unwrap();

    assert!(image.placeholder);
    assert!(image.pixel_data.is_none());
}

#[test]
fn oversized_image() {
    let data = Writer::new().dimensions(0xffff, 0xffff).finish();

    assert_eq!(
        load(&data, &seeded()).unwrap_err(),
        LoadError::ImageTooLarge {
            width: 0xffff,
            height: 0xffff
        }
    );
}

#[cfg(feature = "image")]
#[test]
fn image_integration() {
    use image::ImageDecoder;

    let data = Writer::new()
        .dimensions(1, 2)
        .native_u16(&[0, 1000])
        .finish();
    let image = load(&data, &seeded()).unwrap();

    let rgba = image.to_rgba_image().unwrap();
    assert_eq!(rgba.dimensions(), (2, 1));
    assert_eq!(rgba.get_pixel(1, 0).0, [255, 255, 255, 255]);

    assert_eq!(image.dimensions(), (2, 1));
    assert_eq!(image.color_type(), image::ColorType::Rgba8);

    let expected = image.display.data.clone();
    let mut buf = vec![0; expected.len()];
    image.read_image(&mut buf).unwrap();
    assert_eq!(buf, expected);
}
