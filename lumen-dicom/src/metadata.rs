//! The metadata record extracted from a data set.

use crate::display::{Rescale, Window};
use crate::tag::Field;

/// The default number of rows and columns.
pub const DEFAULT_DIMENSION: u16 = 512;

/// The physical distance between the centers of adjacent pixels, in mm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSpacing {
    /// The spacing between adjacent rows.
    pub row: f64,
    /// The spacing between adjacent columns.
    pub column: f64,
}

/// The recognized attributes of a data set.
///
/// Attributes that are absent from the data set, or whose value cannot be
/// interpreted, are `None`. Call [`DicomMetadata::apply_defaults`] to fill in
/// the attributes that rendering depends on.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(missing_docs)]
pub struct DicomMetadata {
    pub patient_name: Option<String>,
    pub patient_id: Option<String>,
    pub patient_birth_date: Option<String>,
    pub patient_sex: Option<String>,
    pub patient_age: Option<String>,
    pub study_date: Option<String>,
    pub study_time: Option<String>,
    pub study_description: Option<String>,
    pub study_instance_uid: Option<String>,
    pub accession_number: Option<String>,
    pub institution_name: Option<String>,
    pub series_date: Option<String>,
    pub series_time: Option<String>,
    pub series_description: Option<String>,
    pub series_instance_uid: Option<String>,
    pub series_number: Option<i32>,
    pub modality: Option<String>,
    pub rows: Option<u16>,
    pub columns: Option<u16>,
    pub pixel_spacing: Option<PixelSpacing>,
    pub slice_thickness: Option<f64>,
    pub slice_location: Option<f64>,
    pub image_position: Option<[f64; 3]>,
    pub image_orientation: Option<[f64; 6]>,
    pub instance_number: Option<i32>,
    pub samples_per_pixel: Option<u16>,
    pub photometric_interpretation: Option<String>,
    pub bits_allocated: Option<u16>,
    pub bits_stored: Option<u16>,
    pub high_bit: Option<u16>,
    pub pixel_representation: Option<u16>,
    pub window_center: Option<f64>,
    pub window_width: Option<f64>,
    pub rescale_intercept: Option<f64>,
    pub rescale_slope: Option<f64>,
    pub transfer_syntax_uid: Option<String>,
}

impl DicomMetadata {
    /// Store the value of an element.
    pub(crate) fn set(&mut self, field: Field, value: &[u8]) {
        match field {
            Field::TransferSyntaxUid => self.transfer_syntax_uid = text(value),
            Field::PatientName => self.patient_name = text(value),
            Field::PatientId => self.patient_id = text(value),
            Field::PatientBirthDate => self.patient_birth_date = text(value),
            Field::PatientSex => self.patient_sex = text(value),
            Field::PatientAge => self.patient_age = text(value),
            Field::StudyDate => self.study_date = text(value),
            Field::StudyTime => self.study_time = text(value),
            Field::StudyDescription => self.study_description = text(value),
            Field::StudyInstanceUid => self.study_instance_uid = text(value),
            Field::AccessionNumber => self.accession_number = text(value),
            Field::InstitutionName => self.institution_name = text(value),
            Field::SeriesDate => self.series_date = text(value),
            Field::SeriesTime => self.series_time = text(value),
            Field::SeriesDescription => self.series_description = text(value),
            Field::SeriesInstanceUid => self.series_instance_uid = text(value),
            Field::SeriesNumber => self.series_number = integer(value).filter(|n| *n != 0),
            Field::Modality => self.modality = text(value),
            Field::InstanceNumber => self.instance_number = integer(value),
            Field::SliceThickness => self.slice_thickness = decimal(value),
            Field::SliceLocation => self.slice_location = decimal(value),
            Field::ImagePosition => self.image_position = decimals(value),
            Field::ImageOrientation => self.image_orientation = decimals(value),
            Field::SamplesPerPixel => self.samples_per_pixel = unsigned(value),
            Field::PhotometricInterpretation => self.photometric_interpretation = text(value),
            Field::Rows => self.rows = unsigned(value),
            Field::Columns => self.columns = unsigned(value),
            Field::PixelSpacing => {
                self.pixel_spacing = decimals(value).map(|[row, column]| PixelSpacing { row, column });
            }
            Field::BitsAllocated => self.bits_allocated = unsigned(value),
            Field::BitsStored => self.bits_stored = unsigned(value),
            Field::HighBit => self.high_bit = unsigned(value),
            Field::PixelRepresentation => self.pixel_representation = unsigned(value),
            Field::WindowCenter => self.window_center = decimal(value),
            Field::WindowWidth => self.window_width = decimal(value),
            Field::RescaleIntercept => self.rescale_intercept = decimal(value),
            Field::RescaleSlope => self.rescale_slope = decimal(value),
            // Handled by the scanner.
            Field::PixelData => {}
        }
    }

    /// Fill in the attributes that rendering depends on.
    ///
    /// Missing or zero dimensions become 512, a missing window becomes a
    /// center of 40 with a width of 400, and a missing or zero rescale slope
    /// becomes 1 with an intercept of 0. A window width that is not positive
    /// is replaced as well.
    pub fn apply_defaults(&mut self) {
        let window = Window::default();
        let rescale = Rescale::default();

        if self.rows.is_none_or(|r| r == 0) {
            self.rows = Some(DEFAULT_DIMENSION);
        }

        if self.columns.is_none_or(|c| c == 0) {
            self.columns = Some(DEFAULT_DIMENSION);
        }

        self.window_center.get_or_insert(window.center);

        if self.window_width.is_none_or(|w| w <= 0.0) {
            self.window_width = Some(window.width);
        }

        if self.rescale_slope.is_none_or(|s| s == 0.0) {
            self.rescale_slope = Some(rescale.slope);
        }

        self.rescale_intercept.get_or_insert(rescale.intercept);
    }

    /// The number of columns, or the default if it is unknown.
    pub fn width(&self) -> u32 {
        u32::from(self.columns.filter(|c| *c != 0).unwrap_or(DEFAULT_DIMENSION))
    }

    /// The number of rows, or the default if it is unknown.
    pub fn height(&self) -> u32 {
        u32::from(self.rows.filter(|r| *r != 0).unwrap_or(DEFAULT_DIMENSION))
    }

    /// The modality transform described by the data set.
    pub fn rescale(&self) -> Rescale {
        let default = Rescale::default();

        Rescale {
            slope: self.rescale_slope.filter(|s| *s != 0.0).unwrap_or(default.slope),
            intercept: self.rescale_intercept.unwrap_or(default.intercept),
        }
    }

    /// The window described by the data set.
    pub fn window(&self) -> Window {
        let default = Window::default();

        Window {
            center: self.window_center.unwrap_or(default.center),
            width: self.window_width.filter(|w| *w > 0.0).unwrap_or(default.width),
        }
    }
}

/// Decode a string value, dropping NUL padding and surrounding whitespace.
fn text(value: &[u8]) -> Option<String> {
    let s = String::from_utf8_lossy(value);
    let s = s.replace('\0', "");
    let s = s.trim();

    (!s.is_empty()).then(|| s.to_string())
}

fn first_value(value: &[u8]) -> Option<String> {
    text(value)?.split('\\').next().map(|p| p.trim().to_string())
}

fn decimal(value: &[u8]) -> Option<f64> {
    first_value(value)?.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn decimals<const N: usize>(value: &[u8]) -> Option<[f64; N]> {
    let s = text(value)?;
    let mut parts = s.split('\\');
    let mut out = [0.0; N];

    for slot in &mut out {
        *slot = parts
            .next()?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())?;
    }

    Some(out)
}

fn integer(value: &[u8]) -> Option<i32> {
    let first = first_value(value)?;

    first.parse::<i32>().ok().or_else(|| {
        // Some writers store integer strings with a fractional part.
        first
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i32)
    })
}

fn unsigned(value: &[u8]) -> Option<u16> {
    match value {
        [a, b, ..] => Some(u16::from_le_bytes([*a, *b])),
        _ => None,
    }
}
