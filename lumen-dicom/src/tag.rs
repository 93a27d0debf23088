//! Data element tags and the metadata fields they map to.

/// A data element tag, made up of a group and an element number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(pub u16, pub u16);

#[allow(missing_docs)]
impl Tag {
    pub const TRANSFER_SYNTAX_UID: Self = Self(0x0002, 0x0010);

    pub const STUDY_DATE: Self = Self(0x0008, 0x0020);
    pub const SERIES_DATE: Self = Self(0x0008, 0x0021);
    pub const STUDY_TIME: Self = Self(0x0008, 0x0030);
    pub const SERIES_TIME: Self = Self(0x0008, 0x0031);
    pub const ACCESSION_NUMBER: Self = Self(0x0008, 0x0050);
    pub const MODALITY: Self = Self(0x0008, 0x0060);
    pub const INSTITUTION_NAME: Self = Self(0x0008, 0x0080);
    pub const STUDY_DESCRIPTION: Self = Self(0x0008, 0x1030);
    pub const SERIES_DESCRIPTION: Self = Self(0x0008, 0x103E);

    pub const PATIENT_NAME: Self = Self(0x0010, 0x0010);
    pub const PATIENT_ID: Self = Self(0x0010, 0x0020);
    pub const PATIENT_BIRTH_DATE: Self = Self(0x0010, 0x0030);
    pub const PATIENT_SEX: Self = Self(0x0010, 0x0040);
    pub const PATIENT_AGE: Self = Self(0x0010, 0x1010);

    pub const SLICE_THICKNESS: Self = Self(0x0018, 0x0050);

    pub const STUDY_INSTANCE_UID: Self = Self(0x0020, 0x000D);
    pub const SERIES_INSTANCE_UID: Self = Self(0x0020, 0x000E);
    pub const SERIES_NUMBER: Self = Self(0x0020, 0x0011);
    pub const INSTANCE_NUMBER: Self = Self(0x0020, 0x0013);
    pub const IMAGE_POSITION_PATIENT: Self = Self(0x0020, 0x0032);
    pub const IMAGE_ORIENTATION_PATIENT: Self = Self(0x0020, 0x0037);
    pub const SLICE_LOCATION: Self = Self(0x0020, 0x1041);

    pub const SAMPLES_PER_PIXEL: Self = Self(0x0028, 0x0002);
    pub const PHOTOMETRIC_INTERPRETATION: Self = Self(0x0028, 0x0004);
    pub const ROWS: Self = Self(0x0028, 0x0010);
    pub const COLUMNS: Self = Self(0x0028, 0x0011);
    pub const PIXEL_SPACING: Self = Self(0x0028, 0x0030);
    pub const BITS_ALLOCATED: Self = Self(0x0028, 0x0100);
    pub const BITS_STORED: Self = Self(0x0028, 0x0101);
    pub const HIGH_BIT: Self = Self(0x0028, 0x0102);
    pub const PIXEL_REPRESENTATION: Self = Self(0x0028, 0x0103);
    pub const WINDOW_CENTER: Self = Self(0x0028, 0x1050);
    pub const WINDOW_WIDTH: Self = Self(0x0028, 0x1051);
    pub const RESCALE_INTERCEPT: Self = Self(0x0028, 0x1052);
    pub const RESCALE_SLOPE: Self = Self(0x0028, 0x1053);

    pub const PIXEL_DATA: Self = Self(0x7FE0, 0x0010);

    pub const ITEM: Self = Self(0xFFFE, 0xE000);
    pub const ITEM_DELIMITATION: Self = Self(0xFFFE, 0xE00D);
    pub const SEQUENCE_DELIMITATION: Self = Self(0xFFFE, 0xE0DD);
}

impl Tag {
    /// The group of the file meta information.
    pub const META_GROUP: u16 = 0x0002;
    /// The group of items and delimiters, which never carry a VR.
    pub const ITEM_GROUP: u16 = 0xFFFE;
}

impl core::fmt::Display for Tag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

/// The elements the scanner acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    TransferSyntaxUid,
    PatientName,
    PatientId,
    PatientBirthDate,
    PatientSex,
    PatientAge,
    StudyDate,
    StudyTime,
    StudyDescription,
    StudyInstanceUid,
    AccessionNumber,
    InstitutionName,
    SeriesDate,
    SeriesTime,
    SeriesDescription,
    SeriesInstanceUid,
    SeriesNumber,
    Modality,
    InstanceNumber,
    SliceThickness,
    SliceLocation,
    ImagePosition,
    ImageOrientation,
    SamplesPerPixel,
    PhotometricInterpretation,
    Rows,
    Columns,
    PixelSpacing,
    BitsAllocated,
    BitsStored,
    HighBit,
    PixelRepresentation,
    WindowCenter,
    WindowWidth,
    RescaleIntercept,
    RescaleSlope,
    PixelData,
}

impl Field {
    pub(crate) fn from_tag(tag: Tag) -> Option<Self> {
        let field = match tag {
            Tag::TRANSFER_SYNTAX_UID => Self::TransferSyntaxUid,
            Tag::PATIENT_NAME => Self::PatientName,
            Tag::PATIENT_ID => Self::PatientId,
            Tag::PATIENT_BIRTH_DATE => Self::PatientBirthDate,
            Tag::PATIENT_SEX => Self::PatientSex,
            Tag::PATIENT_AGE => Self::PatientAge,
            Tag::STUDY_DATE => Self::StudyDate,
            Tag::STUDY_TIME => Self::StudyTime,
            Tag::STUDY_DESCRIPTION => Self::StudyDescription,
            Tag::STUDY_INSTANCE_UID => Self::StudyInstanceUid,
            Tag::ACCESSION_NUMBER => Self::AccessionNumber,
            Tag::INSTITUTION_NAME => Self::InstitutionName,
            Tag::SERIES_DATE => Self::SeriesDate,
            Tag::SERIES_TIME => Self::SeriesTime,
            Tag::SERIES_DESCRIPTION => Self::SeriesDescription,
            Tag::SERIES_INSTANCE_UID => Self::SeriesInstanceUid,
            Tag::SERIES_NUMBER => Self::SeriesNumber,
            Tag::MODALITY => Self::Modality,
            Tag::INSTANCE_NUMBER => Self::InstanceNumber,
            Tag::SLICE_THICKNESS => Self::SliceThickness,
            Tag::SLICE_LOCATION => Self::SliceLocation,
            Tag::IMAGE_POSITION_PATIENT => Self::ImagePosition,
            Tag::IMAGE_ORIENTATION_PATIENT => Self::ImageOrientation,
            Tag::SAMPLES_PER_PIXEL => Self::SamplesPerPixel,
            Tag::PHOTOMETRIC_INTERPRETATION => Self::PhotometricInterpretation,
            Tag::ROWS => Self::Rows,
            Tag::COLUMNS => Self::Columns,
            Tag::PIXEL_SPACING => Self::PixelSpacing,
            Tag::BITS_ALLOCATED => Self::BitsAllocated,
            Tag::BITS_STORED => Self::BitsStored,
            Tag::HIGH_BIT => Self::HighBit,
            Tag::PIXEL_REPRESENTATION => Self::PixelRepresentation,
            Tag::WINDOW_CENTER => Self::WindowCenter,
            Tag::WINDOW_WIDTH => Self::WindowWidth,
            Tag::RESCALE_INTERCEPT => Self::RescaleIntercept,
            Tag::RESCALE_SLOPE => Self::RescaleSlope,
            Tag::PIXEL_DATA => Self::PixelData,
            _ => return None,
        };

        Some(field)
    }
}
