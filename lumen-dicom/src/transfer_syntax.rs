//! Transfer syntaxes.

/// The encoding of a data set and its pixel data, as named by the transfer
/// syntax UID of the file meta information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferSyntax {
    /// Implicit VR little endian, `1.2.840.10008.1.2`.
    ImplicitVrLittleEndian,
    /// Explicit VR little endian, `1.2.840.10008.1.2.1`.
    ExplicitVrLittleEndian,
    /// JPEG lossless, non-hierarchical, first-order prediction,
    /// `1.2.840.10008.1.2.4.70`.
    JpegLossless,
    /// Any other transfer syntax. The data set is read as explicit VR little
    /// endian.
    Other,
}

impl TransferSyntax {
    /// The UID of implicit VR little endian.
    pub const IMPLICIT_VR_LITTLE_ENDIAN: &'static str = "1.2.840.10008.1.2";
    /// The UID of explicit VR little endian.
    pub const EXPLICIT_VR_LITTLE_ENDIAN: &'static str = "1.2.840.10008.1.2.1";
    /// The UID of JPEG lossless with first-order prediction.
    pub const JPEG_LOSSLESS: &'static str = "1.2.840.10008.1.2.4.70";

    /// Identify a transfer syntax by its UID.
    pub fn from_uid(uid: &str) -> Self {
        match uid.trim_end_matches(['\0', ' ']) {
            Self::IMPLICIT_VR_LITTLE_ENDIAN => Self::ImplicitVrLittleEndian,
            Self::EXPLICIT_VR_LITTLE_ENDIAN => Self::ExplicitVrLittleEndian,
            Self::JPEG_LOSSLESS => Self::JpegLossless,
            _ => Self::Other,
        }
    }

    /// Whether elements of the data set omit their value representation.
    pub fn is_implicit_vr(self) -> bool {
        self == Self::ImplicitVrLittleEndian
    }

    /// Whether the pixel data is encapsulated lossless JPEG.
    pub fn is_jpeg_lossless(self) -> bool {
        self == Self::JpegLossless
    }
}
