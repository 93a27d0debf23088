//! Integration with the [image] crate

use std::ffi::OsStr;
use std::io::{BufRead, Seek};

use crate::{DicomImage, LoadError, LoadSettings, MissingPixelPolicy};
use ::image::error::{DecodingError, ImageFormatHint};
use ::image::{ColorType, ImageDecoder, ImageError, ImageResult, RgbaImage};
use image::hooks::decoding_hook_registered;

impl DicomImage {
    /// Copy the display image into an [`RgbaImage`].
    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width(), self.height(), self.display.data.clone())
    }
}

impl ImageDecoder for DicomImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn color_type(&self) -> ColorType {
        ColorType::Rgba8
    }

    fn read_image(self, buf: &mut [u8]) -> ImageResult<()>
    where
        Self: Sized,
    {
        copy_display(&self, buf)
    }

    fn read_image_boxed(self: Box<Self>, buf: &mut [u8]) -> ImageResult<()> {
        copy_display(&self, buf)
    }
}

fn copy_display(image: &DicomImage, buf: &mut [u8]) -> ImageResult<()> {
    let data = &image.display.data;

    if buf.len() != data.len() {
        return Err(ImageError::Decoding(DecodingError::new(
            ImageFormatHint::Name("DICOM".to_string()),
            "output buffer has the wrong size",
        )));
    }

    buf.copy_from_slice(data);

    Ok(())
}

/// Load a DICOM image from a reader, failing if it has no pixel data.
fn load_from<R: BufRead + Seek>(r: R) -> ImageResult<DicomImage> {
    let mut input = Vec::new();
    let mut r = r;
    r.read_to_end(&mut input)?;

    let settings = LoadSettings {
        missing_pixels: MissingPixelPolicy::Error,
        ..LoadSettings::default()
    };

    Ok(crate::load(&input, &settings)?)
}

impl From<LoadError> for DecodingError {
    fn from(value: LoadError) -> Self {
        let format = ImageFormatHint::Name("DICOM".to_owned());
        Self::new(format, value)
    }
}

impl From<LoadError> for ImageError {
    fn from(value: LoadError) -> Self {
        Self::Decoding(value.into())
    }
}

/// Registers the decoder with the `image` crate so that non-format-specific calls such as
/// `ImageReader::open("image.dcm")?.decode()?;` work with DICOM files.
///
/// Files without readable pixel data fail to decode instead of producing a
/// placeholder.
///
/// Returns `true` on success, or `false` if the hook for DICOM is already registered.
pub fn register_decoding_hook() -> bool {
    if decoding_hook_registered(OsStr::new("dcm")) {
        return false;
    }

    for extension in ["dcm", "dicom"] {
        image::hooks::register_decoding_hook(
            extension.into(),
            Box::new(|r| Ok(Box::new(load_from(r)?))),
        );
    }

    true
}
