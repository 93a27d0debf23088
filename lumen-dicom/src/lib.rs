/*!
A memory-safe, pure-Rust reader for single-frame DICOM images.

`lumen-dicom` scans the data set of a DICOM file, extracts the attributes
needed to identify and display the image, and renders the pixel data into an
8-bit RGBA buffer using the rescale and window described by the file.

Native (uncompressed) pixel data with 8 or 16 bits allocated is supported, as
is encapsulated pixel data in the JPEG lossless transfer syntax
(`1.2.840.10008.1.2.4.70`), which is decoded with [`lumen_ljpeg`]. Sequences
are skipped, and only the first frame is read.

# Example
```rust,no_run
use lumen_dicom::{LoadSettings, load};

let data = std::fs::read("image.dcm").unwrap();
let image = load(&data, &LoadSettings::default()).unwrap();

println!("{:?}", image.metadata.patient_name);
println!("{}x{}", image.display.width, image.display.height);
```

# Missing pixel data
If a file has no pixel data that can be read, [`load`] returns a placeholder
image of low-amplitude noise by default, and marks it with
[`DicomImage::placeholder`]. Use [`MissingPixelPolicy::Error`] to get an
error instead.

# Cargo features
This crate has one optional feature:
- `image`: Implements `ImageDecoder` for [`DicomImage`] and allows registering
  a decoding hook with the `image` crate.

# Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

use log::{debug, warn};

mod display;
mod encapsulated;
mod error;
#[cfg(feature = "image")]
mod integration;
mod metadata;
mod pixel;
mod reader;
mod scanner;
mod tag;
mod transfer_syntax;
mod vr;

pub use display::{DisplayImage, Rescale, Window, noise, render};
pub use encapsulated::extract_frame;
pub use error::{LoadError, Result};
#[cfg(feature = "image")]
pub use integration::register_decoding_hook;
pub use metadata::{DEFAULT_DIMENSION, DicomMetadata, PixelSpacing};
pub use pixel::PixelData;
pub use scanner::{PixelDataElement, ScanResult, has_preamble, scan};
pub use tag::Tag;
pub use transfer_syntax::TransferSyntax;

use error::bail;

/// The default limit on the number of pixels of an image.
pub const DEFAULT_MAX_PIXELS: u64 = 1 << 26;

/// What to do if a file has no pixel data that can be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingPixelPolicy {
    /// Return a placeholder image of random noise.
    #[default]
    Noise,
    /// Return [`LoadError::MissingPixelData`].
    Error,
}

/// Settings to apply while loading.
#[derive(Debug, Clone, Copy)]
pub struct LoadSettings {
    /// What to do if a file has no pixel data that can be read.
    pub missing_pixels: MissingPixelPolicy,
    /// The seed for the placeholder noise. Random if `None`.
    pub noise_seed: Option<u64>,
    /// A window that replaces the one described by the file.
    pub window: Option<Window>,
    /// The largest number of pixels to allocate a display image for.
    pub max_pixels: u64,
    /// Settings for decoding lossless JPEG pixel data.
    pub codec: lumen_ljpeg::DecodeSettings,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            missing_pixels: MissingPixelPolicy::default(),
            noise_seed: None,
            window: None,
            max_pixels: DEFAULT_MAX_PIXELS,
            codec: lumen_ljpeg::DecodeSettings::default(),
        }
    }
}

/// A loaded DICOM image.
#[derive(Debug, Clone)]
pub struct DicomImage {
    /// The recognized attributes, with defaults applied.
    pub metadata: DicomMetadata,
    /// The physical pixel spacing, if the file declares it.
    pub pixel_spacing: Option<PixelSpacing>,
    /// The stored samples, if they could be read.
    pub pixel_data: Option<PixelData>,
    /// The number of samples per pixel in `pixel_data`.
    pub samples_per_pixel: u16,
    /// The image, rendered with the file's rescale and window, or the
    /// placeholder.
    pub display: DisplayImage,
    /// Whether `display` is a placeholder because no pixel data could be read.
    pub placeholder: bool,
    /// The CRC-32 of the input, for use as a cache key.
    pub checksum: u32,
}

impl DicomImage {
    /// The width of the image in pixels.
    pub fn width(&self) -> u32 {
        self.display.width
    }

    /// The height of the image in pixels.
    pub fn height(&self) -> u32 {
        self.display.height
    }

    /// Render the stored samples again with a different window.
    ///
    /// Returns `None` for placeholder images.
    pub fn render(&self, window: Window) -> Option<DisplayImage> {
        let pixels = self.pixel_data.as_ref()?;

        Some(render(
            pixels,
            self.metadata.rescale(),
            window,
            self.width(),
            self.height(),
            self.samples_per_pixel,
        ))
    }
}

/// Load a DICOM file.
///
/// Truncated files yield the attributes and pixel data found before the
/// truncation. Errors in encapsulated lossless JPEG data are fatal.
pub fn load(data: &[u8], settings: &LoadSettings) -> Result<DicomImage> {
    let ScanResult {
        mut metadata,
        pixel_data: element,
        truncated,
    } = scan(data);

    if truncated {
        debug!("loading attributes of a truncated data set");
    }

    metadata.apply_defaults();

    let width = metadata.width();
    let height = metadata.height();

    if u64::from(width) * u64::from(height) > settings.max_pixels {
        bail!(LoadError::ImageTooLarge { width, height });
    }

    let mut samples_per_pixel = metadata.samples_per_pixel.unwrap_or(1).max(1);

    let pixel_data = match element {
        Some(element) if element.is_jpeg_lossless() => {
            match extract_frame(data, element.offset) {
                Some(frame) => {
                    let image = lumen_ljpeg::decode(frame, &settings.codec)?;

                    if u32::from(image.width) != width || u32::from(image.height) != height {
                        warn!(
                            "decoded size {}x{} differs from declared size {width}x{height}",
                            image.width, image.height
                        );
                    }

                    samples_per_pixel = u16::try_from(image.num_components).unwrap_or(1);

                    PixelData::from_decoded(image, element.is_signed())
                }
                None => {
                    warn!("encapsulated pixel data has no fragment");

                    None
                }
            }
        }
        Some(PixelDataElement {
            value: Some(value),
            bits_allocated,
            pixel_representation,
            ..
        }) => {
            let pixels = PixelData::from_raw(value, bits_allocated, pixel_representation);

            if pixels.is_none() && !value.is_empty() {
                warn!("unsupported bits allocated: {bits_allocated}");
            }

            pixels
        }
        _ => None,
    };

    let rescale = metadata.rescale();
    let window = settings.window.unwrap_or_else(|| metadata.window());

    let (display, placeholder) = match &pixel_data {
        Some(pixels) => {
            let expected = width as usize * height as usize * usize::from(samples_per_pixel);

            if pixels.len() < expected {
                warn!(
                    "pixel data has {} samples, expected {expected}",
                    pixels.len()
                );
            }

            let display = render(pixels, rescale, window, width, height, samples_per_pixel);

            (display, false)
        }
        None => match settings.missing_pixels {
            MissingPixelPolicy::Error => bail!(LoadError::MissingPixelData),
            MissingPixelPolicy::Noise => {
                warn!("no pixel data could be read, using a placeholder");

                (noise(width, height, settings.noise_seed), true)
            }
        },
    };

    Ok(DicomImage {
        pixel_spacing: metadata.pixel_spacing,
        metadata,
        pixel_data,
        samples_per_pixel,
        display,
        placeholder,
        checksum: lumen_ljpeg::crc32(data),
    })
}
