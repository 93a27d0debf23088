//! Mapping stored samples to display intensities.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::pixel::PixelData;

/// The modality transform from stored values to output units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rescale {
    /// The factor applied to stored values.
    pub slope: f64,
    /// The offset added after scaling.
    pub intercept: f64,
}

impl Default for Rescale {
    fn default() -> Self {
        Self {
            slope: 1.0,
            intercept: 0.0,
        }
    }
}

impl Rescale {
    /// Map a stored value to output units.
    #[inline]
    pub fn apply(&self, sample: f64) -> f64 {
        sample * self.slope + self.intercept
    }
}

/// The range of values that is mapped linearly onto the display range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    /// The center of the window.
    pub center: f64,
    /// The width of the window.
    pub width: f64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            center: 40.0,
            width: 400.0,
        }
    }
}

impl Window {
    /// Map a value to a display intensity.
    ///
    /// Values at or below the lower edge of the window map to 0, values at or
    /// above the upper edge to 255.
    pub fn apply(&self, value: f64) -> u8 {
        let lower = self.center - self.width / 2.0;
        let upper = self.center + self.width / 2.0;

        if value <= lower {
            0
        } else if value >= upper {
            255
        } else {
            ((value - lower) / self.width * 255.0).round().clamp(0.0, 255.0) as u8
        }
    }
}

/// An 8-bit RGBA image, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayImage {
    /// The width in pixels.
    pub width: u32,
    /// The height in pixels.
    pub height: u32,
    /// The pixels, row-major, four bytes each.
    pub data: Vec<u8>,
}

impl DisplayImage {
    fn black(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;

        Self {
            width,
            height,
            data: [0, 0, 0, 255].repeat(len),
        }
    }
}

/// Render stored samples with the given transforms.
///
/// Pixels without a corresponding sample are black. With three samples per
/// pixel, each channel is windowed separately; with any other number greater
/// than one, only the first sample of each pixel is used.
pub fn render(
    pixels: &PixelData,
    rescale: Rescale,
    window: Window,
    width: u32,
    height: u32,
    samples_per_pixel: u16,
) -> DisplayImage {
    let mut image = DisplayImage::black(width, height);
    let samples_per_pixel = usize::from(samples_per_pixel.max(1));
    let map = |index: usize| {
        pixels
            .get(index)
            .map(|v| window.apply(rescale.apply(f64::from(v))))
    };

    for (i, out) in image.data.chunks_exact_mut(4).enumerate() {
        let base = i * samples_per_pixel;

        if samples_per_pixel == 3 {
            if let (Some(r), Some(g), Some(b)) = (map(base), map(base + 1), map(base + 2)) {
                out[..3].copy_from_slice(&[r, g, b]);
            }
        } else if let Some(v) = map(base) {
            out[..3].fill(v);
        } else {
            break;
        }
    }

    image
}

/// A placeholder of low-amplitude random noise, for images without
/// recoverable pixel data.
///
/// The same seed always produces the same image. Without a seed, the noise is
/// seeded from the operating system.
pub fn noise(width: u32, height: u32, seed: Option<u64>) -> DisplayImage {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut image = DisplayImage::black(width, height);

    for out in image.data.chunks_exact_mut(4) {
        let v = rng.gen_range(0..50);
        out[..3].fill(v);
    }

    image
}
