//! Adaptive (local) thresholding
//!
//! Each pixel is compared against a weighted mean of its square
//! neighbourhood minus a constant. Bright membrane comes out ON and
//! pixels noticeably darker than their surroundings come out OFF.

use crate::convolve::{box_blur, gaussian_blur};
use crate::{FilterError, FilterResult};
use elispot_core::{Pix, PixelDepth};

/// Options for adaptive thresholding
#[derive(Debug, Clone)]
pub struct AdaptiveThresholdOptions {
    /// Size of the local window (odd, at least 3)
    pub window_size: u32,
    /// Constant subtracted from the mean
    pub c: f32,
    /// Method for computing local threshold
    pub method: AdaptiveMethod,
}

/// Method for adaptive threshold computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptiveMethod {
    /// Use mean of local window
    Mean,
    /// Use Gaussian-weighted mean
    Gaussian,
}

impl Default for AdaptiveThresholdOptions {
    fn default() -> Self {
        Self {
            window_size: 41,
            c: 10.0,
            method: AdaptiveMethod::Gaussian,
        }
    }
}

impl AdaptiveThresholdOptions {
    fn validate(&self) -> FilterResult<()> {
        if self.window_size < 3 || self.window_size % 2 == 0 {
            return Err(FilterError::InvalidParameters(format!(
                "window size must be odd and >= 3, got {}",
                self.window_size
            )));
        }
        if !self.c.is_finite() {
            return Err(FilterError::InvalidParameters(format!(
                "threshold constant must be finite, got {}",
                self.c
            )));
        }
        Ok(())
    }
}

/// Apply adaptive thresholding
///
/// The local mean is the window average (box or Gaussian weighted, borders
/// replicated) rounded to 8 bits. The output is a 1 bpp mask with a pixel
/// ON where `src > mean - c`. A fractional `c` is rounded up.
///
/// # Arguments
/// * `pix` - 8 bpp grayscale input
/// * `options` - window size, offset and weighting
pub fn adaptive_threshold(pix: &Pix, options: &AdaptiveThresholdOptions) -> FilterResult<Pix> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(FilterError::UnsupportedDepth {
            expected: "8-bpp grayscale",
            actual: pix.depth().bits(),
        });
    }
    options.validate()?;

    let radius = options.window_size / 2;
    let mean = match options.method {
        AdaptiveMethod::Mean => box_blur(pix, radius)?,
        AdaptiveMethod::Gaussian => gaussian_blur(pix, radius, 0.0)?,
    };

    let offset = options.c.ceil() as i32;
    let mut out = Pix::new(pix.width(), pix.height(), PixelDepth::Bit1)?.into_mut();
    for y in 0..pix.height() {
        for x in 0..pix.width() {
            let src = pix.get_pixel_unchecked(x, y) as i32;
            let m = mean.get_pixel_unchecked(x, y) as i32;
            if src - m > -offset {
                out.set_pixel_unchecked(x, y, 1);
            }
        }
    }

    Ok(out.into())
}
