//! Depth conversions
//!
//! Conversions used on the way into the pipeline (color or 16-bit uploads to
//! a full-range 8-bit intensity grid) and on the way out (gray to RGB for
//! annotation, binary to 8-bit for export).

use super::{Pix, PixelDepth};
use crate::color;
use crate::error::{Error, Result};

/// ITU-R 601-2 luma of an RGB triple, in 16.16 fixed point.
///
/// `L = R * 299/1000 + G * 587/1000 + B * 114/1000`, rounded.
#[inline]
pub fn rgb_to_luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

impl Pix {
    /// Convert to a single-channel intensity image.
    ///
    /// - 1 bpp: OFF -> 0, ON -> 255
    /// - 8 bpp: returned as-is (shared)
    /// - 16 bpp: returned as-is; use [`Pix::normalize_to_full_range`] to reach 8 bpp
    /// - 32 bpp: luma of R, G, B; alpha ignored
    pub fn convert_to_gray(&self) -> Result<Pix> {
        match self.depth() {
            PixelDepth::Bit8 | PixelDepth::Bit16 => Ok(self.clone()),
            PixelDepth::Bit1 => self.convert_1_to_8(),
            PixelDepth::Bit32 => {
                let w = self.width();
                let h = self.height();
                let mut out = Pix::new(w, h, PixelDepth::Bit8)?.to_mut();
                out.set_informat(self.informat());
                for y in 0..h {
                    for x in 0..w {
                        let (r, g, b) = color::extract_rgb(self.get_pixel_unchecked(x, y));
                        out.set_pixel_unchecked(x, y, rgb_to_luma(r, g, b) as u32);
                    }
                }
                Ok(out.into())
            }
        }
    }

    /// Convert to 8 bpp luminance, dropping 16-bit precision to the high byte.
    pub fn convert_to_gray8(&self) -> Result<Pix> {
        let gray = self.convert_to_gray()?;
        if gray.depth() != PixelDepth::Bit16 {
            return Ok(gray);
        }
        let w = gray.width();
        let h = gray.height();
        let mut out = Pix::new(w, h, PixelDepth::Bit8)?.to_mut();
        out.set_informat(gray.informat());
        for y in 0..h {
            for x in 0..w {
                out.set_pixel_unchecked(x, y, gray.get_pixel_unchecked(x, y) >> 8);
            }
        }
        Ok(out.into())
    }

    /// Linearly stretch an 8 or 16 bpp image onto the full 8-bit range.
    ///
    /// `out = floor((v - min) * 255 / (max - min))`, so the darkest pixel
    /// becomes 0 and the brightest 255. A constant image maps to all zeros.
    pub fn normalize_to_full_range(&self) -> Result<Pix> {
        if !matches!(self.depth(), PixelDepth::Bit8 | PixelDepth::Bit16) {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        let (min, max) = self.min_max()?;
        let range = (max - min) as u64;

        let w = self.width();
        let h = self.height();
        let mut out = Pix::new(w, h, PixelDepth::Bit8)?.to_mut();
        out.set_informat(self.informat());
        if range == 0 {
            return Ok(out.into());
        }
        for y in 0..h {
            for x in 0..w {
                let v = (self.get_pixel_unchecked(x, y) - min) as u64;
                out.set_pixel_unchecked(x, y, (v * 255 / range) as u32);
            }
        }
        Ok(out.into())
    }

    /// Replicate an 8 bpp gray image into the R, G and B channels.
    pub fn convert_gray_to_rgb(&self) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit8 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        let w = self.width();
        let h = self.height();
        let mut out = Pix::new(w, h, PixelDepth::Bit32)?.to_mut();
        out.set_spp(3);
        for y in 0..h {
            for x in 0..w {
                let v = self.get_pixel_unchecked(x, y) as u8;
                out.set_pixel_unchecked(x, y, color::compose_rgb(v, v, v));
            }
        }
        Ok(out.into())
    }

    /// Expand a binary image to 8 bpp (OFF -> 0, ON -> 255).
    pub fn convert_1_to_8(&self) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit1 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        let w = self.width();
        let h = self.height();
        let mut out = Pix::new(w, h, PixelDepth::Bit8)?.to_mut();
        for y in 0..h {
            for x in 0..w {
                if self.get_pixel_unchecked(x, y) != 0 {
                    out.set_pixel_unchecked(x, y, 255);
                }
            }
        }
        Ok(out.into())
    }
}
