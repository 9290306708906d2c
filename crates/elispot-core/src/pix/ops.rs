//! Whole-image operations: statistics, inversion and composition.

use super::{Pix, PixMut, PixelDepth};
use crate::error::{Error, Result};

impl Pix {
    /// Smallest and largest pixel values of an 8 or 16 bpp image.
    pub fn min_max(&self) -> Result<(u32, u32)> {
        if !matches!(self.depth(), PixelDepth::Bit8 | PixelDepth::Bit16) {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        let mut min = u32::MAX;
        let mut max = 0u32;
        for y in 0..self.height() {
            for x in 0..self.width() {
                let v = self.get_pixel_unchecked(x, y);
                min = min.min(v);
                max = max.max(v);
            }
        }
        Ok((min, max))
    }

    /// Number of ON pixels in a 1 bpp image.
    pub fn count_pixels(&self) -> Result<u64> {
        if self.depth() != PixelDepth::Bit1 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        let w = self.width();
        let full_words = (w / 32) as usize;
        let tail_bits = w % 32;
        let tail_mask = if tail_bits == 0 {
            0
        } else {
            !0u32 << (32 - tail_bits)
        };

        let mut count = 0u64;
        for y in 0..self.height() {
            let line = self.row_data(y);
            count += line[..full_words]
                .iter()
                .map(|w| w.count_ones() as u64)
                .sum::<u64>();
            if tail_bits != 0 {
                count += (line[full_words] & tail_mask).count_ones() as u64;
            }
        }
        Ok(count)
    }

    /// Flip every pixel of a 1 bpp image.
    ///
    /// Padding bits past the image width stay cleared.
    pub fn invert_binary(&self) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit1 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        let mut out = self.to_mut();
        for word in out.data_mut().iter_mut() {
            *word = !*word;
        }
        out.clear_padding_bits();
        Ok(out.into())
    }
}

impl PixMut {
    /// Zero the bits past the image width in every row of a 1 bpp image.
    ///
    /// Word-level operations such as inversion set those bits; they must be
    /// cleared before the data is read as whole words again.
    pub fn clear_padding_bits(&mut self) {
        if self.depth() != PixelDepth::Bit1 {
            return;
        }
        let tail_bits = self.width() % 32;
        if tail_bits == 0 {
            return;
        }
        let mask = !0u32 << (32 - tail_bits);
        let last = self.wpl() as usize - 1;
        for y in 0..self.height() {
            self.row_data_mut(y)[last] &= mask;
        }
    }

    /// Copy `src` into this image with its top-left corner at `(dx, dy)`.
    ///
    /// Parts of `src` falling outside the destination are clipped.
    pub fn paste(&mut self, src: &Pix, dx: i32, dy: i32) -> Result<()> {
        if src.depth() != self.depth() {
            return Err(Error::IncompatibleDepths(
                src.depth().bits(),
                self.depth().bits(),
            ));
        }
        let dw = self.width() as i32;
        let dh = self.height() as i32;
        for sy in 0..src.height() {
            let ty = dy + sy as i32;
            if ty < 0 || ty >= dh {
                continue;
            }
            for sx in 0..src.width() {
                let tx = dx + sx as i32;
                if tx < 0 || tx >= dw {
                    continue;
                }
                let v = src.get_pixel_unchecked(sx, sy);
                self.set_pixel_unchecked(tx as u32, ty as u32, v);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(width: u32, height: u32, on: &[(u32, u32)]) -> Pix {
        let mut pm = Pix::new(width, height, PixelDepth::Bit1).unwrap().to_mut();
        for &(x, y) in on {
            pm.set_pixel(x, y, 1).unwrap();
        }
        pm.into()
    }

    #[test]
    fn test_count_pixels_ignores_padding() {
        let pix = binary(35, 2, &[(0, 0), (34, 0), (20, 1)]);
        assert_eq!(pix.count_pixels().unwrap(), 3);
    }

    #[test]
    fn test_invert_binary() {
        let pix = binary(35, 2, &[(0, 0)]);
        let inv = pix.invert_binary().unwrap();
        assert_eq!(inv.get_pixel(0, 0), Some(0));
        assert_eq!(inv.get_pixel(34, 1), Some(1));
        assert_eq!(inv.count_pixels().unwrap(), 35 * 2 - 1);
        // padding bits of the second word must stay clear
        assert_eq!(inv.row_data(0)[1] & 0x1fff_ffff, 0);
    }

    #[test]
    fn test_min_max() {
        let mut pm = Pix::new(3, 1, PixelDepth::Bit8).unwrap().to_mut();
        pm.set_pixel(0, 0, 9).unwrap();
        pm.set_pixel(1, 0, 200).unwrap();
        pm.set_pixel(2, 0, 17).unwrap();
        assert_eq!(Pix::from(pm).min_max().unwrap(), (9, 200));
    }

    #[test]
    fn test_paste_clips() {
        let mut src = Pix::new(2, 2, PixelDepth::Bit8).unwrap().to_mut();
        src.set_pixel(0, 0, 1).unwrap();
        src.set_pixel(1, 1, 2).unwrap();
        let src: Pix = src.into();

        let mut dst = Pix::new(3, 3, PixelDepth::Bit8).unwrap().to_mut();
        dst.paste(&src, 2, 2).unwrap();
        assert_eq!(dst.get_pixel(2, 2), Some(1));
        dst.paste(&src, -1, -1).unwrap();
        assert_eq!(dst.get_pixel(0, 0), Some(2));
    }

    #[test]
    fn test_paste_depth_mismatch() {
        let src = Pix::new(2, 2, PixelDepth::Bit1).unwrap();
        let mut dst = Pix::new(3, 3, PixelDepth::Bit8).unwrap().to_mut();
        assert!(dst.paste(&src, 0, 0).is_err());
    }
}
