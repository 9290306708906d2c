//! Convolution operations
//!
//! All filters here work on 8 bpp grayscale, use replicate (clamp) border
//! handling and round the result back to 8 bits.

use crate::{FilterError, FilterResult, Kernel};
use elispot_core::{Pix, PixelDepth};

/// Convolve an 8-bit grayscale image with a kernel
///
/// Uses replicate (clamp) border handling: pixels outside the image boundary
/// are treated as having the same value as the nearest edge pixel.
pub fn convolve_gray(pix: &Pix, kernel: &Kernel) -> FilterResult<Pix> {
    check_grayscale(pix)?;

    let w = pix.width();
    let h = pix.height();
    let kw = kernel.width();
    let kh = kernel.height();
    let kcx = kernel.center_x() as i32;
    let kcy = kernel.center_y() as i32;

    let mut out_mut = pix.create_template().into_mut();

    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f64;

            for ky in 0..kh {
                let sy = (y as i32 + ky as i32 - kcy).clamp(0, h as i32 - 1) as u32;
                for kx in 0..kw {
                    let sx = (x as i32 + kx as i32 - kcx).clamp(0, w as i32 - 1) as u32;
                    let k = kernel.get(kx, ky).unwrap_or(0.0) as f64;
                    sum += pix.get_pixel_unchecked(sx, sy) as f64 * k;
                }
            }

            out_mut.set_pixel_unchecked(x, y, quantize(sum));
        }
    }

    Ok(out_mut.into())
}

/// Separable convolution of an 8-bit grayscale image
///
/// `kernel_x` must be a horizontal kernel (height 1) and `kernel_y` a
/// vertical one (width 1). The horizontal pass is kept at full precision
/// and the result is rounded once after the vertical pass, so this equals
/// [`convolve_gray`] with the outer-product kernel.
pub fn convolve_sep_gray(pix: &Pix, kernel_x: &Kernel, kernel_y: &Kernel) -> FilterResult<Pix> {
    check_grayscale(pix)?;
    if kernel_x.height() != 1 {
        return Err(FilterError::InvalidKernel(format!(
            "horizontal kernel must have height 1, got {}",
            kernel_x.height()
        )));
    }
    if kernel_y.width() != 1 {
        return Err(FilterError::InvalidKernel(format!(
            "vertical kernel must have width 1, got {}",
            kernel_y.width()
        )));
    }

    let w = pix.width() as usize;
    let h = pix.height() as usize;
    let kx_taps = taps(kernel_x.data(), kernel_x.center_x());
    let ky_taps = taps(kernel_y.data(), kernel_y.center_y());

    // Horizontal pass
    let mut rows = vec![0.0f64; w * h];
    for y in 0..h {
        let line = &mut rows[y * w..(y + 1) * w];
        for (x, out) in line.iter_mut().enumerate() {
            *out = kx_taps
                .iter()
                .map(|&(off, k)| {
                    let sx = clamp_index(x as i64 + off, w);
                    pix.get_pixel_unchecked(sx as u32, y as u32) as f64 * k
                })
                .sum();
        }
    }

    // Vertical pass
    let mut out_mut = pix.create_template().into_mut();
    for y in 0..h {
        for x in 0..w {
            let sum: f64 = ky_taps
                .iter()
                .map(|&(off, k)| rows[clamp_index(y as i64 + off, h) * w + x] * k)
                .sum();
            out_mut.set_pixel_unchecked(x as u32, y as u32, quantize(sum));
        }
    }

    Ok(out_mut.into())
}

/// Apply box (average) blur over a `(2 * radius + 1)` square window
pub fn box_blur(pix: &Pix, radius: u32) -> FilterResult<Pix> {
    let size = 2 * radius + 1;
    let weights = vec![1.0 / size as f32; size as usize];
    let row = Kernel::from_slice(size, 1, &weights)?;
    convolve_sep_gray(pix, &row, &row.transposed())
}

/// Apply Gaussian blur over a `(2 * radius + 1)` square window
///
/// A non-positive `sigma` is derived from the window size, see
/// [`Kernel::gaussian_1d`].
pub fn gaussian_blur(pix: &Pix, radius: u32, sigma: f32) -> FilterResult<Pix> {
    let row = Kernel::gaussian_1d(2 * radius + 1, sigma)?;
    convolve_sep_gray(pix, &row, &row.transposed())
}

/// Non-zero taps as (offset from origin, weight).
fn taps(data: &[f32], center: u32) -> Vec<(i64, f64)> {
    data.iter()
        .enumerate()
        .filter(|&(_, &k)| k != 0.0)
        .map(|(i, &k)| (i as i64 - center as i64, k as f64))
        .collect()
}

#[inline]
fn clamp_index(i: i64, len: usize) -> usize {
    i.clamp(0, len as i64 - 1) as usize
}

#[inline]
fn quantize(v: f64) -> u32 {
    v.round().clamp(0.0, 255.0) as u32
}

fn check_grayscale(pix: &Pix) -> FilterResult<()> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(FilterError::UnsupportedDepth {
            expected: "8-bpp grayscale",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32, f: impl Fn(u32, u32) -> u32) -> Pix {
        let mut pm = Pix::new(width, height, PixelDepth::Bit8).unwrap().into_mut();
        for y in 0..height {
            for x in 0..width {
                pm.set_pixel(x, y, f(x, y)).unwrap();
            }
        }
        pm.into()
    }

    #[test]
    fn test_constant_image_is_fixed_point() {
        let pix = gray(12, 9, |_, _| 77);
        for out in [
            box_blur(&pix, 2).unwrap(),
            gaussian_blur(&pix, 3, 0.0).unwrap(),
            gaussian_blur(&pix, 10, 0.0).unwrap(),
        ] {
            for y in 0..9 {
                for x in 0..12 {
                    assert_eq!(out.get_pixel(x, y), Some(77));
                }
            }
        }
    }

    #[test]
    fn test_box_blur_impulse() {
        let pix = gray(5, 5, |x, y| if (x, y) == (2, 2) { 90 } else { 0 });
        let out = box_blur(&pix, 1).unwrap();
        assert_eq!(out.get_pixel(2, 2), Some(10));
        assert_eq!(out.get_pixel(1, 1), Some(10));
        assert_eq!(out.get_pixel(0, 0), Some(0));
    }

    #[test]
    fn test_replicated_border() {
        // a step at the left edge: replication keeps the edge column bright
        let pix = gray(4, 1, |x, _| if x == 0 { 90 } else { 0 });
        let out = box_blur(&pix, 1).unwrap();
        assert_eq!(out.get_pixel(0, 0), Some(60));
        assert_eq!(out.get_pixel(1, 0), Some(30));
        assert_eq!(out.get_pixel(2, 0), Some(0));
    }

    #[test]
    fn test_separable_matches_full_kernel() {
        let pix = gray(15, 11, |x, y| (x * 13 + y * 29) % 256);
        let row = Kernel::gaussian_1d(5, 0.0).unwrap();
        let sep = convolve_sep_gray(&pix, &row, &row.transposed()).unwrap();
        let full = convolve_gray(&pix, &Kernel::gaussian(5, 0.0).unwrap()).unwrap();
        for y in 0..11 {
            for x in 0..15 {
                let a = sep.get_pixel(x, y).unwrap() as i32;
                let b = full.get_pixel(x, y).unwrap() as i32;
                assert!((a - b).abs() <= 1, "({x},{y}): {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_sep_rejects_wrong_orientation() {
        let pix = gray(4, 4, |_, _| 0);
        let row = Kernel::gaussian_1d(3, 0.0).unwrap();
        assert!(convolve_sep_gray(&pix, &row.transposed(), &row.transposed()).is_err());
        assert!(convolve_sep_gray(&pix, &row, &row).is_err());
    }

    #[test]
    fn test_rejects_non_gray() {
        let pix = Pix::new(4, 4, PixelDepth::Bit32).unwrap();
        assert!(matches!(
            box_blur(&pix, 1),
            Err(FilterError::UnsupportedDepth { actual: 32, .. })
        ));
    }
}
