//! Convolution kernels
//!
//! A [`Kernel`] is a dense row-major grid of `f32` weights with an origin
//! (the element that lands on the output pixel). One-dimensional kernels
//! are simply `n x 1` or `1 x n` kernels.

use crate::{FilterError, FilterResult};

/// Binomial weights used for small Gaussian windows when no sigma is given.
const SMALL_GAUSSIAN: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

/// A 2D convolution kernel
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Width of the kernel
    width: u32,
    /// Height of the kernel
    height: u32,
    /// X coordinate of the center
    cx: u32,
    /// Y coordinate of the center
    cy: u32,
    /// Kernel data (row-major order)
    data: Vec<f32>,
}

impl Kernel {
    /// Create a zero kernel with the given dimensions.
    ///
    /// The origin is placed at `(width / 2, height / 2)`.
    pub fn new(width: u32, height: u32) -> FilterResult<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "kernel dimensions must be positive: {}x{}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            data: vec![0.0; width as usize * height as usize],
        })
    }

    /// Create a kernel from row-major values.
    pub fn from_slice(width: u32, height: u32, data: &[f32]) -> FilterResult<Self> {
        let mut kernel = Self::new(width, height)?;
        if data.len() != kernel.data.len() {
            return Err(FilterError::InvalidKernel(format!(
                "expected {} values for a {}x{} kernel, got {}",
                kernel.data.len(),
                width,
                height,
                data.len()
            )));
        }
        kernel.data.copy_from_slice(data);
        Ok(kernel)
    }

    /// Create a box (averaging) kernel.
    ///
    /// All values are `1/(size*size)`.
    pub fn box_kernel(size: u32) -> FilterResult<Self> {
        let mut kernel = Self::new(size, size)?;
        let v = 1.0 / (size as f32 * size as f32);
        kernel.data.fill(v);
        Ok(kernel)
    }

    /// Create a horizontal `size x 1` Gaussian kernel normalized to unit sum.
    ///
    /// `size` must be odd. When `sigma <= 0` it is derived from the window
    /// as `0.3 * ((size - 1) * 0.5 - 1) + 0.8`, except that windows of 7 or
    /// fewer taps use fixed binomial weights.
    pub fn gaussian_1d(size: u32, sigma: f32) -> FilterResult<Self> {
        check_odd(size)?;
        if sigma <= 0.0 && size <= 7 {
            let weights = SMALL_GAUSSIAN[(size / 2) as usize];
            return Self::from_slice(size, 1, weights);
        }
        let sigma = if sigma > 0.0 {
            sigma as f64
        } else {
            0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
        };

        let half = (size / 2) as f64;
        let scale = -0.5 / (sigma * sigma);
        let raw: Vec<f64> = (0..size)
            .map(|i| {
                let d = i as f64 - half;
                (scale * d * d).exp()
            })
            .collect();
        let total: f64 = raw.iter().sum();
        let weights: Vec<f32> = raw.iter().map(|&w| (w / total) as f32).collect();
        Self::from_slice(size, 1, &weights)
    }

    /// Create a square Gaussian kernel, the outer product of two
    /// [`gaussian_1d`](Self::gaussian_1d) kernels.
    pub fn gaussian(size: u32, sigma: f32) -> FilterResult<Self> {
        let row = Self::gaussian_1d(size, sigma)?;
        let mut kernel = Self::new(size, size)?;
        for y in 0..size {
            for x in 0..size {
                kernel.set(x, y, row.data[x as usize] * row.data[y as usize]);
            }
        }
        Ok(kernel)
    }

    /// Swap rows and columns, turning a horizontal kernel into a vertical one.
    pub fn transposed(&self) -> Self {
        let mut data = vec![0.0; self.data.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                data[(x * self.height + y) as usize] = self.data[(y * self.width + x) as usize];
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cx: self.cy,
            cy: self.cx,
            data,
        }
    }

    /// Width of the kernel
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the kernel
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn center_x(&self) -> u32 {
        self.cx
    }

    #[inline]
    pub fn center_y(&self) -> u32 {
        self.cy
    }

    /// Move the origin.
    pub fn set_center(&mut self, cx: u32, cy: u32) -> FilterResult<()> {
        if cx >= self.width || cy >= self.height {
            return Err(FilterError::InvalidKernel(format!(
                "center ({}, {}) outside {}x{} kernel",
                cx, cy, self.width, self.height
            )));
        }
        self.cx = cx;
        self.cy = cy;
        Ok(())
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get the weight at `(x, y)`, or `None` outside the kernel.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Set the weight at `(x, y)`; out-of-range positions are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = value;
        }
    }

    /// Scale the weights to sum to 1. A zero-sum kernel is left alone.
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum.abs() > f32::EPSILON {
            for v in &mut self.data {
                *v /= sum;
            }
        }
    }

    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}

fn check_odd(size: u32) -> FilterResult<()> {
    if size == 0 || size % 2 == 0 {
        return Err(FilterError::InvalidKernel(format!(
            "kernel size must be odd and positive, got {}",
            size
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_center() {
        let k = Kernel::new(5, 3).unwrap();
        assert_eq!((k.center_x(), k.center_y()), (2, 1));
        assert_eq!(k.sum(), 0.0);
        assert!(Kernel::new(0, 3).is_err());
    }

    #[test]
    fn test_from_slice_len_mismatch() {
        assert!(Kernel::from_slice(2, 2, &[1.0, 2.0, 3.0]).is_err());
        let k = Kernel::from_slice(2, 1, &[1.0, 3.0]).unwrap();
        assert_eq!(k.get(1, 0), Some(3.0));
        assert_eq!(k.get(2, 0), None);
    }

    #[test]
    fn test_box_kernel_sums_to_one() {
        let k = Kernel::box_kernel(3).unwrap();
        assert!((k.sum() - 1.0).abs() < 1e-6);
        assert!((k.get(1, 1).unwrap() - 1.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_gaussian_1d_small_window_is_binomial() {
        let k = Kernel::gaussian_1d(5, 0.0).unwrap();
        assert_eq!(k.data(), &[0.0625, 0.25, 0.375, 0.25, 0.0625]);
    }

    #[test]
    fn test_gaussian_1d_derived_sigma() {
        let k = Kernel::gaussian_1d(41, 0.0).unwrap();
        assert_eq!(k.width(), 41);
        assert!((k.sum() - 1.0).abs() < 1e-5);
        // symmetric, peak in the middle
        assert_eq!(k.get(0, 0), k.get(40, 0));
        let peak = k.get(20, 0).unwrap();
        assert!(k.data().iter().all(|&v| v <= peak));
        // sigma = 0.3 * (20 - 1) + 0.8 = 6.5; ratio of neighbours at the peak
        let ratio = k.get(21, 0).unwrap() / peak;
        assert!((ratio as f64 - (-0.5f64 / (6.5 * 6.5)).exp()).abs() < 1e-5);
    }

    #[test]
    fn test_gaussian_rejects_even_size() {
        assert!(Kernel::gaussian_1d(4, 1.0).is_err());
        assert!(Kernel::gaussian(0, 1.0).is_err());
    }

    #[test]
    fn test_gaussian_2d_is_outer_product() {
        let k = Kernel::gaussian(3, 0.0).unwrap();
        assert!((k.get(1, 1).unwrap() - 0.25).abs() < 1e-6);
        assert!((k.get(0, 0).unwrap() - 0.0625).abs() < 1e-6);
        assert!((k.sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_transposed() {
        let k = Kernel::from_slice(3, 1, &[1.0, 2.0, 3.0]).unwrap();
        let t = k.transposed();
        assert_eq!((t.width(), t.height()), (1, 3));
        assert_eq!(t.get(0, 2), Some(3.0));
        assert_eq!((t.center_x(), t.center_y()), (0, 1));
    }

    #[test]
    fn test_normalize_and_set_center() {
        let mut k = Kernel::from_slice(2, 1, &[1.0, 3.0]).unwrap();
        k.normalize();
        assert_eq!(k.data(), &[0.25, 0.75]);
        assert!(k.set_center(2, 0).is_err());
        k.set_center(0, 0).unwrap();
        assert_eq!(k.center_x(), 0);
    }
}
