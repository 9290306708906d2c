//! Synthetic ELISpot plate images
//!
//! Builds well images with known spots so that tests can check counts
//! and areas exactly. Spots are dark discs on a bright membrane, the way
//! a developed plate looks.

use crate::error::TestResult;
use elispot_core::{Pix, PixelDepth};

/// One disc in a synthetic field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spot {
    /// Center column
    pub cx: i32,
    /// Center row
    pub cy: i32,
    /// Radius in pixels
    pub radius: u32,
}

impl Spot {
    /// Whether pixel `(x, y)` lies on the disc.
    pub fn covers(&self, x: i32, y: i32) -> bool {
        let dx = x - self.cx;
        let dy = y - self.cy;
        let r = self.radius as i32;
        dx * dx + dy * dy <= r * r
    }

    /// Number of pixels the disc covers on an unbounded grid.
    pub fn area(&self) -> u32 {
        disc_area(self.radius)
    }
}

/// Pixel count of a disc of the given radius centered on a pixel.
pub fn disc_area(radius: u32) -> u32 {
    let r = radius as i32;
    let mut n = 0;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                n += 1;
            }
        }
    }
    n
}

/// Builder for a synthetic plate image.
///
/// ```
/// use elispot_test::SpotField;
///
/// let field = SpotField::new(64, 48).spot(20, 20, 4).spot(44, 30, 5);
/// let pix = field.render_gray().unwrap();
/// assert_eq!(pix.get_pixel(20, 20), Some(40));
/// ```
#[derive(Debug, Clone)]
pub struct SpotField {
    width: u32,
    height: u32,
    background: u8,
    spot_level: u8,
    gradient: i32,
    spots: Vec<Spot>,
}

impl SpotField {
    /// Empty field: background 200, spots at 40, no illumination ramp.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: 200,
            spot_level: 40,
            gradient: 0,
            spots: Vec::new(),
        }
    }

    /// Set the membrane intensity.
    pub fn background(mut self, level: u8) -> Self {
        self.background = level;
        self
    }

    /// Set the spot intensity.
    pub fn spot_level(mut self, level: u8) -> Self {
        self.spot_level = level;
        self
    }

    /// Add a horizontal illumination ramp rising by `delta` across the width.
    ///
    /// The ramp is applied to membrane and spots alike, so an adaptive
    /// threshold should be indifferent to it.
    pub fn gradient(mut self, delta: i32) -> Self {
        self.gradient = delta;
        self
    }

    /// Add one spot.
    pub fn spot(mut self, cx: i32, cy: i32, radius: u32) -> Self {
        self.spots.push(Spot { cx, cy, radius });
        self
    }

    /// Add a `rows` x `cols` grid of equal spots, spaced evenly with a margin.
    pub fn grid(mut self, rows: u32, cols: u32, radius: u32) -> Self {
        let step_x = self.width as i32 / (cols as i32 + 1);
        let step_y = self.height as i32 / (rows as i32 + 1);
        for r in 1..=rows as i32 {
            for c in 1..=cols as i32 {
                self.spots.push(Spot {
                    cx: c * step_x,
                    cy: r * step_y,
                    radius,
                });
            }
        }
        self
    }

    /// The spots added so far, in insertion order.
    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn level_at(&self, x: u32, y: u32) -> u8 {
        let base = if self.spots.iter().any(|s| s.covers(x as i32, y as i32)) {
            self.spot_level
        } else {
            self.background
        };
        let ramp = if self.width > 1 {
            self.gradient * x as i32 / (self.width as i32 - 1)
        } else {
            0
        };
        (base as i32 + ramp).clamp(0, 255) as u8
    }

    /// Render as an 8 bpp grayscale image.
    pub fn render_gray(&self) -> TestResult<Pix> {
        let mut pm = Pix::new(self.width, self.height, PixelDepth::Bit8)?.into_mut();
        for y in 0..self.height {
            for x in 0..self.width {
                pm.set_pixel_unchecked(x, y, self.level_at(x, y) as u32);
            }
        }
        Ok(pm.into())
    }

    /// Render as a 32 bpp RGB image with equal channels.
    pub fn render_rgb(&self) -> TestResult<Pix> {
        Ok(self.render_gray()?.convert_gray_to_rgb()?)
    }

    /// Render as a 16 bpp image (each 8-bit level times 257).
    pub fn render_gray16(&self) -> TestResult<Pix> {
        let mut pm = Pix::new(self.width, self.height, PixelDepth::Bit16)?.into_mut();
        for y in 0..self.height {
            for x in 0..self.width {
                pm.set_pixel_unchecked(x, y, self.level_at(x, y) as u32 * 257);
            }
        }
        Ok(pm.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disc_area() {
        assert_eq!(disc_area(0), 1);
        assert_eq!(disc_area(1), 5);
        assert_eq!(disc_area(2), 13);
    }

    #[test]
    fn test_render_levels() {
        let pix = SpotField::new(20, 10).spot(5, 5, 2).render_gray().unwrap();
        assert_eq!(pix.get_pixel(5, 5), Some(40));
        assert_eq!(pix.get_pixel(7, 5), Some(40));
        assert_eq!(pix.get_pixel(15, 5), Some(200));
    }

    #[test]
    fn test_gradient_ramp() {
        let pix = SpotField::new(11, 1).gradient(50).render_gray().unwrap();
        assert_eq!(pix.get_pixel(0, 0), Some(200));
        assert_eq!(pix.get_pixel(10, 0), Some(250));
    }

    #[test]
    fn test_grid_positions() {
        let field = SpotField::new(100, 60).grid(2, 3, 3);
        assert_eq!(field.spots().len(), 6);
        assert_eq!(field.spots()[0], Spot { cx: 25, cy: 20, radius: 3 });
    }

    #[test]
    fn test_render_16_bit() {
        let pix = SpotField::new(4, 4).render_gray16().unwrap();
        assert_eq!(pix.get_pixel(0, 0), Some(200 * 257));
    }
}
