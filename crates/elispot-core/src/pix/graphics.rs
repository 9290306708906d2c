//! Graphics rendering functions
//!
//! Drawing primitives used for annotation and plotting:
//! - Circles (outline, midpoint algorithm)
//! - Lines (Bresenham)
//! - Rectangles (filled and outlined)
//!
//! All primitives clip silently at the image border.

use super::{PixMut, PixelDepth};
use crate::box_::Box;
use crate::error::Result;

/// RGB color for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a new color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    /// White color
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };
    /// Light gray, used for plot axes
    pub const LIGHT_GRAY: Color = Color {
        r: 200,
        g: 200,
        b: 200,
    };
    /// Blue of the tab10 palette
    pub const TAB_BLUE: Color = Color {
        r: 31,
        g: 119,
        b: 180,
    };
    /// Orange of the tab10 palette, the spot outline color
    pub const TAB_ORANGE: Color = Color {
        r: 255,
        g: 127,
        b: 14,
    };

    /// Convert to grayscale value (0-255)
    pub fn to_gray(&self) -> u8 {
        ((self.r as u32 + self.g as u32 + self.b as u32) / 3) as u8
    }

    /// Compose as 32-bit RGBA pixel
    pub fn to_pixel32(&self) -> u32 {
        crate::color::compose_rgb(self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Points of a one-pixel circle outline, using the midpoint algorithm.
///
/// A zero radius yields the center point only. Points may repeat.
pub fn circle_outline_points(cx: i32, cy: i32, radius: u32) -> Vec<(i32, i32)> {
    if radius == 0 {
        return vec![(cx, cy)];
    }
    let r = radius as i32;
    let mut pts = Vec::with_capacity(8 * radius as usize + 8);
    let mut x = r;
    let mut y = 0;
    let mut err = 1 - r;
    while x >= y {
        for (dx, dy) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            pts.push((cx + dx, cy + dy));
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
    pts
}

/// Points of an 8-connected line from `(x1, y1)` to `(x2, y2)` (Bresenham).
pub fn line_points(x1: i32, y1: i32, x2: i32, y2: i32) -> Vec<(i32, i32)> {
    let dx = (x2 - x1).abs();
    let dy = -(y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x1, y1);
    let mut pts = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    loop {
        pts.push((x, y));
        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    pts
}

impl PixMut {
    fn color_value(&self, color: Color) -> u32 {
        match self.depth() {
            PixelDepth::Bit1 => 1,
            PixelDepth::Bit8 => color.to_gray() as u32,
            PixelDepth::Bit16 => {
                let g = color.to_gray() as u32;
                (g << 8) | g
            }
            PixelDepth::Bit32 => color.to_pixel32(),
        }
    }

    /// Render a list of points with a specific color.
    ///
    /// For non-32bpp images, the color is converted to grayscale.
    /// Points outside the image bounds are clipped.
    pub fn render_points_color(&mut self, points: &[(i32, i32)], color: Color) -> Result<()> {
        let w = self.width() as i32;
        let h = self.height() as i32;
        let val = self.color_value(color);
        for &(x, y) in points {
            if x < 0 || x >= w || y < 0 || y >= h {
                continue;
            }
            self.set_pixel_unchecked(x as u32, y as u32, val);
        }
        Ok(())
    }

    /// Render a circle outline with a specific color.
    ///
    /// `width` rings are drawn at radii `radius - width/2 ..`, so a width of
    /// 1 is a single-pixel outline of exactly `radius`.
    pub fn render_circle_color(
        &mut self,
        cx: i32,
        cy: i32,
        radius: u32,
        width: u32,
        color: Color,
    ) -> Result<()> {
        let width = width.max(1);
        let first = radius.saturating_sub(width / 2);
        for r in first..first + width {
            let pts = circle_outline_points(cx, cy, r);
            self.render_points_color(&pts, color)?;
        }
        Ok(())
    }

    /// Render a one-pixel line with a specific color.
    pub fn render_line_color(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    ) -> Result<()> {
        let pts = line_points(x1, y1, x2, y2);
        self.render_points_color(&pts, color)
    }

    /// Fill a rectangle with a specific color.
    pub fn render_filled_rect_color(&mut self, b: &Box, color: Color) -> Result<()> {
        let Some(clipped) = b.clip(self.width(), self.height()) else {
            return Ok(());
        };
        let val = self.color_value(color);
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.set_pixel_unchecked(x as u32, y as u32, val);
            }
        }
        Ok(())
    }

    /// Render a one-pixel rectangle outline with a specific color.
    pub fn render_rect_color(&mut self, b: &Box, color: Color) -> Result<()> {
        if b.w <= 0 || b.h <= 0 {
            return Ok(());
        }
        let x1 = b.right() - 1;
        let y1 = b.bottom() - 1;
        self.render_line_color(b.x, b.y, x1, b.y, color)?;
        self.render_line_color(b.x, y1, x1, y1, color)?;
        self.render_line_color(b.x, b.y, b.x, y1, color)?;
        self.render_line_color(x1, b.y, x1, y1, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pix::Pix;

    fn rgb_canvas(w: u32, h: u32) -> PixMut {
        Pix::new(w, h, PixelDepth::Bit32).unwrap().to_mut()
    }

    #[test]
    fn test_circle_points_on_radius() {
        let pts = circle_outline_points(10, 10, 5);
        assert!(pts.contains(&(15, 10)));
        assert!(pts.contains(&(10, 5)));
        assert!(pts.contains(&(5, 10)));
        assert!(pts.contains(&(10, 15)));
        for &(x, y) in &pts {
            let d2 = (x - 10).pow(2) + (y - 10).pow(2);
            assert!((16..=36).contains(&d2), "({x}, {y}) off the ring");
        }
    }

    #[test]
    fn test_zero_radius_is_center() {
        assert_eq!(circle_outline_points(3, 4, 0), vec![(3, 4)]);
    }

    #[test]
    fn test_render_circle_color_leaves_center() {
        let mut pm = rgb_canvas(21, 21);
        pm.render_circle_color(10, 10, 6, 1, Color::TAB_ORANGE)
            .unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.get_rgb(16, 10), Some((255, 127, 14)));
        assert_eq!(pix.get_rgb(10, 10), Some((0, 0, 0)));
    }

    #[test]
    fn test_render_circle_clips_at_border() {
        let mut pm = rgb_canvas(8, 8);
        pm.render_circle_color(0, 0, 5, 1, Color::WHITE).unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.get_rgb(5, 0), Some((255, 255, 255)));
        assert_eq!(pix.get_rgb(0, 5), Some((255, 255, 255)));
    }

    #[test]
    fn test_line_points_endpoints() {
        let pts = line_points(0, 0, 5, 2);
        assert_eq!(pts.first(), Some(&(0, 0)));
        assert_eq!(pts.last(), Some(&(5, 2)));
        assert_eq!(pts.len(), 6);
    }

    #[test]
    fn test_filled_rect_gray() {
        let mut pm = Pix::new(5, 5, PixelDepth::Bit8).unwrap().to_mut();
        pm.render_filled_rect_color(&Box::new_unchecked(3, 3, 10, 10), Color::WHITE)
            .unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.get_pixel(4, 4), Some(255));
        assert_eq!(pix.get_pixel(2, 2), Some(0));
    }

    #[test]
    fn test_rect_outline() {
        let mut pm = Pix::new(6, 6, PixelDepth::Bit8).unwrap().to_mut();
        pm.render_rect_color(&Box::new_unchecked(1, 1, 4, 4), Color::WHITE)
            .unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.get_pixel(1, 1), Some(255));
        assert_eq!(pix.get_pixel(4, 4), Some(255));
        assert_eq!(pix.get_pixel(2, 2), Some(0));
    }
}
