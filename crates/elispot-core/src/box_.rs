//! Box - Rectangle regions
//!
//! Used for component bounding boxes and for the drawing primitives.

use crate::error::{Error, Result};

/// A rectangle region
///
/// A small `Copy` type; `right()` and `bottom()` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Box {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Box {
    /// Create a new box
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is negative.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "box dimensions must be non-negative: w={}, h={}",
                w, h
            )));
        }
        Ok(Self { x, y, w, h })
    }

    /// Create a box without validation
    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Create the smallest box holding both inclusive corner points
    pub fn from_inclusive_corners(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            x: min_x.min(max_x),
            y: min_y.min(max_y),
            w: (max_x - min_x).abs() + 1,
            h: (max_y - min_y).abs() + 1,
        }
    }

    /// Get the right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Get the bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Area in pixels
    #[inline]
    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    /// Check whether the point lies inside the box
    #[inline]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Clip the box to an image of the given size.
    ///
    /// Returns `None` if nothing of the box lies inside the image.
    pub fn clip(&self, width: u32, height: u32) -> Option<Self> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = self.right().min(width as i32);
        let y1 = self.bottom().min(height as i32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self::new_unchecked(x0, y0, x1 - x0, y1 - y0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_negative_rejected() {
        assert!(Box::new(0, 0, -1, 3).is_err());
        assert!(Box::new(0, 0, 0, 0).is_ok());
    }

    #[test]
    fn test_from_inclusive_corners() {
        let b = Box::from_inclusive_corners(2, 3, 5, 3);
        assert_eq!(b, Box::new_unchecked(2, 3, 4, 1));
        assert_eq!(b.area(), 4);
    }

    #[test]
    fn test_clip() {
        let b = Box::new_unchecked(-5, -5, 10, 10);
        assert_eq!(b.clip(20, 20), Some(Box::new_unchecked(0, 0, 5, 5)));
        assert_eq!(Box::new_unchecked(30, 30, 2, 2).clip(20, 20), None);
    }

    #[test]
    fn test_contains_point() {
        let b = Box::new_unchecked(1, 1, 2, 2);
        assert!(b.contains_point(1, 1));
        assert!(b.contains_point(2, 2));
        assert!(!b.contains_point(3, 2));
    }
}
