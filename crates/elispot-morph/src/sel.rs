//! Structuring Element (SEL) for morphological operations
//!
//! A structuring element defines the neighborhood used in morphological
//! operations: a grid of hit positions plus an origin.

use crate::{MorphError, MorphResult};

/// Structuring Element (SEL)
///
/// The origin `(cx, cy)` is the reference point for the operation; hit
/// offsets are reported relative to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sel {
    width: u32,
    height: u32,
    cx: u32,
    cy: u32,
    hits: Vec<bool>,
}

impl Sel {
    /// Create an empty structuring element with the origin at the center
    pub fn new(width: u32, height: u32) -> MorphResult<Self> {
        if width == 0 || height == 0 {
            return Err(MorphError::InvalidSel(format!(
                "dimensions must be positive: {}x{}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            hits: vec![false; width as usize * height as usize],
        })
    }

    /// Create a rectangular "brick" structuring element with all hits
    pub fn create_brick(width: u32, height: u32) -> MorphResult<Self> {
        let mut sel = Self::new(width, height)?;
        sel.hits.fill(true);
        Ok(sel)
    }

    /// Create a square structuring element with all hits
    pub fn create_square(size: u32) -> MorphResult<Self> {
        Self::create_brick(size, size)
    }

    /// Create a disk of the given radius (`dx² + dy² <= r²`)
    pub fn create_disk(radius: u32) -> MorphResult<Self> {
        let size = 2 * radius + 1;
        let mut sel = Self::new(size, size)?;
        let r = radius as i64;
        for y in 0..size {
            for x in 0..size {
                let dx = x as i64 - r;
                let dy = y as i64 - r;
                sel.set_hit(x, y, dx * dx + dy * dy <= r * r);
            }
        }
        Ok(sel)
    }

    /// Create a structuring element from rows of 'x' (hit) and '.' (empty).
    ///
    /// Rows are separated by newlines; surrounding whitespace is ignored.
    pub fn from_string(pattern: &str, origin_x: u32, origin_y: u32) -> MorphResult<Self> {
        let rows: Vec<&str> = pattern
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.chars().count()) as u32;
        let mut sel = Self::new(width, height)?;
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() as u32 != width {
                return Err(MorphError::InvalidSel(format!(
                    "row {} has {} columns, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for (x, ch) in row.chars().enumerate() {
                let hit = match ch {
                    'x' | 'X' => true,
                    '.' => false,
                    other => {
                        return Err(MorphError::InvalidSel(format!(
                            "unexpected character {:?}",
                            other
                        )));
                    }
                };
                sel.set_hit(x as u32, y as u32, hit);
            }
        }
        sel.set_origin(origin_x, origin_y)?;
        Ok(sel)
    }

    /// Get the width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn origin_x(&self) -> u32 {
        self.cx
    }

    #[inline]
    pub fn origin_y(&self) -> u32 {
        self.cy
    }

    /// Set the origin
    pub fn set_origin(&mut self, cx: u32, cy: u32) -> MorphResult<()> {
        if cx >= self.width || cy >= self.height {
            return Err(MorphError::InvalidSel(format!(
                "origin ({}, {}) outside {}x{} sel",
                cx, cy, self.width, self.height
            )));
        }
        self.cx = cx;
        self.cy = cy;
        Ok(())
    }

    /// Whether `(x, y)` is a hit; `None` outside the sel
    #[inline]
    pub fn is_hit(&self, x: u32, y: u32) -> Option<bool> {
        (x < self.width && y < self.height).then(|| self.hits[(y * self.width + x) as usize])
    }

    /// Mark or clear a hit; out-of-range positions are ignored
    #[inline]
    pub fn set_hit(&mut self, x: u32, y: u32, hit: bool) {
        if x < self.width && y < self.height {
            self.hits[(y * self.width + x) as usize] = hit;
        }
    }

    /// Count the number of hit elements
    pub fn hit_count(&self) -> usize {
        self.hits.iter().filter(|&&h| h).count()
    }

    /// Create the reflected (180-degree rotated) SEL
    pub fn reflect(&self) -> Self {
        let mut hits = self.hits.clone();
        hits.reverse();
        Self {
            width: self.width,
            height: self.height,
            cx: self.width - 1 - self.cx,
            cy: self.height - 1 - self.cy,
            hits,
        }
    }

    /// Iterate over hit positions relative to origin
    pub fn hit_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let cx = self.cx as i32;
        let cy = self.cy as i32;
        let width = self.width;

        self.hits
            .iter()
            .enumerate()
            .filter(|&(_, &hit)| hit)
            .map(move |(idx, _)| {
                let x = (idx as u32 % width) as i32;
                let y = (idx as u32 / width) as i32;
                (x - cx, y - cy)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brick_is_centered() {
        let sel = Sel::create_brick(5, 5).unwrap();
        assert_eq!((sel.origin_x(), sel.origin_y()), (2, 2));
        assert_eq!(sel.hit_count(), 25);
        let offsets: Vec<_> = sel.hit_offsets().collect();
        assert_eq!(offsets.first(), Some(&(-2, -2)));
        assert_eq!(offsets.last(), Some(&(2, 2)));
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(Sel::create_brick(0, 3).is_err());
    }

    #[test]
    fn test_disk() {
        let sel = Sel::create_disk(2).unwrap();
        assert_eq!(sel.hit_count(), 13);
        assert_eq!(sel.is_hit(0, 0), Some(false));
        assert_eq!(sel.is_hit(2, 0), Some(true));
        assert_eq!(sel.is_hit(5, 0), None);
    }

    #[test]
    fn test_from_string_and_reflect() {
        let sel = Sel::from_string(
            "
            xx.
            .x.
            ",
            0,
            0,
        )
        .unwrap();
        assert_eq!((sel.width(), sel.height()), (3, 2));
        let offsets: Vec<_> = sel.hit_offsets().collect();
        assert_eq!(offsets, vec![(0, 0), (1, 0), (1, 1)]);

        let r = sel.reflect();
        assert_eq!((r.origin_x(), r.origin_y()), (2, 1));
        let mut offsets: Vec<_> = r.hit_offsets().collect();
        offsets.sort();
        assert_eq!(offsets, vec![(-1, -1), (-1, 0), (0, 0)]);
    }

    #[test]
    fn test_from_string_rejects_ragged_rows() {
        assert!(Sel::from_string("xx\nx", 0, 0).is_err());
        assert!(Sel::from_string("xo", 0, 0).is_err());
        assert!(Sel::from_string("x", 1, 0).is_err());
    }
}
