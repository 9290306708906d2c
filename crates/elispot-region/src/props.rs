//! Per-label region statistics
//!
//! Measures each labeled region of a label image: pixel area, centroid,
//! bounding box and the diameter of the circle with the same area.

use crate::error::{RegionError, RegionResult};
use elispot_core::{Box, Pix, PixelDepth};
use std::f64::consts::PI;

/// Measurements of one labeled region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionProps {
    /// Label in the label image
    pub label: u32,
    /// Number of pixels
    pub area: u32,
    /// Mean (row, column) of the region's pixels
    pub centroid: (f64, f64),
    /// Bounding box
    pub bounds: Box,
    /// Diameter of a circle with the same area, `sqrt(4 * area / pi)`
    pub equivalent_diameter: f64,
}

impl RegionProps {
    /// Centroid row (y)
    #[inline]
    pub fn centroid_row(&self) -> f64 {
        self.centroid.0
    }

    /// Centroid column (x)
    #[inline]
    pub fn centroid_col(&self) -> f64 {
        self.centroid.1
    }
}

/// Diameter of the circle whose area is `area`.
pub fn equivalent_diameter(area: u32) -> f64 {
    (4.0 * area as f64 / PI).sqrt()
}

/// Measure every region of a 32 bpp label image.
///
/// Label 0 is background. Returns one entry per label present, sorted by
/// label.
pub fn region_properties(labeled: &Pix) -> RegionResult<Vec<RegionProps>> {
    if labeled.depth() != PixelDepth::Bit32 {
        return Err(RegionError::UnsupportedDepth {
            expected: "32-bpp label image",
            actual: labeled.depth().bits(),
        });
    }

    #[derive(Clone)]
    struct Acc {
        count: u32,
        sum_row: u64,
        sum_col: u64,
        min: (u32, u32),
        max: (u32, u32),
    }

    let mut acc: Vec<Option<Acc>> = Vec::new();
    for y in 0..labeled.height() {
        for x in 0..labeled.width() {
            let label = labeled.get_pixel_unchecked(x, y) as usize;
            if label == 0 {
                continue;
            }
            if label > acc.len() {
                acc.resize(label, None);
            }
            let a = acc[label - 1].get_or_insert(Acc {
                count: 0,
                sum_row: 0,
                sum_col: 0,
                min: (x, y),
                max: (x, y),
            });
            a.count += 1;
            a.sum_row += y as u64;
            a.sum_col += x as u64;
            a.min = (a.min.0.min(x), a.min.1.min(y));
            a.max = (a.max.0.max(x), a.max.1.max(y));
        }
    }

    Ok(acc
        .into_iter()
        .enumerate()
        .filter_map(|(i, a)| {
            let a = a?;
            let n = a.count as f64;
            Some(RegionProps {
                label: i as u32 + 1,
                area: a.count,
                centroid: (a.sum_row as f64 / n, a.sum_col as f64 / n),
                bounds: Box::from_inclusive_corners(
                    a.min.0 as i32,
                    a.min.1 as i32,
                    a.max.0 as i32,
                    a.max.1 as i32,
                ),
                equivalent_diameter: equivalent_diameter(a.count),
            })
        })
        .collect())
}
