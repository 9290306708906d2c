//! Spot overlays
//!
//! Marker circles on a color copy of the analysed image, and a side-by-side
//! before/after canvas.

use crate::analysis_error::{AnalysisError, ElispotResult};
use elispot_core::{Box, Color, Pix, PixelDepth};
use elispot_region::RegionProps;

/// Marker color, matplotlib's `tab:orange`.
pub const SPOT_COLOR: Color = Color::TAB_ORANGE;

/// Gap between the two panels of [`comparison_image`].
pub const COMPARISON_GAP: u32 = 10;

/// Center `(x, y)` and radius of the marker drawn for a region.
///
/// The centroid is truncated to whole pixels and the radius is half the
/// equivalent diameter, truncated.
pub fn marker_circle(region: &RegionProps) -> (i32, i32, u32) {
    let x = region.centroid_col() as i32;
    let y = region.centroid_row() as i32;
    let radius = (0.5 * region.equivalent_diameter) as u32;
    (x, y, radius)
}

/// Draw a one-pixel circle around every spot on an RGB copy of `gray`.
///
/// Circles that run past the image edge are clipped.
pub fn annotate_spots(gray: &Pix, spots: &[RegionProps]) -> ElispotResult<Pix> {
    let mut canvas = gray.convert_gray_to_rgb()?.into_mut();
    for spot in spots {
        let (x, y, radius) = marker_circle(spot);
        canvas.render_circle_color(x, y, radius, 1, SPOT_COLOR)?;
    }
    Ok(canvas.into())
}

/// Place `before` (8 bpp gray) and `after` (32 bpp RGB) side by side.
///
/// The panels are separated by a white gap column of [`COMPARISON_GAP`]
/// pixels; both must have the same size.
pub fn comparison_image(before: &Pix, after: &Pix) -> ElispotResult<Pix> {
    if (before.width(), before.height()) != (after.width(), after.height()) {
        return Err(AnalysisError::Core(elispot_core::Error::DimensionMismatch {
            expected: (before.width(), before.height()),
            actual: (after.width(), after.height()),
        }));
    }
    let left = match before.depth() {
        PixelDepth::Bit32 => before.clone(),
        _ => before.convert_gray_to_rgb()?,
    };

    let w = before.width();
    let h = before.height();
    let mut canvas = Pix::new(2 * w + COMPARISON_GAP, h, PixelDepth::Bit32)?.into_mut();
    canvas.set_spp(3);
    canvas.render_filled_rect_color(
        &Box::new_unchecked(w as i32, 0, COMPARISON_GAP as i32, h as i32),
        Color::WHITE,
    )?;
    canvas.paste(&left, 0, 0)?;
    canvas.paste(after, (w + COMPARISON_GAP) as i32, 0)?;
    Ok(canvas.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use elispot_region::equivalent_diameter;

    fn region(area: u32, row: f64, col: f64) -> RegionProps {
        RegionProps {
            label: 1,
            area,
            centroid: (row, col),
            bounds: Box::new_unchecked(0, 0, 1, 1),
            equivalent_diameter: equivalent_diameter(area),
        }
    }

    fn flat(w: u32, h: u32, v: u32) -> Pix {
        let mut pm = Pix::new(w, h, PixelDepth::Bit8).unwrap().into_mut();
        for y in 0..h {
            for x in 0..w {
                pm.set_pixel(x, y, v).unwrap();
            }
        }
        pm.into()
    }

    #[test]
    fn test_marker_circle_truncates() {
        // area 50: diameter 7.98, radius 3
        assert_eq!(marker_circle(&region(50, 10.9, 4.2)), (4, 10, 3));
        assert_eq!(marker_circle(&region(1, 0.0, 0.0)), (0, 0, 0));
    }

    #[test]
    fn test_annotate_draws_ring() {
        let gray = flat(20, 20, 100);
        // area 79: diameter 10.03, radius 5
        let out = annotate_spots(&gray, &[region(79, 10.0, 10.0)]).unwrap();
        assert_eq!(out.depth(), PixelDepth::Bit32);
        assert_eq!(out.get_rgb(15, 10), Some((255, 127, 14)));
        assert_eq!(out.get_rgb(10, 5), Some((255, 127, 14)));
        assert_eq!(out.get_rgb(10, 10), Some((100, 100, 100)));
    }

    #[test]
    fn test_annotate_clips_at_edge() {
        let gray = flat(8, 8, 0);
        let out = annotate_spots(&gray, &[region(79, 0.0, 0.0)]).unwrap();
        assert_eq!(out.get_rgb(5, 0), Some((255, 127, 14)));
        assert_eq!(out.get_rgb(0, 5), Some((255, 127, 14)));
    }

    #[test]
    fn test_comparison_layout() {
        let gray = flat(6, 4, 50);
        let annotated = annotate_spots(&gray, &[]).unwrap();
        let both = comparison_image(&gray, &annotated).unwrap();
        assert_eq!((both.width(), both.height()), (22, 4));
        assert_eq!(both.get_rgb(0, 0), Some((50, 50, 50)));
        assert_eq!(both.get_rgb(6, 0), Some((255, 255, 255)));
        assert_eq!(both.get_rgb(21, 3), Some((50, 50, 50)));
    }

    #[test]
    fn test_comparison_size_mismatch() {
        let a = flat(6, 4, 0);
        let b = annotate_spots(&flat(5, 4, 0), &[]).unwrap();
        assert!(comparison_image(&a, &b).is_err());
    }
}
