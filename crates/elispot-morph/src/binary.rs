//! Binary morphological operations
//!
//! Implements erosion, dilation, opening, and closing for 1-bpp images.
//! Pixels outside the image are ignored rather than treated as background:
//! a dilation never reads them and an erosion never requires them to be set.

use crate::{MorphError, MorphResult, Sel};
use elispot_core::{Pix, PixelDepth};

/// Dilate a binary image using rasterop (word-level shift-and-OR)
///
/// `out(x, y)` is ON when any hit offset `(dx, dy)` has `src(x - dx, y - dy)`
/// ON inside the image.
///
/// Algorithm:
///   1. Clear output
///   2. For each hit (dx, dy): dest[y] |= shift(src[y - dy], dx)
///   3. Clear the padding bits that the shifts pushed past the width
pub fn dilate(pix: &Pix, sel: &Sel) -> MorphResult<Pix> {
    check_binary(pix)?;

    let h = pix.height() as i32;
    let wpl = pix.wpl() as usize;
    let mut out_mut = pix.create_template().into_mut();

    let src_data = pix.data();
    let dst_data = out_mut.data_mut();

    for (dx, dy) in sel.hit_offsets() {
        for y in 0..h {
            let src_y = y - dy;
            if src_y < 0 || src_y >= h {
                continue;
            }
            let src_start = src_y as usize * wpl;
            let dst_start = y as usize * wpl;
            shift_or_row(
                &mut dst_data[dst_start..dst_start + wpl],
                &src_data[src_start..src_start + wpl],
                dx,
            );
        }
    }

    out_mut.clear_padding_bits();
    Ok(out_mut.into())
}

/// Erode a binary image
///
/// `out(x, y)` is ON when every hit offset `(dx, dy)` that lands inside the
/// image has `src(x + dx, y + dy)` ON. Computed through the duality
/// `erode(A, S) = !dilate(!A, reflect(S))`: the complement is cleared
/// outside the image, so out-of-image positions never veto a pixel.
pub fn erode(pix: &Pix, sel: &Sel) -> MorphResult<Pix> {
    check_binary(pix)?;
    let complement = pix.invert_binary()?;
    let grown = dilate(&complement, &sel.reflect())?;
    Ok(grown.invert_binary()?)
}

/// Open a binary image
///
/// Opening = Erosion followed by Dilation.
/// Removes small foreground objects and smooths contours.
pub fn open(pix: &Pix, sel: &Sel) -> MorphResult<Pix> {
    let eroded = erode(pix, sel)?;
    dilate(&eroded, sel)
}

/// Close a binary image
///
/// Closing = Dilation followed by Erosion.
/// Fills small holes and connects nearby objects.
pub fn close(pix: &Pix, sel: &Sel) -> MorphResult<Pix> {
    let dilated = dilate(pix, sel)?;
    erode(&dilated, sel)
}

/// Dilate with a centered `width x height` brick
///
/// Separable: a horizontal line pass followed by a vertical one.
pub fn dilate_brick(pix: &Pix, width: u32, height: u32) -> MorphResult<Pix> {
    check_binary(pix)?;
    if width == 1 && height == 1 {
        return Ok(pix.clone());
    }
    let tmp = dilate(pix, &Sel::create_brick(width, 1)?)?;
    dilate(&tmp, &Sel::create_brick(1, height)?)
}

/// Erode with a centered `width x height` brick
pub fn erode_brick(pix: &Pix, width: u32, height: u32) -> MorphResult<Pix> {
    check_binary(pix)?;
    if width == 1 && height == 1 {
        return Ok(pix.clone());
    }
    let tmp = erode(pix, &Sel::create_brick(width, 1)?)?;
    erode(&tmp, &Sel::create_brick(1, height)?)
}

/// Open with a brick structuring element
///
/// Opening = erosion followed by dilation.
pub fn open_brick(pix: &Pix, width: u32, height: u32) -> MorphResult<Pix> {
    let eroded = erode_brick(pix, width, height)?;
    dilate_brick(&eroded, width, height)
}

/// Close with a brick structuring element
///
/// Closing = dilation followed by erosion.
pub fn close_brick(pix: &Pix, width: u32, height: u32) -> MorphResult<Pix> {
    let dilated = dilate_brick(pix, width, height)?;
    erode_brick(&dilated, width, height)
}

/// OR `src` shifted right by `shift` pixels (left when negative) into `dst`.
///
/// Rows are MSB-first, so a pixel shift to the right is a logical right
/// shift of the bit stream. Bits shifted in from beyond the row are zero.
fn shift_or_row(dst: &mut [u32], src: &[u32], shift: i32) {
    let n = dst.len() as i64;
    let word_shift = shift.div_euclid(32) as i64;
    let bit_shift = shift.rem_euclid(32) as u32;

    for (i, out) in dst.iter_mut().enumerate() {
        let j = i as i64 - word_shift;
        let mut word = 0u32;
        if (0..n).contains(&j) {
            word |= src[j as usize] >> bit_shift;
        }
        if bit_shift > 0 && (0..n).contains(&(j - 1)) {
            word |= src[(j - 1) as usize] << (32 - bit_shift);
        }
        *out |= word;
    }
}

fn check_binary(pix: &Pix) -> MorphResult<()> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(MorphError::UnsupportedDepth {
            expected: "1-bpp binary",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}
