//! Binary morphology regression test
//!
//! Builds a membrane mask (ON) with dark spots (OFF) and bright specks,
//! opens it with the 5x5 brick used for spot cleaning and checks that
//! the specks go while the spots keep their exact shape.
//!
//! Run with:
//! ```
//! cargo test -p elispot-morph --test binmorph_reg
//! ```

use elispot_core::{ImageFormat, Pix, PixelDepth};
use elispot_morph::{Sel, close_brick, dilate_brick, erode_brick, open, open_brick};
use elispot_test::{RegParams, SpotField};

/// Membrane ON wherever the gray level is bright.
fn membrane_mask(gray: &Pix) -> Pix {
    let mut pm = Pix::new(gray.width(), gray.height(), PixelDepth::Bit1)
        .unwrap()
        .into_mut();
    for y in 0..gray.height() {
        for x in 0..gray.width() {
            if gray.get_pixel(x, y).unwrap() > 120 {
                pm.set_pixel(x, y, 1).unwrap();
            }
        }
    }
    pm.into()
}

#[test]
fn binmorph_reg() {
    let mut rp = RegParams::new("binmorph");

    let field = SpotField::new(120, 130).grid(2, 3, 6);
    let mut mask = membrane_mask(&field.render_gray().unwrap()).into_mut();

    // A dark 20x20 block with a bright 2x2 speck in its middle
    for y in 100..120 {
        for x in 50..70 {
            mask.set_pixel(x, y, 0).unwrap();
        }
    }
    for y in 109..111 {
        for x in 59..61 {
            mask.set_pixel(x, y, 1).unwrap();
        }
    }
    let mask: Pix = mask.into();

    let spot_area: u32 = field.spots().iter().map(|s| s.area()).sum();
    let total = 120 * 130;
    let off_before = total - mask.count_pixels().unwrap();
    rp.compare_values((spot_area + 400 - 4) as f64, off_before as f64, 0.0);

    let opened = open_brick(&mask, 5, 5).unwrap();
    let off_after = total - opened.count_pixels().unwrap();
    rp.compare_values((spot_area + 400) as f64, off_after as f64, 0.0);
    rp.compare_values(0.0, opened.get_pixel(59, 109).unwrap() as f64, 0.0);
    for spot in field.spots() {
        let v = opened.get_pixel(spot.cx as u32, spot.cy as u32).unwrap();
        rp.compare_values(0.0, v as f64, 0.0);
    }
    // membrane touching the border survives: outside pixels are ignored
    rp.compare_values(1.0, opened.get_pixel(0, 0).unwrap() as f64, 0.0);
    rp.compare_values(1.0, opened.get_pixel(119, 129).unwrap() as f64, 0.0);
    rp.write_pix_and_check(&opened, ImageFormat::Png).unwrap();

    // The general path agrees with the separable brick path
    let sel = Sel::create_square(5).unwrap();
    rp.compare_pix(&opened, &open(&mask, &sel).unwrap());

    // Spots become foreground after inversion
    let spots = opened.invert_binary().unwrap();
    rp.compare_values(
        (spot_area + 400) as f64,
        spots.count_pixels().unwrap() as f64,
        0.0,
    );

    assert!(rp.cleanup(), "binmorph regression test failed");
}

#[test]
fn erode_then_dilate_bounds() {
    let field = SpotField::new(50, 50).spot(25, 25, 8);
    let spot = membrane_mask(&field.render_gray().unwrap())
        .invert_binary()
        .unwrap();
    let n = spot.count_pixels().unwrap();

    let grown = dilate_brick(&spot, 3, 3).unwrap();
    let shrunk = erode_brick(&spot, 3, 3).unwrap();
    assert!(grown.count_pixels().unwrap() > n);
    assert!(shrunk.count_pixels().unwrap() < n);

    // closing a convex blob changes nothing
    let closed = close_brick(&spot, 3, 3).unwrap();
    assert_eq!(closed.count_pixels().unwrap(), n);
}
