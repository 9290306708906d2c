//! Scale regression test
//!
//! Rescales synthetic plates to the display width and checks geometry and
//! that intensities are preserved away from spot edges.
//!
//! Run with:
//! ```
//! cargo test -p elispot-transform --test scale_reg
//! ```

use elispot_core::{ImageFormat, PixelDepth};
use elispot_test::{RegParams, SpotField};
use elispot_transform::{scale_to_size, scale_to_width};

#[test]
fn scale_reg() {
    let mut rp = RegParams::new("scale");

    // Downscale: 900x600 -> 674x449
    let field = SpotField::new(900, 600).spot(450, 300, 40).spot(120, 80, 25);
    let pix = field.render_gray().unwrap();
    let small = scale_to_width(&pix, 674).unwrap();
    rp.compare_values(674.0, small.width() as f64, 0.0);
    rp.compare_values(449.0, small.height() as f64, 0.0);
    rp.compare_values(40.0, small.get_pixel(337, 224).unwrap() as f64, 0.0);
    rp.compare_values(200.0, small.get_pixel(600, 400).unwrap() as f64, 0.0);
    rp.write_pix_and_check(&small, ImageFormat::Png).unwrap();

    // Upscale: 337x200 -> 674x400
    let field = SpotField::new(337, 200).spot(168, 100, 20);
    let pix = field.render_rgb().unwrap();
    let big = scale_to_width(&pix, 674).unwrap();
    rp.compare_values(400.0, big.height() as f64, 0.0);
    rp.compare_values(32.0, big.depth().bits() as f64, 0.0);
    let (r, g, b) = big.get_rgb(337, 200).unwrap();
    rp.compare_values(40.0, r as f64, 0.0);
    rp.compare_values(r as f64, g as f64, 0.0);
    rp.compare_values(r as f64, b as f64, 0.0);

    assert!(rp.cleanup(), "scale regression test failed");
}

#[test]
fn exact_fit_is_untouched() {
    let pix = SpotField::new(674, 300).spot(10, 10, 3).render_gray().unwrap();
    let same = scale_to_width(&pix, 674).unwrap();
    assert_eq!(same.height(), 300);
    assert_eq!(same.get_pixel(10, 10), Some(40));
    assert_eq!(same.depth(), PixelDepth::Bit8);
}

#[test]
fn zero_target_is_rejected() {
    let pix = SpotField::new(10, 10).render_gray().unwrap();
    assert!(scale_to_size(&pix, 0, 5).is_err());
}
