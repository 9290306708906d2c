//! Connected component regression test
//!
//! Labels the spots of synthetic plates and checks counts, raster-order
//! labels, areas and centroids against the generated geometry.
//!
//! Run with:
//! ```
//! cargo test -p elispot-region --test conncomp_reg
//! ```

use elispot_core::{Pix, PixelDepth};
use elispot_region::{
    ConnectivityType, find_connected_components, label_connected_components, region_properties,
    select_by_area,
};
use elispot_test::{RegParams, SpotField, disc_area};

/// Spots ON wherever the gray level is dark.
fn spot_mask(gray: &Pix) -> Pix {
    let mut pm = Pix::new(gray.width(), gray.height(), PixelDepth::Bit1)
        .unwrap()
        .into_mut();
    for y in 0..gray.height() {
        for x in 0..gray.width() {
            if gray.get_pixel(x, y).unwrap() < 120 {
                pm.set_pixel(x, y, 1).unwrap();
            }
        }
    }
    pm.into()
}

#[test]
fn conncomp_reg() {
    let mut rp = RegParams::new("conncomp");

    let field = SpotField::new(160, 120)
        .grid(3, 4, 4)
        .spot(10, 10, 1)
        .spot(150, 110, 7);
    let mask = spot_mask(&field.render_gray().unwrap());

    let labeled = label_connected_components(&mask, ConnectivityType::EightWay).unwrap();
    let props = region_properties(&labeled).unwrap();
    rp.compare_values(14.0, props.len() as f64, 0.0);

    // Raster order: the small spot at (10, 10) is scanned first
    rp.compare_values(1.0, labeled.get_pixel(10, 10).unwrap() as f64, 0.0);
    rp.compare_values(disc_area(1) as f64, props[0].area as f64, 0.0);
    // and the large one at the bottom-right last
    let last = props.last().unwrap();
    rp.compare_values(14.0, last.label as f64, 0.0);
    rp.compare_values(disc_area(7) as f64, last.area as f64, 0.0);
    rp.compare_values(110.0, last.centroid_row(), 1e-9);
    rp.compare_values(150.0, last.centroid_col(), 1e-9);

    // Grid spots are symmetric discs: centroid equals the center
    for spot in &field.spots()[..12] {
        let label = labeled.get_pixel(spot.cx as u32, spot.cy as u32).unwrap();
        let p = &props[label as usize - 1];
        rp.compare_values(disc_area(4) as f64, p.area as f64, 0.0);
        rp.compare_values(spot.cy as f64, p.centroid.0, 1e-9);
        rp.compare_values(spot.cx as f64, p.centroid.1, 1e-9);
    }

    // Component boxes agree with the region boxes
    let comps = find_connected_components(&mask, ConnectivityType::EightWay).unwrap();
    rp.compare_values(props.len() as f64, comps.len() as f64, 0.0);
    for (c, p) in comps.iter().zip(&props) {
        rp.compare_values(c.pixel_count as f64, p.area as f64, 0.0);
        rp.compare_values(1.0, (c.bounds == p.bounds) as u32 as f64, 0.0);
    }

    // Size selection drops the 5-pixel speck and the large spot
    let kept = select_by_area(&props, disc_area(1) + 1, disc_area(4));
    rp.compare_values(12.0, kept.len() as f64, 0.0);

    assert!(rp.cleanup(), "conncomp regression test failed");
}

#[test]
fn touching_diagonal_spots_merge_under_eight_way() {
    // two squares meeting at a single corner
    let mut pm = Pix::new(10, 10, PixelDepth::Bit1).unwrap().into_mut();
    for (x0, y0) in [(1, 1), (4, 4)] {
        for y in y0..y0 + 3 {
            for x in x0..x0 + 3 {
                pm.set_pixel(x, y, 1).unwrap();
            }
        }
    }
    let pix: Pix = pm.into();
    let eight = find_connected_components(&pix, ConnectivityType::EightWay).unwrap();
    let four = find_connected_components(&pix, ConnectivityType::FourWay).unwrap();
    assert_eq!(eight.len(), 1);
    assert_eq!(eight[0].pixel_count, 18);
    assert_eq!(four.len(), 2);
}
