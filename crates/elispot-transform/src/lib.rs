//! elispot-transform - Image rescaling
//!
//! Resizes gray and color images for display: area mapping when shrinking,
//! bilinear interpolation when enlarging.

mod error;
pub mod scale;

pub use error::{TransformError, TransformResult};
pub use scale::{ScaleMethod, scale_area_map, scale_bilinear, scale_to_size, scale_to_width};
