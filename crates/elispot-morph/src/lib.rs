//! elispot-morph - Binary morphology
//!
//! This crate provides:
//!
//! - Structuring elements (SEL) for defining operation neighborhoods
//! - Binary erosion, dilation, opening and closing on 1 bpp images
//!
//! Pixels outside the image never take part in an operation: erosion
//! only tests positions inside the image and dilation only writes them.

pub mod binary;
mod error;
pub mod sel;

pub use error::{MorphError, MorphResult};
pub use sel::Sel;

pub use binary::{close, close_brick, dilate, dilate_brick, erode, erode_brick, open, open_brick};
