//! elispot-region - Region processing
//!
//! This crate provides:
//!
//! - **Connected component analysis** - labeling connected foreground regions
//! - **Region properties** - area, centroid and equivalent diameter per label
//! - **Selection** - keeping regions whose area lies in a range
//!
//! # Examples
//!
//! ```
//! use elispot_region::{ConnectivityType, label_connected_components, region_properties};
//! use elispot_core::{Pix, PixelDepth};
//!
//! let mut pix_mut = Pix::new(20, 20, PixelDepth::Bit1).unwrap().into_mut();
//! pix_mut.set_pixel(3, 3, 1).unwrap();
//! pix_mut.set_pixel(4, 4, 1).unwrap();
//! pix_mut.set_pixel(15, 2, 1).unwrap();
//! let pix: Pix = pix_mut.into();
//!
//! let labeled = label_connected_components(&pix, ConnectivityType::EightWay).unwrap();
//! let props = region_properties(&labeled).unwrap();
//! assert_eq!(props.len(), 2);
//! // labels follow raster order: the lone pixel on row 2 comes first
//! assert_eq!(props[0].area, 1);
//! assert_eq!(props[1].area, 2);
//! ```

pub mod conncomp;
mod error;
pub mod props;
pub mod select;

pub use conncomp::{
    ConnectedComponent, ConnectivityType, find_connected_components, label_connected_components,
};
pub use error::{RegionError, RegionResult};
pub use props::{RegionProps, equivalent_diameter, region_properties};
pub use select::select_by_area;
