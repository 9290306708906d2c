//! elispot-filter - Linear filtering and local thresholding
//!
//! This crate provides:
//!
//! - Convolution kernels (box, Gaussian, arbitrary)
//! - Separable convolution with replicated borders
//! - Adaptive (local mean) thresholding of grayscale images

pub mod convolve;
mod error;
pub mod kernel;
pub mod threshold;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

pub use convolve::{box_blur, convolve_gray, convolve_sep_gray, gaussian_blur};
pub use threshold::{AdaptiveMethod, AdaptiveThresholdOptions, adaptive_threshold};
