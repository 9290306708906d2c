//! ELISpot - spot detection and counting for ELISpot assay images
//!
//! Each well image is reduced to gray, stretched to the full 8-bit range,
//! thresholded against its Gaussian-weighted local mean, cleaned with a
//! 5x5 opening and inverted so that the dark spots become foreground. The
//! 8-connected foreground regions whose area falls inside the configured
//! range are the spots.
//!
//! # Example
//!
//! ```
//! use elispot::{AnalysisParams, Pix, PixelDepth, analyze, prepare_image};
//!
//! // A flat well has no spots
//! let pix = Pix::new(64, 48, PixelDepth::Bit8).unwrap();
//! let params = AnalysisParams::default();
//! let image = prepare_image(&pix, &params).unwrap();
//! let result = analyze(&image, &params).unwrap();
//! assert_eq!(result.count, 0);
//! ```

mod analysis_error;
mod annotate;
mod artifacts;
mod histogram;
mod params;
mod pipeline;
mod report;

pub use analysis_error::{AnalysisError, ElispotResult};
pub use annotate::{COMPARISON_GAP, SPOT_COLOR, annotate_spots, comparison_image, marker_circle};
pub use artifacts::{ArtifactOptions, ArtifactPaths, write_artifacts};
pub use histogram::AreaHistogram;
pub use params::{AnalysisParams, ThresholdMethod};
pub use pipeline::{
    AnalysisResult, LoadedImage, analyze, analyze_file, load_image, load_image_mem, prepare_image,
};
pub use report::{AnalysisSummary, SpotRecord, SpotReport};

// Re-export core types (primary data structures used everywhere)
pub use elispot_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use elispot_filter as filter;
pub use elispot_io as io;
pub use elispot_morph as morph;
pub use elispot_region as region;
pub use elispot_transform as transform;
