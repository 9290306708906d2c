//! The spot-detection pipeline
//!
//! load → gray → normalize → size check → display rescale → adaptive
//! threshold → open → invert → label → measure → area filter → annotate.

use crate::analysis_error::{AnalysisError, ElispotResult};
use crate::annotate::{annotate_spots, comparison_image};
use crate::histogram::AreaHistogram;
use crate::params::AnalysisParams;
use crate::report::SpotReport;
use elispot_core::{ImageFormat, Pix};
use elispot_filter::adaptive_threshold;
use elispot_morph::open_brick;
use elispot_region::{
    ConnectivityType, RegionProps, label_connected_components, region_properties, select_by_area,
};
use elispot_transform::scale_to_width;
use std::path::Path;
use tracing::{debug, info, warn};

/// A decoded upload, reduced to the 8 bpp intensity grid the analysis runs on
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Normalized (and rescaled) 8 bpp gray image
    pub gray: Pix,
    /// Size of the decoded upload
    pub input_width: u32,
    pub input_height: u32,
    /// Container format of the upload
    pub format: ImageFormat,
}

/// Outcome of one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub input_width: u32,
    pub input_height: u32,
    /// Size of the analysed (rescaled) image
    pub width: u32,
    pub height: u32,
    /// Number of spots that passed the area filter
    pub count: usize,
    /// Regions that passed the area filter, in label order
    pub spots: Vec<RegionProps>,
    /// Number of labeled regions before filtering
    pub total_regions: usize,
    /// The analysed gray image
    pub gray: Pix,
    /// RGB copy of `gray` with a circle around every spot
    pub annotated: Pix,
    /// Areas of the kept spots
    pub histogram: AreaHistogram,
    /// Parameters the run used
    pub params: AnalysisParams,
}

impl AnalysisResult {
    /// Gray input and annotated output side by side.
    pub fn comparison(&self) -> ElispotResult<Pix> {
        comparison_image(&self.gray, &self.annotated)
    }

    /// One row per kept spot.
    pub fn report(&self) -> SpotReport {
        SpotReport::from_regions(&self.spots)
    }
}

/// Decode an image file and prepare it for analysis.
pub fn load_image(path: impl AsRef<Path>, params: &AnalysisParams) -> ElispotResult<LoadedImage> {
    let path = path.as_ref();
    debug!(path = %path.display(), "decoding image");
    let pix = elispot_io::read_image(path)?;
    prepare_image(&pix, params)
}

/// Decode an in-memory image file and prepare it for analysis.
pub fn load_image_mem(data: &[u8], params: &AnalysisParams) -> ElispotResult<LoadedImage> {
    debug!(bytes = data.len(), "decoding image from memory");
    let pix = elispot_io::read_image_mem(data)?;
    prepare_image(&pix, params)
}

/// Turn a decoded image into the analysis grid.
///
/// Rejects images wider or taller than `params.max_image_size` (an image
/// exactly at the limit is accepted), converts to intensity, stretches to
/// the full 8-bit range and rescales to `params.display_width`. 16 bpp
/// input is stretched at full precision.
pub fn prepare_image(pix: &Pix, params: &AnalysisParams) -> ElispotResult<LoadedImage> {
    params.validate()?;
    let (width, height) = (pix.width(), pix.height());
    let limit = params.max_image_size;
    if width > limit || height > limit {
        warn!(width, height, limit, "image exceeds the allowed size");
        return Err(AnalysisError::ImageTooLarge {
            width,
            height,
            limit,
        });
    }

    let gray = pix.convert_to_gray()?.normalize_to_full_range()?;
    debug!(
        width,
        height,
        depth = pix.depth().bits(),
        "normalized to full range"
    );

    let gray = match params.display_width {
        Some(target) => {
            let scaled = scale_to_width(&gray, target)?;
            debug!(
                width = scaled.width(),
                height = scaled.height(),
                "rescaled for display"
            );
            scaled
        }
        None => gray,
    };

    Ok(LoadedImage {
        gray,
        input_width: width,
        input_height: height,
        format: pix.informat(),
    })
}

/// Detect, filter and annotate the spots of a prepared image.
pub fn analyze(image: &LoadedImage, params: &AnalysisParams) -> ElispotResult<AnalysisResult> {
    params.validate()?;
    let gray = &image.gray;

    let mask = adaptive_threshold(gray, &params.threshold_options())?;
    debug!(
        block_size = params.block_size,
        constant = params.constant,
        "thresholded"
    );

    let k = params.open_kernel_size;
    let opened = open_brick(&mask, k, k)?;
    let foreground = opened.invert_binary()?;

    let labeled = label_connected_components(&foreground, ConnectivityType::EightWay)?;
    let regions = region_properties(&labeled)?;
    let spots = select_by_area(&regions, params.min_area, params.max_area);
    debug!(
        regions = regions.len(),
        kept = spots.len(),
        min_area = params.min_area,
        max_area = params.max_area,
        "filtered regions by area"
    );

    let annotated = annotate_spots(gray, &spots)?;
    let histogram = AreaHistogram::from_areas(
        spots.iter().map(|s| s.area),
        params.min_area,
        params.max_area,
        params.histogram_bins,
    )?;

    info!(count = spots.len(), "spots detected");
    Ok(AnalysisResult {
        input_width: image.input_width,
        input_height: image.input_height,
        width: gray.width(),
        height: gray.height(),
        count: spots.len(),
        total_regions: regions.len(),
        gray: gray.clone(),
        annotated,
        histogram,
        params: params.clone(),
        spots,
    })
}

/// Load and analyse an image file in one step.
pub fn analyze_file(
    path: impl AsRef<Path>,
    params: &AnalysisParams,
) -> ElispotResult<AnalysisResult> {
    let image = load_image(path, params)?;
    analyze(&image, params)
}
