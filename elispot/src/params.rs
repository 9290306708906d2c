//! Analysis parameters
//!
//! Defaults match the interactive tool the pipeline was calibrated with.
//! A parameter file only needs the fields it changes; everything else
//! falls back to [`AnalysisParams::default`].

use crate::analysis_error::{AnalysisError, ElispotResult};
use elispot_filter::{AdaptiveMethod, AdaptiveThresholdOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Local-mean weighting for the adaptive threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMethod {
    /// Gaussian-weighted window mean
    #[default]
    Gaussian,
    /// Plain window mean
    Mean,
}

impl From<ThresholdMethod> for AdaptiveMethod {
    fn from(method: ThresholdMethod) -> Self {
        match method {
            ThresholdMethod::Gaussian => AdaptiveMethod::Gaussian,
            ThresholdMethod::Mean => AdaptiveMethod::Mean,
        }
    }
}

/// User-tunable settings of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Side of the square thresholding window (odd, 5..=101 in the UI)
    pub block_size: u32,
    /// Offset subtracted from the local mean (2..=50 in the UI)
    pub constant: f32,
    /// Smallest spot area kept, inclusive (2..=50 in the UI)
    pub min_area: u32,
    /// Largest spot area kept, inclusive (500..=2000 in the UI)
    pub max_area: u32,
    /// Largest accepted width or height of the uploaded image
    pub max_image_size: u32,
    /// Width the image is rescaled to before analysis; `None` keeps it
    pub display_width: Option<u32>,
    /// Side of the square opening element
    pub open_kernel_size: u32,
    /// Number of bins of the area histogram
    pub histogram_bins: usize,
    /// Local-mean weighting
    pub method: ThresholdMethod,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            block_size: 41,
            constant: 10.0,
            min_area: 10,
            max_area: 1000,
            max_image_size: 1000,
            display_width: Some(674),
            open_kernel_size: 5,
            histogram_bins: 20,
            method: ThresholdMethod::Gaussian,
        }
    }
}

impl AnalysisParams {
    /// Parse a JSON parameter set; missing fields take their defaults.
    pub fn from_json(text: &str) -> ElispotResult<Self> {
        let params: Self = serde_json::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    /// Read a JSON parameter file.
    pub fn load(path: impl AsRef<Path>) -> ElispotResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> ElispotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the structural constraints the pipeline relies on.
    ///
    /// The interactive slider ranges are not enforced.
    pub fn validate(&self) -> ElispotResult<()> {
        let invalid = |msg: String| Err(AnalysisError::InvalidParams(msg));
        if self.block_size < 3 || self.block_size % 2 == 0 {
            return invalid(format!(
                "block_size must be odd and >= 3, got {}",
                self.block_size
            ));
        }
        if !self.constant.is_finite() {
            return invalid(format!("constant must be finite, got {}", self.constant));
        }
        if self.min_area > self.max_area {
            return invalid(format!(
                "min_area {} exceeds max_area {}",
                self.min_area, self.max_area
            ));
        }
        if self.open_kernel_size == 0 {
            return invalid("open_kernel_size must be at least 1".to_string());
        }
        if self.histogram_bins == 0 {
            return invalid("histogram_bins must be at least 1".to_string());
        }
        if self.max_image_size == 0 {
            return invalid("max_image_size must be at least 1".to_string());
        }
        if self.display_width == Some(0) {
            return invalid("display_width must be at least 1".to_string());
        }
        Ok(())
    }

    pub(crate) fn threshold_options(&self) -> AdaptiveThresholdOptions {
        AdaptiveThresholdOptions {
            window_size: self.block_size,
            c: self.constant,
            method: self.method.into(),
        }
    }
}
