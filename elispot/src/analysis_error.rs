//! Error types for the spot-analysis pipeline

use thiserror::Error;

/// Errors raised while loading, analysing or exporting an assay image
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] elispot_core::Error),

    /// Decoding or encoding failed
    #[error("image I/O error: {0}")]
    Io(#[from] elispot_io::IoError),

    /// Thresholding failed
    #[error("filter error: {0}")]
    Filter(#[from] elispot_filter::FilterError),

    /// Morphological cleaning failed
    #[error("morphology error: {0}")]
    Morph(#[from] elispot_morph::MorphError),

    /// Display rescaling failed
    #[error("transform error: {0}")]
    Transform(#[from] elispot_transform::TransformError),

    /// Labeling or measuring failed
    #[error("region error: {0}")]
    Region(#[from] elispot_region::RegionError),

    /// The uploaded image exceeds the size limit in at least one dimension
    #[error(
        "uploaded image exceeds the allowed image size: {width}x{height} (limit {limit}x{limit})"
    )]
    ImageTooLarge { width: u32, height: u32, limit: u32 },

    /// Parameter set failed validation
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Parameter file or summary could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV table could not be written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Artifact file could not be written
    #[error("file error: {0}")]
    File(#[from] std::io::Error),
}

/// Result type for pipeline operations
pub type ElispotResult<T> = Result<T, AnalysisError>;
