//! Writing the products of a run to a directory

use crate::analysis_error::{AnalysisError, ElispotResult};
use crate::pipeline::AnalysisResult;
use crate::report::AnalysisSummary;
use elispot_core::ImageFormat;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How [`write_artifacts`] renders its files
#[derive(Debug, Clone)]
pub struct ArtifactOptions {
    /// Format of the annotated and comparison images
    pub format: ImageFormat,
    /// Size of the rendered histogram chart
    pub histogram_width: u32,
    pub histogram_height: u32,
    /// Source name recorded in the summary
    pub image_name: Option<String>,
}

impl Default for ArtifactOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            histogram_width: 640,
            histogram_height: 400,
            image_name: None,
        }
    }
}

/// Paths of the files written by [`write_artifacts`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub annotated: PathBuf,
    pub comparison: PathBuf,
    pub histogram_image: PathBuf,
    pub histogram_csv: PathBuf,
    pub spots_csv: PathBuf,
    pub summary: PathBuf,
}

impl ArtifactPaths {
    fn new(dir: &Path, ext: &str) -> Self {
        Self {
            annotated: dir.join(format!("annotated.{ext}")),
            comparison: dir.join(format!("comparison.{ext}")),
            histogram_image: dir.join("histogram.png"),
            histogram_csv: dir.join("histogram.csv"),
            spots_csv: dir.join("spots.csv"),
            summary: dir.join("summary.json"),
        }
    }

    /// All paths in write order.
    pub fn all(&self) -> [&Path; 6] {
        [
            &self.annotated,
            &self.comparison,
            &self.histogram_image,
            &self.histogram_csv,
            &self.spots_csv,
            &self.summary,
        ]
    }
}

fn write_text(path: &Path, text: &str) -> ElispotResult<()> {
    std::fs::write(path, text)?;
    debug!(path = %path.display(), "wrote");
    Ok(())
}

/// Write the annotated image, the side-by-side comparison, the histogram
/// chart and tables, and a JSON summary into `out_dir`.
///
/// The directory is created if needed; existing files are overwritten.
pub fn write_artifacts(
    result: &AnalysisResult,
    out_dir: impl AsRef<Path>,
    options: &ArtifactOptions,
) -> ElispotResult<ArtifactPaths> {
    if options.format == ImageFormat::Unknown {
        return Err(AnalysisError::InvalidParams(
            "artifact image format must be png, jpeg or tiff".to_string(),
        ));
    }
    let dir = out_dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let paths = ArtifactPaths::new(dir, options.format.extension());

    elispot_io::write_image(&result.annotated, &paths.annotated, options.format)?;
    debug!(path = %paths.annotated.display(), "wrote");
    elispot_io::write_image(&result.comparison()?, &paths.comparison, options.format)?;
    debug!(path = %paths.comparison.display(), "wrote");

    let chart = result
        .histogram
        .render(options.histogram_width, options.histogram_height)?;
    elispot_io::write_image(&chart, &paths.histogram_image, ImageFormat::Png)?;
    debug!(path = %paths.histogram_image.display(), "wrote");

    result
        .histogram
        .write_csv(File::create(&paths.histogram_csv)?)?;
    debug!(path = %paths.histogram_csv.display(), "wrote");
    result.report().write_csv(File::create(&paths.spots_csv)?)?;
    debug!(path = %paths.spots_csv.display(), "wrote");
    let summary = AnalysisSummary::new(result, options.image_name.clone());
    write_text(&paths.summary, &summary.to_json()?)?;

    info!(dir = %dir.display(), "artifacts written");
    Ok(paths)
}
