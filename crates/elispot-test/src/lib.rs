//! elispot-test - Regression test framework for elispot-rs
//!
//! Provides a golden-file regression harness supporting three modes:
//!
//! - **Generate**: Create golden files for comparison
//! - **Compare**: Compare results with golden files
//! - **Display**: Run tests without comparison (visual inspection)
//!
//! plus [`SpotField`], a builder for synthetic plate images with known
//! spots.
//!
//! # Usage
//!
//! ```ignore
//! use elispot_test::{RegParams, SpotField};
//!
//! let pix = SpotField::new(200, 200).grid(3, 3, 6).render_gray()?;
//! let mut rp = RegParams::new("pipeline");
//! rp.compare_values(9.0, count as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"

mod error;
mod params;
mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};
pub use synth::{Spot, SpotField, disc_area};

use elispot_core::{ImageFormat, Pix};
use tempfile::NamedTempFile;

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // elispot-test is at crates/elispot-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

/// Encode `pix` into a temporary file with the format's extension.
///
/// The file is deleted when the returned handle is dropped.
pub fn write_temp_image(pix: &Pix, format: ImageFormat) -> TestResult<NamedTempFile> {
    let file = tempfile::Builder::new()
        .prefix("elispot-")
        .suffix(&format!(".{}", format.extension()))
        .tempfile()?;
    elispot_io::write_image(pix, file.path(), format).map_err(|e| TestError::ImageWrite {
        path: file.path().display().to_string(),
        message: e.to_string(),
    })?;
    Ok(file)
}

/// Read an image written by [`write_temp_image`] or a test fixture.
pub fn load_image(path: &std::path::Path) -> TestResult<Pix> {
    elispot_io::read_image(path).map_err(|e| TestError::ImageLoad {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
