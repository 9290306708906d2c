//! elispot-io - Image I/O for spot analysis
//!
//! Reads the upload formats the analysis accepts (PNG, JPEG, TIFF) and
//! writes annotated results back out. The format of an input is detected
//! from its magic number, never from its file name.
//!
//! # Example
//!
//! ```no_run
//! use elispot_io::{ImageFormat, read_image, write_image};
//!
//! let pix = read_image("plate.tif").unwrap();
//! write_image(&pix, "plate.png", ImageFormat::Png).unwrap();
//! ```

mod error;
pub mod format;

#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "tiff-format")]
pub mod tiff;

pub use elispot_core::ImageFormat;
pub use error::{IoError, IoResult};
pub use format::{detect_format, detect_format_from_bytes, format_from_extension, format_from_path};

use elispot_core::Pix;
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

/// Read an image from a file path.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let data = std::fs::read(path)?;
    read_image_mem(&data)
}

/// Read an image from an in-memory encoded buffer.
pub fn read_image_mem(data: &[u8]) -> IoResult<Pix> {
    let format = detect_format_from_bytes(data)?;
    let cursor = Cursor::new(data);
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(cursor),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(cursor),
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => tiff::read_tiff(cursor),
        other => Err(IoError::UnsupportedFormat(format!(
            "reading {:?} is not enabled",
            other
        ))),
    }
}

/// Write an image to a file path in the given format.
///
/// JPEG output is written at quality 100.
pub fn write_image<P: AsRef<Path>>(pix: &Pix, path: P, format: ImageFormat) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_image_to(pix, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Encode an image into a byte vector.
pub fn write_image_mem(pix: &Pix, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_image_to(pix, &mut cursor, format)?;
    Ok(cursor.into_inner())
}

fn write_image_to<W: Write + Seek>(
    pix: &Pix,
    writer: &mut W,
    format: ImageFormat,
) -> IoResult<()> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(pix, writer),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::write_jpeg(pix, writer, jpeg::DEFAULT_QUALITY),
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => tiff::write_tiff(pix, writer),
        other => Err(IoError::UnsupportedFormat(format!(
            "writing {:?} is not enabled",
            other
        ))),
    }
}
