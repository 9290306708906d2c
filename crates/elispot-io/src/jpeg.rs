//! JPEG image format support
//!
//! Reads JPEG images with the `jpeg-decoder` crate and writes them with
//! `jpeg-encoder`. Grayscale decodes to 8 bpp (or 16 bpp for 12-bit
//! lossless data) and color (RGB or CMYK) to 32 bpp RGB.

use crate::{IoError, IoResult};
use elispot_core::{ImageFormat, Pix, PixelDepth, color};
use jpeg_decoder::{Decoder, PixelFormat};
use jpeg_encoder::{ColorType, Encoder};
use std::io::{Read, Write};

/// Quality used when the caller does not pick one.
pub const DEFAULT_QUALITY: u8 = 100;

/// Read a JPEG image from a reader.
///
/// # Arguments
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
///
/// # Returns
/// A `Pix` at 8 bpp (grayscale), 16 bpp (16-bit grayscale) or 32 bpp (RGB,
/// including converted CMYK).
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    let data = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let width = info.width as u32;
    let height = info.height as u32;
    let (depth, bytes_per_pixel) = match info.pixel_format {
        PixelFormat::L8 => (PixelDepth::Bit8, 1),
        PixelFormat::L16 => (PixelDepth::Bit16, 2),
        PixelFormat::RGB24 => (PixelDepth::Bit32, 3),
        PixelFormat::CMYK32 => (PixelDepth::Bit32, 4),
    };
    let expected = width as usize * height as usize * bytes_per_pixel;
    if data.len() < expected {
        return Err(IoError::InvalidData(format!(
            "JPEG data too short: {} < {}",
            data.len(),
            expected
        )));
    }

    let mut pix_mut = Pix::new(width, height, depth)?.into_mut();
    pix_mut.set_informat(ImageFormat::Jpeg);
    for y in 0..height {
        for x in 0..width {
            let idx = (y as usize * width as usize + x as usize) * bytes_per_pixel;
            let val = match depth {
                PixelDepth::Bit8 => data[idx] as u32,
                PixelDepth::Bit16 => ((data[idx] as u32) << 8) | data[idx + 1] as u32,
                _ if bytes_per_pixel == 4 => {
                    let (r, g, b) =
                        cmyk_to_rgb(data[idx], data[idx + 1], data[idx + 2], data[idx + 3]);
                    color::compose_rgb(r, g, b)
                }
                _ => color::compose_rgb(data[idx], data[idx + 1], data[idx + 2]),
            };
            pix_mut.set_pixel_unchecked(x, y, val);
        }
    }

    Ok(pix_mut.into())
}

/// Naive CMYK to RGB: each channel is `(255 - ink) * (255 - k) / 255`.
fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> (u8, u8, u8) {
    let white = 255 - k as u32;
    let ch = |ink: u8| ((255 - ink as u32) * white / 255) as u8;
    (ch(c), ch(m), ch(y))
}

/// Write a JPEG image.
///
/// 8 bpp is written as grayscale and 32 bpp as RGB (alpha dropped).
/// Binary images are expanded to 0/255 and 16 bpp keeps the high byte.
pub fn write_jpeg<W: Write>(pix: &Pix, writer: W, quality: u8) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();
    if width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(IoError::EncodeError(format!(
            "image too large for JPEG: {}x{}",
            width, height
        )));
    }

    let (color_type, data) = match pix.depth() {
        PixelDepth::Bit32 => {
            let mut data = Vec::with_capacity(width as usize * height as usize * 3);
            for y in 0..height {
                for x in 0..width {
                    let (r, g, b) = color::extract_rgb(pix.get_pixel_unchecked(x, y));
                    data.extend_from_slice(&[r, g, b]);
                }
            }
            (ColorType::Rgb, data)
        }
        depth => {
            let mut data = Vec::with_capacity(width as usize * height as usize);
            for y in 0..height {
                for x in 0..width {
                    let v = pix.get_pixel_unchecked(x, y);
                    data.push(match depth {
                        PixelDepth::Bit1 if v != 0 => 255,
                        PixelDepth::Bit1 => 0,
                        PixelDepth::Bit16 => (v >> 8) as u8,
                        _ => v as u8,
                    });
                }
            }
            (ColorType::Luma, data)
        }
    };

    let encoder = Encoder::new(writer, quality.clamp(1, 100));
    encoder
        .encode(&data, width as u16, height as u16, color_type)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))
}
