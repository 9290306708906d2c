//! PNG image format support
//!
//! Grayscale (1/2/4/8/16 bit), gray+alpha, RGB, RGBA and indexed PNGs are
//! read. Sub-byte gray is widened to 8 bpp; palettes are expanded to RGB.

use crate::{IoError, IoResult};
use elispot_core::{ImageFormat, Pix, PixelDepth, color};
use png::{BitDepth, ColorType, Decoder, Encoder};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Pix> {
    let decoder = Decoder::new(reader);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;
    let palette: Option<Vec<u8>> = info.palette.as_ref().map(|p| p.to_vec());

    let (pix_depth, spp) = match (color_type, bit_depth) {
        (ColorType::Grayscale, BitDepth::One) => (PixelDepth::Bit1, 1),
        (ColorType::Grayscale, BitDepth::Two | BitDepth::Four | BitDepth::Eight) => {
            (PixelDepth::Bit8, 1)
        }
        (ColorType::Grayscale, BitDepth::Sixteen) => (PixelDepth::Bit16, 1),
        (ColorType::GrayscaleAlpha, _) => (PixelDepth::Bit32, 4),
        (ColorType::Rgb, _) | (ColorType::Indexed, _) => (PixelDepth::Bit32, 3),
        (ColorType::Rgba, _) => (PixelDepth::Bit32, 4),
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let mut pix_mut = Pix::new(width, height, pix_depth)?.into_mut();
    pix_mut.set_spp(spp);
    pix_mut.set_informat(ImageFormat::Png);

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    let bits = bit_depth as u32;

    for y in 0..height {
        let row = &data[y as usize * bytes_per_row..(y as usize + 1) * bytes_per_row];
        for x in 0..width {
            let xi = x as usize;
            let val = match (color_type, bit_depth) {
                (ColorType::Grayscale, BitDepth::Sixteen) => {
                    ((row[2 * xi] as u32) << 8) | row[2 * xi + 1] as u32
                }
                (ColorType::Grayscale, BitDepth::One) => packed_sample(row, x, 1),
                (ColorType::Grayscale, _) => {
                    let max = (1u32 << bits) - 1;
                    packed_sample(row, x, bits) * 255 / max
                }
                (ColorType::Indexed, _) => {
                    let index = packed_sample(row, x, bits) as usize;
                    let (r, g, b) = palette
                        .as_deref()
                        .and_then(|p| p.get(3 * index..3 * index + 3))
                        .map(|c| (c[0], c[1], c[2]))
                        .ok_or_else(|| {
                            IoError::InvalidData(format!("palette index {} out of range", index))
                        })?;
                    color::compose_rgb(r, g, b)
                }
                (ColorType::GrayscaleAlpha, _) => {
                    let step = if bit_depth == BitDepth::Sixteen { 2 } else { 1 };
                    let idx = xi * 2 * step;
                    let (g, a) = (row[idx], row[idx + step]);
                    color::compose_rgba(g, g, g, a)
                }
                (ColorType::Rgb, _) => {
                    let step = if bit_depth == BitDepth::Sixteen { 2 } else { 1 };
                    let idx = xi * 3 * step;
                    color::compose_rgb(row[idx], row[idx + step], row[idx + 2 * step])
                }
                (ColorType::Rgba, _) => {
                    let step = if bit_depth == BitDepth::Sixteen { 2 } else { 1 };
                    let idx = xi * 4 * step;
                    color::compose_rgba(
                        row[idx],
                        row[idx + step],
                        row[idx + 2 * step],
                        row[idx + 3 * step],
                    )
                }
            };
            pix_mut.set_pixel_unchecked(x, y, val);
        }
    }

    Ok(pix_mut.into())
}

/// Sample `x` of a row packed MSB-first at `bits` (1, 2, 4 or 8) per sample.
#[inline]
fn packed_sample(row: &[u8], x: u32, bits: u32) -> u32 {
    let per_byte = 8 / bits;
    let byte = row[(x / per_byte) as usize] as u32;
    let shift = 8 - bits * (x % per_byte + 1);
    (byte >> shift) & ((1 << bits) - 1)
}

/// Write a PNG image
///
/// 1 bpp is written as 1-bit grayscale, 8 and 16 bpp as grayscale, and
/// 32 bpp as RGB (or RGBA when the image has four samples per pixel).
pub fn write_png<W: Write>(pix: &Pix, writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();

    let (color_type, bit_depth, bytes_per_row) = match pix.depth() {
        PixelDepth::Bit1 => (ColorType::Grayscale, BitDepth::One, width.div_ceil(8)),
        PixelDepth::Bit8 => (ColorType::Grayscale, BitDepth::Eight, width),
        PixelDepth::Bit16 => (ColorType::Grayscale, BitDepth::Sixteen, width * 2),
        PixelDepth::Bit32 if pix.spp() == 4 => (ColorType::Rgba, BitDepth::Eight, width * 4),
        PixelDepth::Bit32 => (ColorType::Rgb, BitDepth::Eight, width * 3),
    };
    let bytes_per_row = bytes_per_row as usize;

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(bit_depth);
    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let mut data = vec![0u8; bytes_per_row * height as usize];
    for y in 0..height {
        let row = &mut data[y as usize * bytes_per_row..(y as usize + 1) * bytes_per_row];
        for x in 0..width {
            let val = pix.get_pixel_unchecked(x, y);
            let xi = x as usize;
            match (pix.depth(), color_type) {
                (PixelDepth::Bit1, _) => {
                    if val != 0 {
                        row[xi / 8] |= 0x80 >> (xi % 8);
                    }
                }
                (PixelDepth::Bit8, _) => row[xi] = val as u8,
                (PixelDepth::Bit16, _) => {
                    row[2 * xi] = (val >> 8) as u8;
                    row[2 * xi + 1] = val as u8;
                }
                (_, ColorType::Rgba) => {
                    let (r, g, b, a) = color::extract_rgba(val);
                    row[4 * xi..4 * xi + 4].copy_from_slice(&[r, g, b, a]);
                }
                _ => {
                    let (r, g, b) = color::extract_rgb(val);
                    row[3 * xi..3 * xi + 3].copy_from_slice(&[r, g, b]);
                }
            }
        }
    }

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    Ok(())
}
