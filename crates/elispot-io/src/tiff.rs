//! TIFF image format support
//!
//! Only the first page of a TIFF is read. Microscope exports are often
//! 16-bit or floating point; 16-bit gray is kept at full precision, float
//! data is min-max scaled into 8 bits.

use crate::{IoError, IoResult};
use elispot_core::{ImageFormat, Pix, PixMut, PixelDepth, color};
use std::io::{Read, Seek, Write};
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::TiffEncoder;
use tiff::encoder::colortype::{Gray8, Gray16, RGB8, RGBA8};

/// Read the first page of a TIFF image
pub fn read_tiff<R: Read + Seek>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("TIFF decoder error: {}", e)))?;
    let (width, height) = decoder
        .dimensions()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF dimensions: {}", e)))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF color type: {}", e)))?;

    let (depth, spp) = match color_type {
        ColorType::Gray(1) => (PixelDepth::Bit1, 1),
        ColorType::Gray(8) => (PixelDepth::Bit8, 1),
        ColorType::Gray(16) => (PixelDepth::Bit16, 1),
        // float and wide integer gray is scaled into 8 bits
        ColorType::Gray(_) => (PixelDepth::Bit8, 1),
        ColorType::RGB(8 | 16) => (PixelDepth::Bit32, 3),
        ColorType::RGBA(8 | 16) => (PixelDepth::Bit32, 4),
        ColorType::GrayA(8 | 16) => (PixelDepth::Bit32, 4),
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported TIFF color type: {:?}",
                color_type
            )));
        }
    };

    let image_data = decoder
        .read_image()
        .map_err(|e| IoError::DecodeError(format!("Failed to read TIFF image data: {}", e)))?;

    let mut pix_mut = Pix::new(width, height, depth)?.into_mut();
    pix_mut.set_spp(spp);

    match image_data {
        DecodingResult::U8(data) => convert_u8_to_pix(&data, &mut pix_mut, color_type)?,
        DecodingResult::U16(data) => convert_u16_to_pix(&data, &mut pix_mut, color_type)?,
        DecodingResult::U32(data) => {
            let values: Vec<f64> = data.iter().map(|&v| v as f64).collect();
            convert_scaled_to_pix(&values, &mut pix_mut)?
        }
        DecodingResult::F16(data) => {
            let values: Vec<f64> = data.iter().map(|v: &half::f16| v.to_f64()).collect();
            convert_scaled_to_pix(&values, &mut pix_mut)?
        }
        DecodingResult::F32(data) => {
            let values: Vec<f64> = data.iter().map(|&v| v as f64).collect();
            convert_scaled_to_pix(&values, &mut pix_mut)?
        }
        DecodingResult::F64(data) => convert_scaled_to_pix(&data, &mut pix_mut)?,
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported TIFF sample format for {:?}",
                color_type
            )));
        }
    }

    pix_mut.set_informat(ImageFormat::Tiff);
    Ok(pix_mut.into())
}

fn check_len(data_len: usize, pix_mut: &PixMut, samples: usize) -> IoResult<()> {
    let expected = pix_mut.width() as usize * pix_mut.height() as usize * samples;
    if data_len < expected {
        return Err(IoError::InvalidData(format!(
            "TIFF data too short: {} < {}",
            data_len, expected
        )));
    }
    Ok(())
}

/// Convert U8 data to Pix format
fn convert_u8_to_pix(data: &[u8], pix_mut: &mut PixMut, color_type: ColorType) -> IoResult<()> {
    let width = pix_mut.width();
    let height = pix_mut.height();

    match color_type {
        ColorType::Gray(1) => {
            // packed 8 pixels per byte, rows padded to a byte
            let bytes_per_row = width.div_ceil(8) as usize;
            if data.len() < bytes_per_row * height as usize {
                return Err(IoError::InvalidData("TIFF data too short".to_string()));
            }
            for y in 0..height {
                for x in 0..width {
                    let byte = data[y as usize * bytes_per_row + (x / 8) as usize];
                    let val = (byte >> (7 - (x % 8))) & 1;
                    pix_mut.set_pixel_unchecked(x, y, val as u32);
                }
            }
        }
        ColorType::Gray(8) => {
            check_len(data.len(), pix_mut, 1)?;
            for y in 0..height {
                for x in 0..width {
                    let idx = (y * width + x) as usize;
                    pix_mut.set_pixel_unchecked(x, y, data[idx] as u32);
                }
            }
        }
        ColorType::RGB(8) => {
            check_len(data.len(), pix_mut, 3)?;
            for y in 0..height {
                for x in 0..width {
                    let idx = ((y * width + x) * 3) as usize;
                    let pixel = color::compose_rgb(data[idx], data[idx + 1], data[idx + 2]);
                    pix_mut.set_pixel_unchecked(x, y, pixel);
                }
            }
        }
        ColorType::RGBA(8) => {
            check_len(data.len(), pix_mut, 4)?;
            for y in 0..height {
                for x in 0..width {
                    let idx = ((y * width + x) * 4) as usize;
                    let pixel = color::compose_rgba(
                        data[idx],
                        data[idx + 1],
                        data[idx + 2],
                        data[idx + 3],
                    );
                    pix_mut.set_pixel_unchecked(x, y, pixel);
                }
            }
        }
        ColorType::GrayA(8) => {
            check_len(data.len(), pix_mut, 2)?;
            for y in 0..height {
                for x in 0..width {
                    let idx = ((y * width + x) * 2) as usize;
                    let g = data[idx];
                    pix_mut.set_pixel_unchecked(x, y, color::compose_rgba(g, g, g, data[idx + 1]));
                }
            }
        }
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported color type for U8 data: {:?}",
                color_type
            )));
        }
    }
    Ok(())
}

/// Convert U16 data to Pix format
fn convert_u16_to_pix(data: &[u16], pix_mut: &mut PixMut, color_type: ColorType) -> IoResult<()> {
    let width = pix_mut.width();
    let height = pix_mut.height();

    let samples = match color_type {
        ColorType::Gray(16) => 1,
        ColorType::GrayA(16) => 2,
        ColorType::RGB(16) => 3,
        ColorType::RGBA(16) => 4,
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported color type for U16 data: {:?}",
                color_type
            )));
        }
    };
    check_len(data.len(), pix_mut, samples)?;

    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) as usize * samples;
            let hi = |i: usize| (data[idx + i] >> 8) as u8;
            let pixel = match samples {
                1 => data[idx] as u32,
                2 => color::compose_rgba(hi(0), hi(0), hi(0), hi(1)),
                3 => color::compose_rgb(hi(0), hi(1), hi(2)),
                _ => color::compose_rgba(hi(0), hi(1), hi(2), hi(3)),
            };
            pix_mut.set_pixel_unchecked(x, y, pixel);
        }
    }
    Ok(())
}

/// Min-max scale single-channel samples into an 8 bpp image.
fn convert_scaled_to_pix(data: &[f64], pix_mut: &mut PixMut) -> IoResult<()> {
    if pix_mut.depth() != PixelDepth::Bit8 {
        return Err(IoError::UnsupportedFormat(
            "only single-channel wide samples are supported".to_string(),
        ));
    }
    check_len(data.len(), pix_mut, 1)?;
    let width = pix_mut.width();
    let height = pix_mut.height();

    let finite = data.iter().copied().filter(|v| v.is_finite());
    let min = finite.clone().fold(f64::INFINITY, f64::min);
    let max = finite.fold(f64::NEG_INFINITY, f64::max);
    let range = if max > min { max - min } else { 1.0 };

    for y in 0..height {
        for x in 0..width {
            let v = data[(y * width + x) as usize];
            let scaled = if v.is_finite() {
                ((v - min) / range * 255.0).clamp(0.0, 255.0) as u32
            } else {
                0
            };
            pix_mut.set_pixel_unchecked(x, y, scaled);
        }
    }
    Ok(())
}

/// Write a single-page uncompressed TIFF image
pub fn write_tiff<W: Write + Seek>(pix: &Pix, writer: W) -> IoResult<()> {
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| IoError::EncodeError(format!("TIFF encoder error: {}", e)))?;
    let width = pix.width();
    let height = pix.height();
    let map_err = |e: tiff::TiffError| IoError::EncodeError(format!("TIFF write error: {}", e));

    match pix.depth() {
        PixelDepth::Bit1 | PixelDepth::Bit8 => {
            let binary = pix.depth() == PixelDepth::Bit1;
            let mut data = Vec::with_capacity((width * height) as usize);
            for y in 0..height {
                for x in 0..width {
                    let v = pix.get_pixel_unchecked(x, y);
                    data.push(match (binary, v) {
                        (true, 0) => 0,
                        (true, _) => 255,
                        (false, v) => v as u8,
                    });
                }
            }
            encoder
                .write_image::<Gray8>(width, height, &data)
                .map_err(map_err)?;
        }
        PixelDepth::Bit16 => {
            let mut data = Vec::with_capacity((width * height) as usize);
            for y in 0..height {
                for x in 0..width {
                    data.push(pix.get_pixel_unchecked(x, y) as u16);
                }
            }
            encoder
                .write_image::<Gray16>(width, height, &data)
                .map_err(map_err)?;
        }
        PixelDepth::Bit32 if pix.spp() == 4 => {
            let mut data = Vec::with_capacity((width * height * 4) as usize);
            for y in 0..height {
                for x in 0..width {
                    let (r, g, b, a) = color::extract_rgba(pix.get_pixel_unchecked(x, y));
                    data.extend_from_slice(&[r, g, b, a]);
                }
            }
            encoder
                .write_image::<RGBA8>(width, height, &data)
                .map_err(map_err)?;
        }
        PixelDepth::Bit32 => {
            let mut data = Vec::with_capacity((width * height * 3) as usize);
            for y in 0..height {
                for x in 0..width {
                    let (r, g, b) = color::extract_rgb(pix.get_pixel_unchecked(x, y));
                    data.extend_from_slice(&[r, g, b]);
                }
            }
            encoder
                .write_image::<RGB8>(width, height, &data)
                .map_err(map_err)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn roundtrip(pix: &Pix) -> Pix {
        let mut buf = Cursor::new(Vec::new());
        write_tiff(pix, &mut buf).unwrap();
        buf.set_position(0);
        read_tiff(buf).unwrap()
    }

    #[test]
    fn test_tiff_roundtrip_16_bit() {
        let mut pm = Pix::new(4, 3, PixelDepth::Bit16).unwrap().to_mut();
        pm.set_pixel(3, 2, 51234).unwrap();
        pm.set_pixel(0, 0, 7).unwrap();
        let back = roundtrip(&pm.into());
        assert_eq!(back.depth(), PixelDepth::Bit16);
        assert_eq!(back.informat(), ImageFormat::Tiff);
        assert_eq!(back.get_pixel(3, 2), Some(51234));
        assert_eq!(back.get_pixel(0, 0), Some(7));
    }

    #[test]
    fn test_tiff_roundtrip_rgb() {
        let mut pm = Pix::new(3, 3, PixelDepth::Bit32).unwrap().to_mut();
        pm.set_rgb(1, 1, 12, 34, 56).unwrap();
        let back = roundtrip(&pm.into());
        assert_eq!(back.get_rgb(1, 1), Some((12, 34, 56)));
    }

    #[test]
    fn test_tiff_binary_written_as_gray() {
        let mut pm = Pix::new(3, 1, PixelDepth::Bit1).unwrap().to_mut();
        pm.set_pixel(2, 0, 1).unwrap();
        let back = roundtrip(&pm.into());
        assert_eq!(back.depth(), PixelDepth::Bit8);
        assert_eq!(back.get_pixel(2, 0), Some(255));
        assert_eq!(back.get_pixel(0, 0), Some(0));
    }

    #[test]
    fn test_scaled_float_samples() {
        let mut pm = Pix::new(3, 1, PixelDepth::Bit8).unwrap().to_mut();
        convert_scaled_to_pix(&[-1.0, 0.0, 1.0], &mut pm).unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.get_pixel(0, 0), Some(0));
        assert_eq!(pix.get_pixel(1, 0), Some(127));
        assert_eq!(pix.get_pixel(2, 0), Some(255));
    }
}
