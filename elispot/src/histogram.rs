//! Histogram of kept spot areas
//!
//! Equal-width bins spanning the area filter range; the last bin is closed
//! on the right so an area equal to the upper bound is counted.

use crate::analysis_error::{AnalysisError, ElispotResult};
use elispot_core::{Box, Color, Pix, PixelDepth};
use crate::report::csv_string;
use serde::Serialize;
use std::io::Write;

/// Binned spot areas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaHistogram {
    /// Left edge of the first bin
    pub lower: f64,
    /// Right edge of the last bin
    pub upper: f64,
    /// Spot count per bin
    pub counts: Vec<u32>,
}

#[derive(Serialize)]
struct HistogramRow {
    bin_start: f64,
    bin_end: f64,
    count: u32,
}

impl AreaHistogram {
    /// Bin `areas` into `bins` equal-width bins over `[min_area, max_area]`.
    ///
    /// A degenerate range `min == max` is widened to `[min - 0.5, max + 0.5]`.
    /// Areas outside the range are not counted.
    pub fn from_areas(
        areas: impl IntoIterator<Item = u32>,
        min_area: u32,
        max_area: u32,
        bins: usize,
    ) -> ElispotResult<Self> {
        if bins == 0 {
            return Err(AnalysisError::InvalidParams(
                "histogram needs at least one bin".to_string(),
            ));
        }
        let (mut lower, mut upper) = (min_area as f64, max_area as f64);
        if upper < lower {
            return Err(AnalysisError::InvalidParams(format!(
                "histogram range is inverted: {}..{}",
                min_area, max_area
            )));
        }
        if upper == lower {
            lower -= 0.5;
            upper += 0.5;
        }

        let mut counts = vec![0u32; bins];
        let width = (upper - lower) / bins as f64;
        for area in areas {
            let a = area as f64;
            if a < lower || a > upper {
                continue;
            }
            let idx = (((a - lower) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Ok(Self {
            lower,
            upper,
            counts,
        })
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.bins() as f64
    }

    /// The `bins + 1` bin edges.
    pub fn edges(&self) -> Vec<f64> {
        let w = self.bin_width();
        (0..=self.bins())
            .map(|i| self.lower + w * i as f64)
            .collect()
    }

    /// Number of areas counted.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Write `bin_start,bin_end,count` rows with a header line.
    pub fn write_csv<W: Write>(&self, writer: W) -> ElispotResult<()> {
        let edges = self.edges();
        let mut wtr = csv::Writer::from_writer(writer);
        for (i, &count) in self.counts.iter().enumerate() {
            wtr.serialize(HistogramRow {
                bin_start: edges[i],
                bin_end: edges[i + 1],
                count,
            })?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// The bins as a CSV string.
    pub fn to_csv(&self) -> ElispotResult<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        csv_string(buf)
    }

    /// Draw the histogram as a bar chart.
    ///
    /// White background, black axes along the left and bottom of the plot
    /// area and one filled bar per bin, scaled so the tallest bin reaches
    /// the top of the plot area. Returns a 32 bpp RGB image.
    pub fn render(&self, width: u32, height: u32) -> ElispotResult<Pix> {
        const MARGIN_LEFT: i32 = 30;
        const MARGIN_RIGHT: i32 = 10;
        const MARGIN_TOP: i32 = 10;
        const MARGIN_BOTTOM: i32 = 20;

        let plot_w = width as i32 - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = height as i32 - MARGIN_TOP - MARGIN_BOTTOM;
        if plot_w < self.bins() as i32 || plot_h < 1 {
            return Err(AnalysisError::InvalidParams(format!(
                "{}x{} is too small for a {}-bin histogram",
                width,
                height,
                self.bins()
            )));
        }

        let mut pm = Pix::new(width, height, PixelDepth::Bit32)?.into_mut();
        pm.set_spp(3);
        pm.render_filled_rect_color(
            &Box::new_unchecked(0, 0, width as i32, height as i32),
            Color::WHITE,
        )?;

        let x0 = MARGIN_LEFT;
        let base = MARGIN_TOP + plot_h;
        let peak = self.counts.iter().copied().max().unwrap_or(0);
        if peak > 0 {
            let bins = self.bins() as i32;
            for (i, &count) in self.counts.iter().enumerate() {
                let left = x0 + plot_w * i as i32 / bins;
                let right = x0 + plot_w * (i as i32 + 1) / bins;
                let bar_h = (plot_h as i64 * count as i64 / peak as i64) as i32;
                if bar_h == 0 {
                    continue;
                }
                let bar = Box::new_unchecked(left, base - bar_h, (right - left).max(1), bar_h);
                pm.render_filled_rect_color(&bar, Color::TAB_BLUE)?;
                if right - left > 2 {
                    pm.render_rect_color(&bar, Color::WHITE)?;
                }
            }
        }

        // Axes
        pm.render_line_color(x0 - 1, MARGIN_TOP, x0 - 1, base, Color::BLACK)?;
        pm.render_line_color(x0 - 1, base, x0 + plot_w, base, Color::BLACK)?;
        // Tick marks at the bin edges
        let bins = self.bins() as i32;
        for i in 0..=bins {
            let x = x0 + plot_w * i / bins;
            pm.render_line_color(x, base + 1, x, base + 3, Color::BLACK)?;
        }

        Ok(pm.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binning_is_closed_on_the_right() {
        let h = AreaHistogram::from_areas([10, 59, 60, 1000, 999], 10, 1000, 20).unwrap();
        assert_eq!(h.bin_width(), 49.5);
        assert_eq!(h.counts[0], 2);
        assert_eq!(h.counts[1], 1);
        assert_eq!(h.counts[19], 2);
        assert_eq!(h.total(), 5);
    }

    #[test]
    fn test_out_of_range_ignored() {
        let h = AreaHistogram::from_areas([5, 1001, 20], 10, 1000, 4).unwrap();
        assert_eq!(h.total(), 1);
    }

    #[test]
    fn test_degenerate_range() {
        let h = AreaHistogram::from_areas([7, 7], 7, 7, 2).unwrap();
        assert_eq!((h.lower, h.upper), (6.5, 7.5));
        assert_eq!(h.counts, vec![0, 2]);
    }

    #[test]
    fn test_empty_histogram() {
        let h = AreaHistogram::from_areas([], 10, 1000, 20).unwrap();
        assert_eq!(h.counts, vec![0; 20]);
        let csv = h.to_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("bin_start,bin_end,count"));
        let first: Vec<f64> = lines
            .next()
            .unwrap()
            .split(',')
            .map(|f| f.parse().unwrap())
            .collect();
        assert_eq!(first, vec![10.0, 59.5, 0.0]);
        assert_eq!(lines.count(), 19);
    }

    #[test]
    fn test_bad_arguments() {
        assert!(AreaHistogram::from_areas([1], 10, 5, 3).is_err());
        assert!(AreaHistogram::from_areas([1], 0, 5, 0).is_err());
    }

    #[test]
    fn test_render() {
        let h = AreaHistogram::from_areas([10, 10, 1000], 10, 1000, 4).unwrap();
        let pix = h.render(200, 100).unwrap();
        assert_eq!(pix.depth(), PixelDepth::Bit32);
        // background
        assert_eq!(pix.get_rgb(199, 0), Some((255, 255, 255)));
        // inside the tallest bar (first bin), just above the axis
        assert_eq!(pix.get_rgb(60, 75), Some((31, 119, 180)));
        // x axis
        assert_eq!(pix.get_rgb(100, 80), Some((0, 0, 0)));
        // the second bin is empty
        assert_eq!(pix.get_rgb(100, 75), Some((255, 255, 255)));
        assert!(h.render(20, 20).is_err());
    }
}
