//! Tabular spot report and run summary
//!
//! [`SpotReport`] holds one row per kept spot and renders to CSV;
//! [`AnalysisSummary`] is the JSON document written next to the images.

use crate::analysis_error::{AnalysisError, ElispotResult};
use crate::annotate::marker_circle;
use crate::histogram::AreaHistogram;
use crate::params::AnalysisParams;
use crate::pipeline::AnalysisResult;
use elispot_region::RegionProps;
use serde::Serialize;
use std::io::Write;

/// One detected spot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotRecord {
    /// 1-based index among the kept spots
    pub spot: usize,
    /// Label in the label image
    pub label: u32,
    pub area: u32,
    /// Centroid column
    pub centroid_x: f64,
    /// Centroid row
    pub centroid_y: f64,
    pub equivalent_diameter: f64,
    /// Radius of the drawn marker
    pub radius: u32,
    pub bbox_x: i32,
    pub bbox_y: i32,
    pub bbox_w: i32,
    pub bbox_h: i32,
}

const CSV_HEADER: [&str; 11] = [
    "spot",
    "label",
    "area",
    "centroid_x",
    "centroid_y",
    "equivalent_diameter",
    "radius",
    "bbox_x",
    "bbox_y",
    "bbox_w",
    "bbox_h",
];

/// Per-spot table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SpotReport {
    pub rows: Vec<SpotRecord>,
}

impl SpotReport {
    /// One row per region, numbered in the given order.
    pub fn from_regions(spots: &[RegionProps]) -> Self {
        let rows = spots
            .iter()
            .enumerate()
            .map(|(i, p)| SpotRecord {
                spot: i + 1,
                label: p.label,
                area: p.area,
                centroid_x: p.centroid_col(),
                centroid_y: p.centroid_row(),
                equivalent_diameter: p.equivalent_diameter,
                radius: marker_circle(p).2,
                bbox_x: p.bounds.x,
                bbox_y: p.bounds.y,
                bbox_w: p.bounds.w,
                bbox_h: p.bounds.h,
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the table as CSV with a header line.
    ///
    /// The header is written even when there are no rows.
    pub fn write_csv<W: Write>(&self, writer: W) -> ElispotResult<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(CSV_HEADER)?;
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// The table as a CSV string.
    pub fn to_csv(&self) -> ElispotResult<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        csv_string(buf)
    }
}

/// CSV output is built from numbers and field names only.
pub(crate) fn csv_string(buf: Vec<u8>) -> ElispotResult<String> {
    String::from_utf8(buf).map_err(|e| {
        AnalysisError::File(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// Everything about a run except the images
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    /// Source file, when the image came from disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub input_width: u32,
    pub input_height: u32,
    /// Size after the display rescale
    pub width: u32,
    pub height: u32,
    /// Number of spots kept by the area filter
    pub count: usize,
    /// Number of labeled regions before the area filter
    pub total_regions: usize,
    pub params: AnalysisParams,
    pub histogram: AreaHistogram,
    pub spots: SpotReport,
}

impl AnalysisSummary {
    pub fn new(result: &AnalysisResult, image: Option<String>) -> Self {
        Self {
            image,
            input_width: result.input_width,
            input_height: result.input_height,
            width: result.width,
            height: result.height,
            count: result.count,
            total_regions: result.total_regions,
            params: result.params.clone(),
            histogram: result.histogram.clone(),
            spots: SpotReport::from_regions(&result.spots),
        }
    }

    pub fn to_json(&self) -> ElispotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elispot_core::Box;
    use elispot_region::equivalent_diameter;

    fn region(label: u32, area: u32) -> RegionProps {
        RegionProps {
            label,
            area,
            centroid: (12.25, 30.5),
            bounds: Box::new_unchecked(27, 9, 8, 7),
            equivalent_diameter: equivalent_diameter(area),
        }
    }

    #[test]
    fn test_rows_are_numbered_from_one() {
        let report = SpotReport::from_regions(&[region(4, 50), region(9, 79)]);
        assert_eq!(report.len(), 2);
        assert_eq!(report.rows[0].spot, 1);
        assert_eq!(report.rows[1].spot, 2);
        assert_eq!(report.rows[1].label, 9);
        assert_eq!(report.rows[0].radius, 3);
        assert_eq!(report.rows[0].centroid_x, 30.5);
        assert_eq!(report.rows[0].centroid_y, 12.25);
    }

    #[test]
    fn test_csv() {
        let csv = SpotReport::from_regions(&[region(4, 50)]).to_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER.join(",").as_str()));
        let fields: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(fields.len(), CSV_HEADER.len());
        assert_eq!(&fields[..3], &["1", "4", "50"]);
        assert_eq!(fields[3].parse::<f64>().unwrap(), 30.5);
        assert_eq!(fields[4].parse::<f64>().unwrap(), 12.25);
        assert!((fields[5].parse::<f64>().unwrap() - equivalent_diameter(50)).abs() < 1e-12);
        assert_eq!(&fields[6..], &["3", "27", "9", "8", "7"]);
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_csv_has_header_only() {
        let report = SpotReport::from_regions(&[]);
        assert!(report.is_empty());
        assert_eq!(report.to_csv().unwrap(), format!("{}\n", CSV_HEADER.join(",")));
    }

    #[test]
    fn test_report_serializes_as_array() {
        let json = serde_json::to_value(SpotReport::from_regions(&[region(1, 10)])).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["area"], 10);
        assert_eq!(json[0]["bbox_w"], 8);
    }
}
