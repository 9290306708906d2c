//! Connected component analysis
//!
//! This module provides functions for finding and labeling connected components
//! in binary images. It uses a two-pass scan with a Union-Find (disjoint set)
//! structure to merge provisional labels.

use crate::error::{RegionError, RegionResult};
use elispot_core::{Box, Pix, PixelDepth};

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    #[default]
    FourWay,
    /// 8-way connectivity (includes diagonals)
    EightWay,
}

/// A connected component in an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedComponent {
    /// Unique label for this component
    pub label: u32,
    /// Number of pixels in this component
    pub pixel_count: u32,
    /// Bounding box of this component
    pub bounds: Box,
}

impl ConnectedComponent {
    /// Create a new connected component
    pub fn new(label: u32, pixel_count: u32, bounds: Box) -> Self {
        Self {
            label,
            pixel_count,
            bounds,
        }
    }
}

/// Disjoint-set forest over provisional labels; index 0 is unused.
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        Self { parent: vec![0] }
    }

    fn make_set(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        id
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grand = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grand;
            x = grand;
        }
        x
    }

    /// Merge two sets; the smaller root survives.
    fn union(&mut self, a: u32, b: u32) -> u32 {
        let ra = self.find(a);
        let rb = self.find(b);
        let (keep, drop) = if ra <= rb { (ra, rb) } else { (rb, ra) };
        self.parent[drop as usize] = keep;
        keep
    }
}

/// Label all connected components in a binary image
///
/// Returns a 32-bit image where each pixel contains the label of its
/// component and background pixels are 0. Labels are dense `1..=n`,
/// numbered in raster order of each component's first pixel.
pub fn label_connected_components(pix: &Pix, connectivity: ConnectivityType) -> RegionResult<Pix> {
    check_binary(pix)?;

    let w = pix.width() as usize;
    let h = pix.height() as usize;
    let mut provisional = vec![0u32; w * h];
    let mut sets = UnionFind::new();

    // First pass: provisional labels from already-visited neighbours
    for y in 0..h {
        for x in 0..w {
            if pix.get_pixel_unchecked(x as u32, y as u32) == 0 {
                continue;
            }
            let mut current = 0u32;
            for (nx, ny) in visited_neighbors(x, y, w, connectivity) {
                let n = provisional[ny * w + nx];
                if n == 0 {
                    continue;
                }
                current = if current == 0 {
                    n
                } else {
                    sets.union(current, n)
                };
            }
            if current == 0 {
                current = sets.make_set();
            }
            provisional[y * w + x] = current;
        }
    }

    // Second pass: resolve roots and renumber in order of first appearance
    let mut final_label = vec![0u32; sets.parent.len()];
    let mut next = 0u32;
    let mut out = Pix::new(pix.width(), pix.height(), PixelDepth::Bit32)?.into_mut();
    for y in 0..h {
        for x in 0..w {
            let p = provisional[y * w + x];
            if p == 0 {
                continue;
            }
            let root = sets.find(p) as usize;
            if final_label[root] == 0 {
                next += 1;
                final_label[root] = next;
            }
            out.set_pixel_unchecked(x as u32, y as u32, final_label[root]);
        }
    }

    Ok(out.into())
}

/// Find all connected components in a binary image
///
/// Returns one entry per label of [`label_connected_components`], in label
/// order, each with its pixel count and bounding box.
pub fn find_connected_components(
    pix: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<ConnectedComponent>> {
    let labeled = label_connected_components(pix, connectivity)?;

    // (count, min_x, min_y, max_x, max_y) per label
    let mut stats: Vec<(u32, u32, u32, u32, u32)> = Vec::new();
    for y in 0..labeled.height() {
        for x in 0..labeled.width() {
            let label = labeled.get_pixel_unchecked(x, y) as usize;
            if label == 0 {
                continue;
            }
            if label > stats.len() {
                stats.resize(label, (0, u32::MAX, u32::MAX, 0, 0));
            }
            let s = &mut stats[label - 1];
            s.0 += 1;
            s.1 = s.1.min(x);
            s.2 = s.2.min(y);
            s.3 = s.3.max(x);
            s.4 = s.4.max(y);
        }
    }

    Ok(stats
        .into_iter()
        .enumerate()
        .map(|(i, (count, x0, y0, x1, y1))| {
            let bounds = Box::from_inclusive_corners(x0 as i32, y0 as i32, x1 as i32, y1 as i32);
            ConnectedComponent::new(i as u32 + 1, count, bounds)
        })
        .collect())
}

/// Neighbours scanned before `(x, y)` in raster order.
fn visited_neighbors(
    x: usize,
    y: usize,
    w: usize,
    connectivity: ConnectivityType,
) -> impl Iterator<Item = (usize, usize)> {
    let left = (x > 0).then(|| (x - 1, y));
    let up = (y > 0).then(|| (x, y - 1));
    let (up_left, up_right) = match connectivity {
        ConnectivityType::FourWay => (None, None),
        ConnectivityType::EightWay => (
            (x > 0 && y > 0).then(|| (x - 1, y - 1)),
            (x + 1 < w && y > 0).then(|| (x + 1, y - 1)),
        ),
    };
    [left, up_left, up, up_right].into_iter().flatten()
}

fn check_binary(pix: &Pix) -> RegionResult<()> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(RegionError::UnsupportedDepth {
            expected: "1-bpp binary",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_from_rows(rows: &[&str]) -> Pix {
        let mut pm = Pix::new(rows[0].len() as u32, rows.len() as u32, PixelDepth::Bit1)
            .unwrap()
            .into_mut();
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch != '.' {
                    pm.set_pixel(x as u32, y as u32, 1).unwrap();
                }
            }
        }
        pm.into()
    }

    fn labels_of(pix: &Pix) -> Vec<Vec<u32>> {
        (0..pix.height())
            .map(|y| (0..pix.width()).map(|x| pix.get_pixel(x, y).unwrap()).collect())
            .collect()
    }

    #[test]
    fn test_diagonal_connectivity() {
        let pix = binary_from_rows(&["x..", ".x.", "..x"]);
        let four = find_connected_components(&pix, ConnectivityType::FourWay).unwrap();
        let eight = find_connected_components(&pix, ConnectivityType::EightWay).unwrap();
        assert_eq!(four.len(), 3);
        assert_eq!(eight.len(), 1);
        assert_eq!(eight[0].pixel_count, 3);
        assert_eq!(eight[0].bounds, Box::new_unchecked(0, 0, 3, 3));
    }

    #[test]
    fn test_raster_order_labels() {
        let pix = binary_from_rows(&["...x", "x...", "x..x"]);
        let labeled = label_connected_components(&pix, ConnectivityType::EightWay).unwrap();
        assert_eq!(labeled.depth(), PixelDepth::Bit32);
        assert_eq!(
            labels_of(&labeled),
            vec![vec![0, 0, 0, 1], vec![2, 0, 0, 0], vec![2, 0, 0, 3]]
        );
    }

    #[test]
    fn test_u_shape_merges_to_first_label() {
        // the two arms get different provisional labels and meet at the bottom
        let pix = binary_from_rows(&["x.x", "x.x", "xxx"]);
        let labeled = label_connected_components(&pix, ConnectivityType::FourWay).unwrap();
        assert_eq!(
            labels_of(&labeled),
            vec![vec![1, 0, 1], vec![1, 0, 1], vec![1, 1, 1]]
        );
    }

    #[test]
    fn test_up_right_neighbor_merges() {
        let pix = binary_from_rows(&[".x", "x."]);
        let comps = find_connected_components(&pix, ConnectivityType::EightWay).unwrap();
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].pixel_count, 2);
    }

    #[test]
    fn test_empty_and_full() {
        let empty = Pix::new(7, 5, PixelDepth::Bit1).unwrap();
        assert!(
            find_connected_components(&empty, ConnectivityType::EightWay)
                .unwrap()
                .is_empty()
        );
        let full = empty.invert_binary().unwrap();
        let comps = find_connected_components(&full, ConnectivityType::FourWay).unwrap();
        assert_eq!(comps, vec![ConnectedComponent::new(1, 35, Box::new_unchecked(0, 0, 7, 5))]);
    }

    #[test]
    fn test_rejects_gray() {
        let pix = Pix::new(3, 3, PixelDepth::Bit8).unwrap();
        assert!(label_connected_components(&pix, ConnectivityType::EightWay).is_err());
    }
}
