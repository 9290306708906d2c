//! Region selection by size

use crate::props::RegionProps;

/// Keep the regions whose area lies in `min_area..=max_area`.
///
/// Both bounds are inclusive. Order is preserved; an inverted range keeps
/// nothing.
pub fn select_by_area(props: &[RegionProps], min_area: u32, max_area: u32) -> Vec<RegionProps> {
    props
        .iter()
        .filter(|p| (min_area..=max_area).contains(&p.area))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::equivalent_diameter;
    use elispot_core::Box;

    fn region(label: u32, area: u32) -> RegionProps {
        RegionProps {
            label,
            area,
            centroid: (0.0, 0.0),
            bounds: Box::new_unchecked(0, 0, 1, 1),
            equivalent_diameter: equivalent_diameter(area),
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let props: Vec<_> = [9, 10, 11, 999, 1000, 1001]
            .iter()
            .enumerate()
            .map(|(i, &a)| region(i as u32 + 1, a))
            .collect();
        let kept: Vec<_> = select_by_area(&props, 10, 1000)
            .iter()
            .map(|p| p.area)
            .collect();
        assert_eq!(kept, vec![10, 11, 999, 1000]);
    }

    #[test]
    fn test_single_value_range_and_inverted_range() {
        let props = vec![region(1, 5), region(2, 6)];
        assert_eq!(select_by_area(&props, 5, 5).len(), 1);
        assert!(select_by_area(&props, 6, 5).is_empty());
        assert!(select_by_area(&[], 0, 10).is_empty());
    }
}
