/// Number of longitudinal regions.
pub const Z_REGIONS: usize = 11;

/// Index of the barrel region around z = 0.
pub const CENTRAL_Z_REGION: usize = 5;

/// Upper edge (mm, inclusive) of each region; anything beyond the last edge
/// still maps to the outermost region.
const Z_REGION_UPPER_EDGES: [f32; Z_REGIONS] = [
    -2500.0, -1400.0, -925.0, -500.0, -250.0, 250.0, 500.0, 925.0, 1400.0, 2500.0, 100_000.0,
];

/// Strip traversal: outwards from the barrel, alternating sides.
pub const STRIP_Z_ORDER: [usize; Z_REGIONS] = [5, 6, 4, 7, 3, 8, 2, 9, 1, 10, 0];

/// Pixel traversal: negative endcap inwards, positive endcap inwards, then the
/// barrel.
pub const PIXEL_Z_ORDER: [usize; Z_REGIONS] = [0, 1, 2, 3, 10, 9, 8, 7, 5, 4, 6];

/// Region index of a longitudinal coordinate.
#[inline]
pub fn z_region(z: f32) -> usize {
    Z_REGION_UPPER_EDGES
        .partition_point(|&edge| edge < z)
        .min(Z_REGIONS - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_edges_are_inclusive() {
        assert_eq!(z_region(-3000.0), 0);
        assert_eq!(z_region(-2500.0), 0);
        assert_eq!(z_region(-2499.0), 1);
        assert_eq!(z_region(0.0), CENTRAL_Z_REGION);
        assert_eq!(z_region(250.0), 5);
        assert_eq!(z_region(250.5), 6);
        assert_eq!(z_region(2600.0), 10);
        assert_eq!(z_region(1.0e6), 10);
    }

    #[test]
    fn traversal_orders_visit_every_region_once() {
        for order in [STRIP_Z_ORDER, PIXEL_Z_ORDER] {
            let mut seen = [false; Z_REGIONS];
            for z in order {
                assert!(!seen[z]);
                seen[z] = true;
            }
            assert!(seen.iter().all(|&s| s));
        }
    }
}
