use nalgebra::Vector3;
use si_seed_finder::RawSpacePoint;

/// Pixel point with zero covariance; cluster and surface ids are both `id`.
pub fn pixel(x: f64, y: f64, z: f64, id: u64) -> RawSpacePoint {
    RawSpacePoint::pixel(Vector3::new(x, y, z), [0.0, 0.0], id, id)
}

/// Points at the given radii on a circle of `radius` that passes through the
/// origin, centred on the positive y axis.
pub fn circle_through_origin(radius: f64, radii: &[f64], first_id: u64) -> Vec<RawSpacePoint> {
    radii
        .iter()
        .enumerate()
        .map(|(i, &r)| {
            let y = r * r / (2.0 * radius);
            let x = (r * r - y * y).sqrt();
            pixel(x, y, 0.0, first_id + i as u64)
        })
        .collect()
}

/// Straight track from the origin at azimuth `phi` with slope `dzdr`.
pub fn radial_track(phi: f64, dzdr: f64, radii: &[f64], first_id: u64) -> Vec<RawSpacePoint> {
    radii
        .iter()
        .enumerate()
        .map(|(i, &r)| pixel(r * phi.cos(), r * phi.sin(), r * dzdr, first_id + i as u64))
        .collect()
}

/// `tracks` straight tracks evenly spread in azimuth, each with three points
/// at 30, 70 and 110 mm and its own slope.
pub fn spread_tracks(tracks: usize) -> Vec<RawSpacePoint> {
    let mut points = Vec::with_capacity(tracks * 3);
    for k in 0..tracks {
        let phi = std::f64::consts::TAU * k as f64 / tracks as f64 + 0.05;
        let dzdr = 0.2 * (k as f64 - tracks as f64 / 2.0) / tracks as f64;
        points.extend(radial_track(phi, dzdr, &[30.0, 70.0, 110.0], 3 * k as u64));
    }
    points
}

/// Points at the given radii on a circle of `radius` whose closest approach
/// to the origin is `d0`, centred on the positive y axis.
pub fn displaced_circle(radius: f64, d0: f64, radii: &[f64], first_id: u64) -> Vec<RawSpacePoint> {
    let centre = radius + d0;
    radii
        .iter()
        .enumerate()
        .map(|(i, &r)| {
            let y = (r * r + centre * centre - radius * radius) / (2.0 * centre);
            let x = (r * r - y * y).sqrt();
            pixel(x, y, 0.0, first_id + i as u64)
        })
        .collect()
}

/// Strip point with zero covariance; its two clusters and surface derive
/// from `id`.
pub fn strip(x: f64, y: f64, z: f64, id: u64) -> RawSpacePoint {
    RawSpacePoint::strip(Vector3::new(x, y, z), [0.0, 0.0], (2 * id, 2 * id + 1), id)
}

/// `bundles` groups of `per_bundle` straight tracks. Tracks of a group are
/// 3 mrad apart in azimuth, so every occupied azimuthal bin holds several
/// seeds. Each track has pixel points at `pixel_radii` and strip points at
/// `strip_radii`.
pub fn bundled_tracks(
    bundles: usize,
    per_bundle: usize,
    pixel_radii: &[f64],
    strip_radii: &[f64],
) -> Vec<RawSpacePoint> {
    let mut points = Vec::new();
    let mut id = 0;
    for b in 0..bundles {
        let base = std::f64::consts::TAU * b as f64 / bundles as f64 + 0.05;
        for t in 0..per_bundle {
            let phi = base + 0.003 * t as f64;
            let dzdr = 0.01 * (t as f64 - b as f64 % 3.0);
            let (c, s) = (phi.cos(), phi.sin());
            for &r in pixel_radii {
                points.push(pixel(r * c, r * s, r * dzdr, id));
                id += 1;
            }
            for &r in strip_radii {
                points.push(strip(r * c, r * s, r * dzdr, id));
                id += 1;
            }
        }
    }
    points
}
