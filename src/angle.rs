//! Angle and pseudorapidity utilities used across the seed search.

use std::f32::consts::TAU;

/// Wraps an azimuth into the range [0, 2π).
#[inline]
pub fn wrap_two_pi(phi: f32) -> f32 {
    let wrapped = phi.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Azimuth of a transverse position wrapped into [0, 2π).
#[inline]
pub fn azimuth(x: f32, y: f32) -> f32 {
    wrap_two_pi(y.atan2(x))
}

/// Converts a pseudorapidity into the corresponding dz/dr (cot θ).
#[inline]
pub fn eta_to_dzdr(eta: f64) -> f64 {
    1.0 / (2.0 * (-eta).exp().atan()).tan()
}

/// Pseudorapidity of a direction with slope `dzdr` (cot θ).
#[inline]
pub fn dzdr_to_eta(dzdr: f32) -> f32 {
    dzdr.asinh()
}
