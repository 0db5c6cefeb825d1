use crate::angle::azimuth;
use crate::conditions::BeamFrame;
use crate::types::{RawSpacePoint, Subsystem, SurfaceId};

/// Quality every point starts an event with; seeds must score at or below a
/// point's current quality to improve it.
pub const INITIAL_POINT_QUALITY: f32 = 100_000.0;

/// Space point in beam-frame coordinates with the derived quantities the
/// triplet search reads in its inner loops.
#[derive(Clone, Debug, PartialEq)]
pub struct SeedPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub radius: f32,
    pub phi: f32,
    pub cov_r: f32,
    pub cov_z: f32,
    pub subsystem: Subsystem,
    pub surface: SurfaceId,
    /// Position of the raw point in the caller's input sequence.
    pub source: usize,
    quality: f32,
}

impl SeedPoint {
    pub fn from_raw(raw: &RawSpacePoint, source: usize, frame: &BeamFrame) -> Self {
        let local = frame.to_beam_frame(&raw.position);
        let (x, y, z) = (local.x, local.y, local.z);
        Self {
            x,
            y,
            z,
            radius: (x * x + y * y).sqrt(),
            phi: azimuth(x, y),
            cov_r: raw.covariance[0] as f32,
            cov_z: raw.covariance[1] as f32,
            subsystem: raw.subsystem(),
            surface: raw.surface,
            source,
            quality: INITIAL_POINT_QUALITY,
        }
    }

    #[inline]
    pub fn is_pixel(&self) -> bool {
        self.subsystem.is_pixel()
    }

    /// Best (lowest) quality of any seed accepted through this point.
    #[inline]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Lowers the point quality to `q` when `q` is at least as good.
    /// Returns whether the point took the new value.
    #[inline]
    pub(crate) fn improve_quality(&mut self, q: f32) -> bool {
        if q <= self.quality {
            self.quality = q;
            true
        } else {
            false
        }
    }
}
