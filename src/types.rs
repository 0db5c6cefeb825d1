//! Shared value types: raw space points handed in by the caller and the seeds
//! handed back.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Identifier of a detector cluster. A strip space point carries two of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterId(pub u64);

/// Identifier of the detector element (surface) a measurement was taken on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

/// Cluster association of a space point. Pixel points have a single cluster,
/// strip points are built from two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterPair {
    pub first: ClusterId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<ClusterId>,
}

/// Tracker subsystem a space point belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    Pixel,
    Strip,
}

impl Subsystem {
    #[inline]
    pub fn is_pixel(self) -> bool {
        matches!(self, Subsystem::Pixel)
    }
}

/// Measured space point in global detector coordinates (millimetres).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpacePoint {
    pub position: Vector3<f64>,
    /// Radial and longitudinal variance `[cov_r, cov_z]` (mm²).
    pub covariance: [f64; 2],
    pub clusters: ClusterPair,
    pub surface: SurfaceId,
}

impl RawSpacePoint {
    pub fn pixel(position: Vector3<f64>, covariance: [f64; 2], cluster: u64, surface: u64) -> Self {
        Self {
            position,
            covariance,
            clusters: ClusterPair {
                first: ClusterId(cluster),
                second: None,
            },
            surface: SurfaceId(surface),
        }
    }

    pub fn strip(
        position: Vector3<f64>,
        covariance: [f64; 2],
        clusters: (u64, u64),
        surface: u64,
    ) -> Self {
        Self {
            position,
            covariance,
            clusters: ClusterPair {
                first: ClusterId(clusters.0),
                second: Some(ClusterId(clusters.1)),
            },
            surface: SurfaceId(surface),
        }
    }

    /// Pixel when the point has a single cluster, strip otherwise.
    pub fn subsystem(&self) -> Subsystem {
        if self.clusters.second.is_some() {
            Subsystem::Strip
        } else {
            Subsystem::Pixel
        }
    }

    /// Transverse distance from the global z axis.
    pub fn transverse_radius(&self) -> f64 {
        self.position.xy().norm()
    }
}

/// Index of a space point inside the per-event store of a seeding session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpacePointId(pub u32);

impl SpacePointId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Subsystem composition of a triplet, bottom to top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeedType {
    /// Three pixel points.
    Ppp,
    /// Pixel bottom, strip top.
    Pps,
    /// Three strip points.
    Sss,
    /// Any other combination.
    Mixed,
}

impl SeedType {
    pub fn classify(bottom: Subsystem, central: Subsystem, top: Subsystem) -> Self {
        use Subsystem::{Pixel, Strip};
        match (bottom, central, top) {
            (Pixel, Pixel, Pixel) => SeedType::Ppp,
            (Strip, Strip, Strip) => SeedType::Sss,
            (Pixel, _, Strip) => SeedType::Pps,
            _ => SeedType::Mixed,
        }
    }

    /// Stable integer code used in audit records.
    pub fn code(self) -> u8 {
        match self {
            SeedType::Ppp => 0,
            SeedType::Pps => 1,
            SeedType::Sss => 2,
            SeedType::Mixed => 3,
        }
    }
}

/// Track-parameter estimate attached to a seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedEstimate {
    /// Transverse impact parameter estimate (mm).
    pub d0: f32,
    /// Signed curvature `1 / (2 rho)` in the conformal frame (1/mm).
    pub curvature: f32,
    /// Transverse momentum implied by the curvature (MeV).
    pub pt: f32,
    /// Pseudorapidity from the bottom-central slope.
    pub eta: f32,
    /// dz/dr of the bottom-central link.
    pub dzdr_bottom: f32,
    /// dz/dr of the central-top link.
    pub dzdr_top: f32,
}

/// Three space points ordered by radius with a vertex estimate and a score
/// (lower is better).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    pub bottom: SpacePointId,
    pub central: SpacePointId,
    pub top: SpacePointId,
    /// Longitudinal position of the bottom-central line at r = 0 (mm).
    pub z_vertex: f32,
    pub quality: f32,
    pub seed_type: SeedType,
    pub estimate: SeedEstimate,
}

impl Seed {
    pub fn points(&self) -> [SpacePointId; 3] {
        [self.bottom, self.central, self.top]
    }
}
