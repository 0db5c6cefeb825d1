use super::policy::SeedingPass;
use crate::conditions::{BeamConditions, MagneticField};
use crate::types::RawSpacePoint;
use serde::{Deserialize, Serialize};

/// Everything needed to seed one event without a framework around it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventInput {
    pub event_number: u64,
    #[serde(default)]
    pub beam: BeamConditions,
    #[serde(default)]
    pub field: MagneticField,
    #[serde(default)]
    pub pass: SeedingPass,
    pub space_points: Vec<RawSpacePoint>,
    /// Known primary-vertex z positions (mm); empty disables the vertex cut.
    #[serde(default)]
    pub vertices: Vec<f32>,
    /// Optional longitudinal window (mm) narrowing the configured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_window: Option<(f32, f32)>,
}
