//! Per-event conditions: beam spot placement and the solenoid field.
//!
//! Space points are moved into a beam-aligned frame before binning. The frame
//! is built from the beam-spot position and its two tilt angles, and the
//! field strength fixes the curvature-to-momentum conversion used by every
//! momentum cut of the event.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Field value assumed when the solenoid is off or reports zero (kT).
const FIELD_OFF_KILOTESLA: f64 = 0.005;

/// Beam-spot position (mm) and tilt angles (rad) of the luminous region.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BeamConditions {
    pub position: Vector3<f64>,
    pub tilt_x: f64,
    pub tilt_y: f64,
}

/// Magnetic field seen by the tracker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MagneticField {
    /// Uniform solenoid field along z, in kilotesla.
    Solenoid { bz_kilotesla: f64 },
    Off,
}

impl Default for MagneticField {
    fn default() -> Self {
        MagneticField::Solenoid { bz_kilotesla: 0.002 }
    }
}

impl MagneticField {
    /// Factor `K` converting transverse momentum (MeV) into the diameter of
    /// the helix projection (mm): `2 rho = K pt`.
    pub fn curvature_factor(&self) -> f32 {
        let bz = match *self {
            MagneticField::Solenoid { bz_kilotesla } if bz_kilotesla.abs() > 1e-9 => {
                bz_kilotesla.abs()
            }
            _ => FIELD_OFF_KILOTESLA,
        };
        (2.0 / (300.0 * bz)) as f32
    }
}

/// Rigid transform from global coordinates into the beam-aligned frame.
#[derive(Clone, Debug, PartialEq)]
pub struct BeamFrame {
    origin: Vector3<f32>,
    rotation: Matrix3<f32>,
}

impl Default for BeamFrame {
    fn default() -> Self {
        Self {
            origin: Vector3::zeros(),
            rotation: Matrix3::identity(),
        }
    }
}

impl BeamFrame {
    /// Rows of the rotation are the beam x, y and z axes expressed in global
    /// coordinates; the z axis follows the tilted beam line.
    pub fn from_conditions(beam: &BeamConditions) -> Self {
        let tx = beam.tilt_x.tan();
        let ty = beam.tilt_y.tan();
        let phi = ty.atan2(tx);
        let theta = (1.0 / (1.0 + tx * tx + ty * ty).sqrt()).acos();
        let (sin_t, cos_t) = theta.sin_cos();
        let (sin_p, cos_p) = phi.sin_cos();

        let rotation = Matrix3::new(
            cos_t * cos_p * cos_p + sin_p * sin_p,
            cos_t * sin_p * cos_p - sin_p * cos_p,
            -sin_t * cos_p,
            cos_t * cos_p * sin_p - sin_p * cos_p,
            cos_t * sin_p * sin_p + cos_p * cos_p,
            -sin_t * sin_p,
            sin_t * cos_p,
            sin_t * sin_p,
            cos_t,
        );

        Self {
            origin: beam.position.cast::<f32>(),
            rotation: rotation.cast::<f32>(),
        }
    }

    pub fn to_beam_frame(&self, global: &Vector3<f64>) -> Vector3<f32> {
        self.rotation * (global.cast::<f32>() - self.origin)
    }

    pub fn rotation(&self) -> &Matrix3<f32> {
        &self.rotation
    }
}

/// Momentum-cut constants derived once per event from the field and the
/// configured minimum transverse momentum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventConstants {
    /// Curvature factor `K`.
    pub k: f32,
    /// `(1 / pt_min)² / K²`: bound on the squared curvature.
    pub ipt2k: f32,
    /// `(1 / pt_min)² * COF`: multiple-scattering floor at minimum momentum.
    pub ipt2c: f32,
    /// `COF * K²`: multiple-scattering scale at the fitted curvature.
    pub cofk: f32,
}

impl EventConstants {
    pub fn new(field: MagneticField, inv_pt_min_sq: f32, scattering_coefficient: f32) -> Self {
        let k = field.curvature_factor();
        Self {
            k,
            ipt2k: inv_pt_min_sq / (k * k),
            ipt2c: inv_pt_min_sq * scattering_coefficient,
            cofk: scattering_coefficient * k * k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn untilted_frame_is_translation_only() {
        let beam = BeamConditions {
            position: Vector3::new(1.0, -2.0, 5.0),
            ..Default::default()
        };
        let frame = BeamFrame::from_conditions(&beam);
        let p = frame.to_beam_frame(&Vector3::new(31.0, 8.0, 15.0));
        assert!(approx_eq(p.x, 30.0));
        assert!(approx_eq(p.y, 10.0));
        assert!(approx_eq(p.z, 10.0));
    }

    #[test]
    fn tilted_frame_is_orthonormal() {
        let beam = BeamConditions {
            position: Vector3::zeros(),
            tilt_x: 1e-3,
            tilt_y: -2e-3,
        };
        let frame = BeamFrame::from_conditions(&beam);
        let r = frame.rotation();
        let product = r * r.transpose();
        assert!((product - Matrix3::identity()).norm() < 1e-5);
        assert!((r.determinant() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn curvature_factor_falls_back_when_field_is_off() {
        let on = MagneticField::Solenoid { bz_kilotesla: 0.002 };
        assert!(approx_eq(on.curvature_factor(), 2.0 / 0.6));
        let off = MagneticField::Off.curvature_factor();
        assert!(approx_eq(off, 2.0 / 1.5));
        let zero = MagneticField::Solenoid { bz_kilotesla: 0.0 };
        assert!(approx_eq(zero.curvature_factor(), off));
    }

    #[test]
    fn field_deserializes_from_tagged_json() {
        let f: MagneticField =
            serde_json::from_str(r#"{"kind": "solenoid", "bz_kilotesla": 0.004}"#).unwrap();
        assert_eq!(f, MagneticField::Solenoid { bz_kilotesla: 0.004 });
        let off: MagneticField = serde_json::from_str(r#"{"kind": "off"}"#).unwrap();
        assert_eq!(off, MagneticField::Off);
    }
}
