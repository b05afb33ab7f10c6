use model::{Point2, TelemetrySample};
use std::f64::consts::PI;

/// Planar rotation about the origin.
///
/// Built once per request from the circuit's orientation and shared by the
/// telemetry and corner paths so both land in the same frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    cos: f64,
    sin: f64,
}

impl Rotation {
    pub fn from_degrees(angle_degrees: f64) -> Self {
        let theta = angle_degrees / 180.0 * PI;
        Self { cos: theta.cos(), sin: theta.sin() }
    }

    pub fn identity() -> Self {
        Self { cos: 1.0, sin: 0.0 }
    }

    pub fn apply(&self, p: Point2) -> Point2 {
        Point2 {
            x: p.x * self.cos - p.y * self.sin,
            y: p.x * self.sin + p.y * self.cos,
        }
    }
}

pub fn rotation_matrix(angle_degrees: f64) -> Rotation {
    Rotation::from_degrees(angle_degrees)
}

pub fn apply(rotation: &Rotation, points: &[Point2]) -> Vec<Point2> {
    points.iter().map(|p| rotation.apply(*p)).collect()
}

/// Returns copies of `samples` with their positions rotated; every other
/// channel is carried over untouched.
pub fn rotate_samples(rotation: &Rotation, samples: &[TelemetrySample]) -> Vec<TelemetrySample> {
    samples
        .iter()
        .map(|s| {
            let p = rotation.apply(s.position());
            TelemetrySample { x: p.x, y: p.y, ..s.clone() }
        })
        .collect()
}
