//! Position and orientation value types shared by every camera record.
//!
//! Both types are `Copy`: capturing the avatar's transform into a record, or
//! handing a record's transform back to the host, never aliases live state.

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A world-space position in double precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world units.
    pub position: DVec3,
}

impl Transform {
    /// The origin. Used whenever the host cannot supply a transform.
    pub const ZERO: Self = Self {
        position: DVec3::ZERO,
    };

    /// Creates a transform at `(x, y, z)`.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: DVec3::new(x, y, z),
        }
    }

    /// Returns this transform moved by `delta`.
    pub fn translated(self, delta: DVec3) -> Self {
        Self {
            position: self.position + delta,
        }
    }

    /// Squared distance between the two positions.
    pub fn distance_squared(&self, other: &Transform) -> f64 {
        self.position.distance_squared(other.position)
    }

    /// `true` when `other` lies within `tolerance` of this transform.
    ///
    /// Compares squared distances, so a tolerance of `0.01` accepts drift up
    /// to a squared distance of `1e-4`.
    pub fn is_close(&self, other: &Transform, tolerance: f64) -> bool {
        self.distance_squared(other) <= tolerance * tolerance
    }
}

impl From<DVec3> for Transform {
    fn from(position: DVec3) -> Self {
        Self { position }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position;
        write!(f, "({:.3}, {:.3}, {:.3})", p.x, p.y, p.z)
    }
}

/// Yaw/pitch/roll angles in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    /// Rotation about the vertical axis.
    pub yaw: f32,
    /// Rotation about the lateral axis.
    pub pitch: f32,
    /// Rotation about the forward axis.
    pub roll: f32,
}

impl Orientation {
    /// All angles zero. Used whenever the host cannot supply an orientation.
    pub const ZERO: Self = Self {
        yaw: 0.0,
        pitch: 0.0,
        roll: 0.0,
    };

    /// Creates an orientation from yaw, pitch and roll.
    pub fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "yaw={:.3} pitch={:.3} roll={:.3}",
            self.yaw, self.pitch, self.roll
        )
    }
}
