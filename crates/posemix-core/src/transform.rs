//! BoneTransform: one bone's pose state, with an explicit rotation tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::PropValue;

/// Rotation representation tag, without the channel data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RotationMode {
    Quaternion,
    Euler,
    AxisAngle,
}

/// A bone's rotation channel, tagged by representation.
///
/// The representation is read once when a pose is captured and never changes
/// for the lifetime of that snapshot. Mixing two bones only blends the
/// rotation channel when both sides carry the same representation.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", content = "channel")]
pub enum Rotation {
    /// Quaternion (w, x, y, z)
    Quaternion([f32; 4]),

    /// Euler angles (x, y, z) in radians
    Euler([f32; 3]),

    /// Axis-angle (angle, x, y, z)
    AxisAngle([f32; 4]),
}

impl Rotation {
    #[inline]
    pub fn mode(&self) -> RotationMode {
        match self {
            Rotation::Quaternion(_) => RotationMode::Quaternion,
            Rotation::Euler(_) => RotationMode::Euler,
            Rotation::AxisAngle(_) => RotationMode::AxisAngle,
        }
    }

    /// Identity rotation in the given representation.
    pub fn identity(mode: RotationMode) -> Self {
        match mode {
            RotationMode::Quaternion => Rotation::Quaternion([1.0, 0.0, 0.0, 0.0]),
            RotationMode::Euler => Rotation::Euler([0.0, 0.0, 0.0]),
            RotationMode::AxisAngle => Rotation::AxisAngle([0.0, 0.0, 1.0, 0.0]),
        }
    }
}

/// One animatable bone's pose state at a point in time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BoneTransform {
    pub location: [f32; 3],
    pub rotation: Rotation,
    pub scale: [f32; 3],
    /// Custom properties, keyed by name. Reserved keys (leading underscore)
    /// are stripped at capture time and never round-trip through a mix.
    #[serde(default)]
    pub props: BTreeMap<String, PropValue>,
}

impl BoneTransform {
    /// Rest transform: zero location, identity rotation, unit scale.
    pub fn rest(mode: RotationMode) -> Self {
        Self {
            location: [0.0, 0.0, 0.0],
            rotation: Rotation::identity(mode),
            scale: [1.0, 1.0, 1.0],
            props: BTreeMap::new(),
        }
    }

    pub fn with_location(mut self, location: [f32; 3]) -> Self {
        self.location = location;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: [f32; 3]) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_prop(mut self, key: &str, value: PropValue) -> Self {
        self.props.insert(key.to_string(), value);
        self
    }
}
