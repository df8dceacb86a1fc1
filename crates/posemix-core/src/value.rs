//! PropValue: custom-property values carried alongside bone transforms.
//! Numeric kinds interpolate; opaque kinds select by nearest side.

use serde::{Deserialize, Serialize};

use crate::interp::lerp_f32;

/// Lightweight kind enum for pattern-matching and dispatch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PropKind {
    Float,
    Int,
    Vector,
    Bool,
    Text,
}

/// A bone custom-property value.
///
/// Hosts expose arbitrary per-bone properties (IK/FK switches, squash
/// amounts, UI toggles). Floats, ints, and numeric vectors blend; booleans
/// and text step at the halfway point.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum PropValue {
    /// Scalar float
    Float(f32),

    /// Integer (interpolated in float space, rounded to nearest)
    Int(i64),

    /// Generic, variable-length numeric vector
    Vector(Vec<f32>),

    /// Boolean (step)
    Bool(bool),

    /// Text / string; step-only for interpolation
    Text(String),
}

impl PropValue {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> PropKind {
        match self {
            PropValue::Float(_) => PropKind::Float,
            PropValue::Int(_) => PropKind::Int,
            PropValue::Vector(_) => PropKind::Vector,
            PropValue::Bool(_) => PropKind::Bool,
            PropValue::Text(_) => PropKind::Text,
        }
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            PropValue::Float(_) | PropValue::Int(_) | PropValue::Vector(_)
        )
    }
}

/// Blend two property values by `t` in [0, 1].
///
/// Numeric kinds interpolate component-wise. Opaque kinds (and any kind or
/// length mismatch) select the nearest side: `t < 0.5` keeps `a`, otherwise
/// takes `b`. A hard threshold, not a blend.
pub fn mix_prop(a: &PropValue, b: &PropValue, t: f32) -> PropValue {
    match (a, b) {
        (PropValue::Float(va), PropValue::Float(vb)) => PropValue::Float(lerp_f32(*va, *vb, t)),
        (PropValue::Int(va), PropValue::Int(vb)) => {
            PropValue::Int(lerp_f32(*va as f32, *vb as f32, t).round() as i64)
        }
        (PropValue::Vector(va), PropValue::Vector(vb)) if va.len() == vb.len() => PropValue::Vector(
            va.iter()
                .zip(vb.iter())
                .map(|(x, y)| lerp_f32(*x, *y, t))
                .collect(),
        ),
        _ => {
            if t < 0.5 {
                a.clone()
            } else {
                b.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_props_step_at_half() {
        let a = PropValue::Text("fk".to_string());
        let b = PropValue::Text("ik".to_string());
        assert_eq!(mix_prop(&a, &b, 0.49), a);
        assert_eq!(mix_prop(&a, &b, 0.5), b);
    }

    #[test]
    fn mismatched_kinds_step() {
        let a = PropValue::Float(1.0);
        let b = PropValue::Bool(true);
        assert_eq!(mix_prop(&a, &b, 0.3), a);
        assert_eq!(mix_prop(&a, &b, 0.7), b);
    }
}
