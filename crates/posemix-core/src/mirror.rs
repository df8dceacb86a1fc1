//! Reflection of bone transforms across the rig's sagittal (YZ) plane.

use crate::transform::{BoneTransform, Rotation};

fn mirror_rotation(rotation: &Rotation) -> Rotation {
    match rotation {
        // (w, x, y, z): the x axis of rotation survives the reflection, the
        // y/z axes negate.
        Rotation::Quaternion([w, x, y, z]) => Rotation::Quaternion([*w, *x, -y, -z]),
        Rotation::Euler([x, y, z]) => Rotation::Euler([*x, -y, -z]),
        Rotation::AxisAngle([angle, x, y, z]) => Rotation::AxisAngle([*angle, *x, -y, -z]),
    }
}

/// Reflect a transform across the YZ plane.
///
/// Negates the x component of the location and the y/z components of the
/// rotation; scale and custom properties are untouched. Self-inverse:
/// `mirror_transform(mirror_transform(t)) == t`.
pub fn mirror_transform(transform: &BoneTransform) -> BoneTransform {
    let [x, y, z] = transform.location;
    BoneTransform {
        location: [-x, y, z],
        rotation: mirror_rotation(&transform.rotation),
        scale: transform.scale,
        props: transform.props.clone(),
    }
}
