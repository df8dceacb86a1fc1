//! Interpolation helpers and the pose mix itself.
//!
//! Rotation channels use raw component-wise interpolation of whichever
//! representation the bone was captured in. Quaternions are deliberately not
//! renormalized and not corrected for shortest arc: this matches the host
//! behavior this engine replaces, where large rotation deltas blend through
//! a slightly denormalized path. A known limitation, kept on purpose.

use crate::error::MixError;
use crate::host::PoseHost;
use crate::snapshot::PoseSnapshot;
use crate::transform::{BoneTransform, Rotation};
use crate::value::mix_prop;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
    ]
}

#[inline]
pub fn lerp_vec4(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
        lerp_f32(a[3], b[3], t),
    ]
}

fn mix_rotation(a: &Rotation, b: &Rotation, t: f32) -> Rotation {
    match (a, b) {
        (Rotation::Quaternion(qa), Rotation::Quaternion(qb)) => {
            Rotation::Quaternion(lerp_vec4(*qa, *qb, t))
        }
        (Rotation::Euler(ea), Rotation::Euler(eb)) => Rotation::Euler(lerp_vec3(*ea, *eb, t)),
        (Rotation::AxisAngle(aa), Rotation::AxisAngle(ab)) => {
            Rotation::AxisAngle(lerp_vec4(*aa, *ab, t))
        }
        // Representation mismatch between the two sides: step instead of
        // blending (fail-soft; capture keeps the mode fixed per snapshot).
        _ => {
            if t < 0.5 {
                *a
            } else {
                *b
            }
        }
    }
}

/// Blend two bone transforms by `t` in [0, 1].
///
/// Location and scale interpolate component-wise; the rotation channel
/// interpolates raw components when both sides share a representation.
/// Custom properties blend per [`mix_prop`].
pub fn mix_transform(a: &BoneTransform, b: &BoneTransform, t: f32) -> BoneTransform {
    let mut mixed = BoneTransform {
        location: lerp_vec3(a.location, b.location, t),
        rotation: mix_rotation(&a.rotation, &b.rotation, t),
        scale: lerp_vec3(a.scale, b.scale, t),
        props: Default::default(),
    };
    for (key, va) in &a.props {
        let value = match b.props.get(key) {
            Some(vb) => mix_prop(va, vb, t),
            // Property missing on the target side: keep the current value.
            None => va.clone(),
        };
        mixed.props.insert(key.clone(), value);
    }
    mixed
}

/// Mix `target` over `current` with the given factor and write the result to
/// the live rig.
///
/// `factor` 0.0 reproduces `current` exactly, 1.0 reproduces `target`. Both
/// snapshots must cover the same bones. Always re-interpolates from the two
/// captured snapshots, never from live state, so repeated calls with the same
/// factor are idempotent. Records keyframes for the affected bones only when
/// the host's auto-keyframe setting is on.
pub fn mix_pose(
    host: &mut dyn PoseHost,
    current: &PoseSnapshot,
    target: &PoseSnapshot,
    factor: f32,
) -> Result<(), MixError> {
    if let Some(bone) = current.first_difference(target) {
        return Err(MixError::MismatchedPose {
            bone: bone.to_string(),
        });
    }

    let mut affected: Vec<String> = Vec::with_capacity(current.len());
    for (bone, from) in current.iter() {
        let to = target.get(bone).ok_or_else(|| MixError::MismatchedPose {
            bone: bone.to_string(),
        })?;
        let mixed = mix_transform(from, to, factor);
        if !host.set_bone_transform(bone, &mixed) {
            return Err(MixError::UnknownBone {
                bone: bone.to_string(),
            });
        }
        affected.push(bone.to_string());
    }

    if host.auto_keyframe_enabled() {
        host.insert_keyframe(&affected);
    }
    Ok(())
}
