//! PoseSnapshot: an ordered bone → transform mapping, plus capture/apply.

use serde::{Deserialize, Serialize};

use crate::config::MirrorConventions;
use crate::error::MixError;
use crate::host::PoseHost;
use crate::mirror::mirror_transform;
use crate::transform::BoneTransform;

/// An ordered mapping from bone name to captured transform.
///
/// Represents either the "current" (pre-mix) or "target" (library) pose of
/// some subset of bones. Created fresh at the start of every mix operation
/// and owned exclusively by it; iteration order is capture order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PoseSnapshot {
    bones: Vec<(String, BoneTransform)>,
}

impl PoseSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a bone's transform, preserving first-insert order.
    pub fn insert(&mut self, bone: &str, transform: BoneTransform) {
        if let Some(slot) = self.bones.iter_mut().find(|(name, _)| name == bone) {
            slot.1 = transform;
        } else {
            self.bones.push((bone.to_string(), transform));
        }
    }

    pub fn get(&self, bone: &str) -> Option<&BoneTransform> {
        self.bones
            .iter()
            .find_map(|(name, tf)| if name == bone { Some(tf) } else { None })
    }

    pub fn contains(&self, bone: &str) -> bool {
        self.bones.iter().any(|(name, _)| name == bone)
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bone_names(&self) -> impl Iterator<Item = &str> {
        self.bones.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoneTransform)> {
        self.bones.iter().map(|(name, tf)| (name.as_str(), tf))
    }

    /// First bone present in exactly one of the two snapshots, if any.
    /// `None` means both cover the same bones.
    pub fn first_difference<'a>(&'a self, other: &'a PoseSnapshot) -> Option<&'a str> {
        for (name, _) in &self.bones {
            if !other.contains(name) {
                return Some(name.as_str());
            }
        }
        for (name, _) in &other.bones {
            if !self.contains(name) {
                return Some(name.as_str());
            }
        }
        None
    }
}

/// Parse a snapshot from its canonical JSON form (the serde shape of
/// [`PoseSnapshot`]). Useful for persisting a captured pose or feeding
/// fixtures.
pub fn parse_snapshot_json(raw: &str) -> Result<PoseSnapshot, String> {
    serde_json::from_str(raw).map_err(|e| format!("pose snapshot parse error: {e}"))
}

/// Reserved custom-property keys are host-internal metadata, never pose data.
fn is_reserved_prop(key: &str) -> bool {
    key.starts_with('_')
}

fn captured(mut transform: BoneTransform) -> BoneTransform {
    transform.props.retain(|key, _| !is_reserved_prop(key));
    transform
}

/// Capture a snapshot of `selection` from the live rig.
///
/// An empty `selection` falls back to the host's selected bones, then to all
/// bones. With `flipped`, each bone's transform is read from its mirror-named
/// counterpart and reflected into the bone's own frame; a missing counterpart
/// is surfaced as an error because it indicates an asymmetric rig.
pub fn capture_pose(
    host: &dyn PoseHost,
    selection: &[String],
    flipped: bool,
    conventions: &MirrorConventions,
) -> Result<PoseSnapshot, MixError> {
    let mut bones: Vec<String> = selection.to_vec();
    if bones.is_empty() {
        bones = host.selected_bones();
    }
    if bones.is_empty() {
        bones = host.all_bones();
    }

    let mut snapshot = PoseSnapshot::new();
    for bone in &bones {
        if flipped {
            let mirror = conventions
                .mirror_name(bone)
                .ok_or_else(|| MixError::NoMirrorName { bone: bone.clone() })?;
            let source =
                host.bone_transform(&mirror)
                    .ok_or_else(|| MixError::MissingMirrorBone {
                        bone: bone.clone(),
                        mirror: mirror.clone(),
                    })?;
            snapshot.insert(bone, captured(mirror_transform(&source)));
        } else {
            let source = host
                .bone_transform(bone)
                .ok_or_else(|| MixError::UnknownBone { bone: bone.clone() })?;
            snapshot.insert(bone, captured(source));
        }
    }
    Ok(snapshot)
}

/// Write every transform in `snapshot` back onto the live rig.
///
/// A pure write: location, the stored rotation channel, scale, and custom
/// properties. Never records keyframes.
pub fn apply_pose(host: &mut dyn PoseHost, snapshot: &PoseSnapshot) -> Result<(), MixError> {
    for (bone, transform) in snapshot.iter() {
        if !host.set_bone_transform(bone, transform) {
            return Err(MixError::UnknownBone {
                bone: bone.to_string(),
            });
        }
    }
    Ok(())
}
