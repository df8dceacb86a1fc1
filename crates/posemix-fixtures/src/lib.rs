//! In-memory rig fixture implementing the posemix host traits.
//!
//! Tests build a small skeleton with stored library poses and drive the mix
//! controller against it; the fixture records keyframe insertions and redraw
//! requests so assertions can see the side effects.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use posemix_core::{BoneTransform, MixError, PoseHost, PoseMarker, RotationMode};

#[derive(Clone, Debug)]
struct FixtureBone {
    name: String,
    transform: BoneTransform,
    selected: bool,
}

#[derive(Clone, Debug)]
struct StoredPose {
    marker: PoseMarker,
    transforms: Vec<(String, BoneTransform)>,
}

/// An in-memory rig plus pose library.
#[derive(Clone, Debug, Default)]
pub struct FixtureRig {
    bones: Vec<FixtureBone>,
    library: Vec<StoredPose>,
    auto_key: bool,
    /// Bone lists passed to `insert_keyframe`, in call order.
    pub keyframe_calls: Vec<Vec<String>>,
    /// Number of redraw requests received.
    pub redraw_requests: usize,
}

impl FixtureRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bone at rest in the given rotation representation.
    pub fn add_bone(&mut self, name: &str, mode: RotationMode) -> &mut Self {
        self.add_bone_with(name, BoneTransform::rest(mode))
    }

    pub fn add_bone_with(&mut self, name: &str, transform: BoneTransform) -> &mut Self {
        self.bones.push(FixtureBone {
            name: name.to_string(),
            transform,
            selected: false,
        });
        self
    }

    /// Mark exactly these bones as selected.
    pub fn select(&mut self, names: &[&str]) -> &mut Self {
        for bone in &mut self.bones {
            bone.selected = names.contains(&bone.name.as_str());
        }
        self
    }

    /// Store a library pose covering the given bones.
    pub fn add_pose(
        &mut self,
        name: &str,
        frame: u32,
        transforms: &[(&str, BoneTransform)],
    ) -> &mut Self {
        self.library.push(StoredPose {
            marker: PoseMarker {
                frame,
                name: name.to_string(),
            },
            transforms: transforms
                .iter()
                .map(|(bone, tf)| (bone.to_string(), tf.clone()))
                .collect(),
        });
        self
    }

    pub fn set_auto_key(&mut self, enabled: bool) -> &mut Self {
        self.auto_key = enabled;
        self
    }

    /// Remove a bone mid-test (models the host deleting it while a mix runs).
    pub fn remove_bone(&mut self, name: &str) {
        self.bones.retain(|bone| bone.name != name);
    }

    /// Read a bone's live transform, panicking on unknown names (test-only
    /// convenience).
    pub fn transform_of(&self, name: &str) -> BoneTransform {
        self.bone_transform(name)
            .unwrap_or_else(|| panic!("fixture has no bone {name:?}"))
    }

    /// Build a rig from a JSON description (see `RigSpec` for the shape).
    pub fn from_json(raw: &str) -> Result<Self> {
        let spec: RigSpec = serde_json::from_str(raw).context("failed to parse rig fixture")?;
        let mut rig = FixtureRig::new();
        let mut selected: Vec<String> = Vec::new();
        for bone in spec.bones {
            if bone.selected {
                selected.push(bone.name.clone());
            }
            rig.add_bone_with(&bone.name, bone.transform);
        }
        let refs: Vec<&str> = selected.iter().map(String::as_str).collect();
        rig.select(&refs);
        for pose in spec.poses {
            if pose.transforms.is_empty() {
                return Err(anyhow!("stored pose {:?} covers no bones", pose.name));
            }
            let transforms: Vec<(&str, BoneTransform)> = pose
                .transforms
                .iter()
                .map(|entry| (entry.bone.as_str(), entry.transform.clone()))
                .collect();
            rig.add_pose(&pose.name, pose.frame, &transforms);
        }
        Ok(rig)
    }

    fn bone(&self, name: &str) -> Option<&FixtureBone> {
        self.bones.iter().find(|bone| bone.name == name)
    }

    fn bone_mut(&mut self, name: &str) -> Option<&mut FixtureBone> {
        self.bones.iter_mut().find(|bone| bone.name == name)
    }
}

/// JSON shape accepted by [`FixtureRig::from_json`].
#[derive(Debug, Deserialize)]
struct RigSpec {
    #[serde(default)]
    bones: Vec<BoneSpec>,
    #[serde(default)]
    poses: Vec<PoseSpec>,
}

#[derive(Debug, Deserialize)]
struct BoneSpec {
    name: String,
    #[serde(flatten)]
    transform: BoneTransform,
    #[serde(default)]
    selected: bool,
}

#[derive(Debug, Deserialize)]
struct PoseSpec {
    name: String,
    frame: u32,
    transforms: Vec<PoseBoneSpec>,
}

#[derive(Debug, Deserialize)]
struct PoseBoneSpec {
    bone: String,
    #[serde(flatten)]
    transform: BoneTransform,
}

impl PoseHost for FixtureRig {
    fn selected_bones(&self) -> Vec<String> {
        self.bones
            .iter()
            .filter(|bone| bone.selected)
            .map(|bone| bone.name.clone())
            .collect()
    }

    fn all_bones(&self) -> Vec<String> {
        self.bones.iter().map(|bone| bone.name.clone()).collect()
    }

    fn bone_transform(&self, bone: &str) -> Option<BoneTransform> {
        self.bone(bone).map(|b| b.transform.clone())
    }

    fn set_bone_transform(&mut self, bone: &str, transform: &BoneTransform) -> bool {
        match self.bone_mut(bone) {
            Some(b) => {
                b.transform = transform.clone();
                true
            }
            None => false,
        }
    }

    fn list_poses(&self) -> Vec<PoseMarker> {
        self.library.iter().map(|pose| pose.marker.clone()).collect()
    }

    fn apply_library_pose(&mut self, index: usize, bones: &[String]) -> Result<(), MixError> {
        let len = self.library.len();
        let pose = self
            .library
            .get(index)
            .cloned()
            .ok_or(MixError::PoseIndexOutOfRange { index, len })?;
        for (bone, transform) in &pose.transforms {
            if !bones.is_empty() && !bones.contains(bone) {
                continue;
            }
            if let Some(live) = self.bone_mut(bone) {
                live.transform = transform.clone();
            }
        }
        Ok(())
    }

    fn auto_keyframe_enabled(&self) -> bool {
        self.auto_key
    }

    fn insert_keyframe(&mut self, bones: &[String]) {
        self.keyframe_calls.push(bones.to_vec());
    }

    fn request_redraw(&mut self) {
        self.redraw_requests += 1;
    }
}
