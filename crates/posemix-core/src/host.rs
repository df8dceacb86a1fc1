//! Host trait: the seam between the mixing core and the owning application.
//!
//! The core never owns bones or stored poses; everything is read and written
//! through this trait, implemented by the host adapter (or by the fixture rig
//! in tests).

use crate::error::MixError;
use crate::library::PoseMarker;
use crate::transform::BoneTransform;

/// Host-provided access to the live rig and its pose library.
pub trait PoseHost {
    /// Names of the currently selected bones, in selection order.
    fn selected_bones(&self) -> Vec<String>;

    /// Names of all bones of the active rig.
    fn all_bones(&self) -> Vec<String>;

    /// Read a bone's live transform. `None` if the bone does not exist
    /// (or no longer exists).
    fn bone_transform(&self, bone: &str) -> Option<BoneTransform>;

    /// Write a bone's live transform. Returns `false` if the bone is gone.
    fn set_bone_transform(&mut self, bone: &str, transform: &BoneTransform) -> bool;

    /// The pose library's stored markers, in library order.
    fn list_poses(&self) -> Vec<PoseMarker>;

    /// Write the stored pose at `index` onto the live rig, restricted to
    /// `bones` (empty means every bone the stored pose covers).
    fn apply_library_pose(&mut self, index: usize, bones: &[String]) -> Result<(), MixError>;

    /// Whether the host's auto-keyframe setting is on.
    fn auto_keyframe_enabled(&self) -> bool {
        false
    }

    /// Record the current state of `bones` into the animation timeline.
    /// Called only when [`auto_keyframe_enabled`](Self::auto_keyframe_enabled)
    /// reports true.
    fn insert_keyframe(&mut self, _bones: &[String]) {}

    /// UI invalidation hint; fire-and-forget.
    fn request_redraw(&mut self) {}
}
