//! Pose-library listing contract.

use serde::{Deserialize, Serialize};

/// One stored pose: a frame marker plus a display name.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoseMarker {
    pub frame: u32,
    pub name: String,
}

/// Index of the pose stored at `frame`, if any.
pub fn pose_index_for_frame(markers: &[PoseMarker], frame: u32) -> Option<usize> {
    markers.iter().position(|marker| marker.frame == frame)
}
