//! Error kinds surfaced by capture, mixing, and the modal controller.

use thiserror::Error;

/// Errors produced while capturing, mirroring, or mixing poses.
///
/// `MismatchedPose` is a caller contract violation (the two snapshots of one
/// mix must cover the same bones); the rest are rig-configuration or
/// precondition failures that the host should report to the user.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MixError {
    #[error("bone {bone:?} has no mirrored counterpart {mirror:?} on this rig")]
    MissingMirrorBone { bone: String, mirror: String },

    #[error("no recognizable side marker in bone name {bone:?}")]
    NoMirrorName { bone: String },

    #[error("snapshots do not cover the same bones (first difference: {bone:?})")]
    MismatchedPose { bone: String },

    #[error("a pose mix is already running")]
    MixInProgress,

    #[error("no pose mix is running")]
    NoActiveMix,

    #[error("session token does not match the running mix")]
    StaleToken,

    #[error("unknown bone {bone:?}")]
    UnknownBone { bone: String },

    #[error("pose index {index} out of range ({len} poses)")]
    PoseIndexOutOfRange { index: usize, len: usize },
}
