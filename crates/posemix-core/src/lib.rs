//! Posemix core (host-agnostic)
//!
//! Pose-mixing logic for pose libraries: snapshot capture/apply, weighted
//! interpolation between a current and a target pose, mirror/flip across the
//! rig's symmetry plane, and the modal commit/cancel controller that drives
//! it all. The host application owns bones, stored poses, and the event
//! loop; this crate reaches them only through the [`PoseHost`] trait.

pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod interp;
pub mod library;
pub mod matching;
pub mod mirror;
pub mod snapshot;
pub mod transform;
pub mod value;

// Re-exports for consumers (adapters)
pub use config::MirrorConventions;
pub use controller::{MixController, MixPhase, SessionToken, StartMix, StartOutcome};
pub use error::MixError;
pub use host::PoseHost;
pub use interp::{mix_pose, mix_transform};
pub use library::{pose_index_for_frame, PoseMarker};
pub use matching::{match_thumbnails, MatchStrategy, ThumbnailMatch};
pub use mirror::mirror_transform;
pub use snapshot::{apply_pose, capture_pose, parse_snapshot_json, PoseSnapshot};
pub use transform::{BoneTransform, Rotation, RotationMode};
pub use value::{mix_prop, PropKind, PropValue};
