//! Modal mix controller: capture both poses, blend while the factor moves,
//! commit or roll back.
//!
//! Single-threaded by contract: the controller is driven by the host's event
//! loop, and the `Option<MixSession>` slot is the whole mutual-exclusion
//! story. Check-then-set happens inside one method call, never across
//! suspension points. Commit/cancel/apply require the token handed out by
//! `start`, so stale callers are rejected instead of silently steering a
//! newer session.

use serde::{Deserialize, Serialize};

use crate::config::MirrorConventions;
use crate::error::MixError;
use crate::host::PoseHost;
use crate::interp::mix_pose;
use crate::snapshot::{apply_pose, capture_pose, PoseSnapshot};

/// Opaque handle identifying one mix session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(u64);

/// Controller phase. `Capturing`, `Committed`, and `Cancelled` are transient:
/// they only exist inside a single controller call, so an outside observer
/// sees `Idle` or `Running`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MixPhase {
    Idle,
    Capturing,
    Running,
    Committed,
    Cancelled,
}

/// Parameters of a start request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StartMix {
    /// Index into the pose library.
    pub pose_index: usize,
    /// Read the target from mirror-named counterparts, reflected.
    pub flipped: bool,
    /// `false` is the plain-click path: apply the pose at full strength and
    /// finish immediately, no session.
    pub modal: bool,
}

/// What `start` did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// Non-modal invocation; the target pose was applied and committed.
    Applied,
    /// Modal session started; drive it with `apply_factor`, then `commit`
    /// or `cancel` with this token.
    Running(SessionToken),
}

/// The operation-scoped state of one in-flight mix.
#[derive(Clone, Debug)]
struct MixSession {
    token: SessionToken,
    current_pose: PoseSnapshot,
    target_pose: PoseSnapshot,
    pose_index: usize,
    flipped: bool,
}

/// Owns the at-most-one in-flight mix session.
#[derive(Debug)]
pub struct MixController {
    conventions: MirrorConventions,
    session: Option<MixSession>,
    phase: MixPhase,
    next_token: u64,
}

impl Default for MixController {
    fn default() -> Self {
        Self::new(MirrorConventions::default())
    }
}

impl MixController {
    pub fn new(conventions: MirrorConventions) -> Self {
        Self {
            conventions,
            session: None,
            phase: MixPhase::Idle,
            next_token: 0,
        }
    }

    #[inline]
    pub fn phase(&self) -> MixPhase {
        self.phase
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Token of the running session, if any.
    pub fn active_token(&self) -> Option<SessionToken> {
        self.session.as_ref().map(|s| s.token)
    }

    /// Capture `current_pose` and `target_pose` for the selected bones.
    ///
    /// The non-flipped path applies the stored pose and captures it, leaving
    /// the rig at the target (factor 0 has not moved yet, so the caller sees
    /// the pose it clicked). The flipped path poses the mirror-side bones,
    /// captures them reflected, and restores them, so the rig comes back
    /// unmutated.
    fn determine_poses(
        &self,
        host: &mut dyn PoseHost,
        pose_index: usize,
        flipped: bool,
    ) -> Result<(PoseSnapshot, PoseSnapshot), MixError> {
        let current = capture_pose(host, &[], false, &self.conventions)?;
        let bones: Vec<String> = current.bone_names().map(str::to_string).collect();

        if !flipped {
            host.apply_library_pose(pose_index, &bones)?;
            let target = capture_pose(host, &bones, false, &self.conventions)?;
            return Ok((current, target));
        }

        // The mirror-side bones are the ones we pose and read from; their
        // pre-pose state has to survive the round trip.
        let mut mirrored: Vec<String> = Vec::with_capacity(bones.len());
        for bone in &bones {
            let mirror = self
                .conventions
                .mirror_name(bone)
                .ok_or_else(|| MixError::NoMirrorName { bone: bone.clone() })?;
            mirrored.push(mirror);
        }
        let mirror_side = capture_pose(host, &mirrored, false, &self.conventions)?;
        host.apply_library_pose(pose_index, &mirrored)?;
        let target = capture_pose(host, &bones, true, &self.conventions)?;
        apply_pose(host, &mirror_side)?;
        Ok((current, target))
    }

    /// Start a mix of the stored pose at `pose_index` over the current pose.
    ///
    /// Rejected with `MixInProgress` while a session is running; the running
    /// session is left untouched. Capture errors abort the start and leave
    /// the rig in whatever state has been written so far (asymmetric rigs
    /// and vanished bones are configuration errors, not rollback cases).
    pub fn start(
        &mut self,
        host: &mut dyn PoseHost,
        request: StartMix,
    ) -> Result<StartOutcome, MixError> {
        if self.session.is_some() {
            return Err(MixError::MixInProgress);
        }
        self.check_pose_index(host, request.pose_index)?;

        self.phase = MixPhase::Capturing;
        let (current, target) =
            match self.determine_poses(host, request.pose_index, request.flipped) {
                Ok(poses) => poses,
                Err(err) => {
                    self.phase = MixPhase::Idle;
                    return Err(err);
                }
            };

        if !request.modal {
            log::debug!("applying pose {} at 100%", request.pose_index);
            if let Err(err) = apply_pose(host, &target) {
                self.phase = MixPhase::Idle;
                return Err(err);
            }
            self.phase = MixPhase::Committed;
            host.request_redraw();
            self.phase = MixPhase::Idle;
            return Ok(StartOutcome::Applied);
        }

        let token = SessionToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        log::debug!(
            "starting modal mix of pose {} (flipped: {})",
            request.pose_index,
            request.flipped
        );
        self.session = Some(MixSession {
            token,
            current_pose: current,
            target_pose: target,
            pose_index: request.pose_index,
            flipped: request.flipped,
        });
        self.phase = MixPhase::Running;
        Ok(StartOutcome::Running(token))
    }

    fn check_pose_index(&self, host: &dyn PoseHost, index: usize) -> Result<(), MixError> {
        let len = host.list_poses().len();
        if index >= len {
            return Err(MixError::PoseIndexOutOfRange { index, len });
        }
        Ok(())
    }

    fn running_session(&self, token: SessionToken) -> Result<&MixSession, MixError> {
        let session = self.session.as_ref().ok_or(MixError::NoActiveMix)?;
        if session.token != token {
            return Err(MixError::StaleToken);
        }
        Ok(session)
    }

    /// Re-blend at the given factor (the host slider's 0–100 range).
    ///
    /// Always interpolates from the two captured snapshots, never from live
    /// state, so repeated calls at one factor are idempotent and there is no
    /// drift to accumulate. A host failure mid-write tears the session down
    /// and falls back to idle.
    pub fn apply_factor(
        &mut self,
        host: &mut dyn PoseHost,
        token: SessionToken,
        factor_percent: f32,
    ) -> Result<(), MixError> {
        let session = self.running_session(token)?;
        let factor = (factor_percent / 100.0).clamp(0.0, 1.0);
        let result = mix_pose(host, &session.current_pose, &session.target_pose, factor);
        if result.is_err() {
            self.session = None;
            self.phase = MixPhase::Idle;
        }
        result
    }

    /// Commit the running mix. The last blended state stands; no extra write.
    pub fn commit(&mut self, host: &mut dyn PoseHost, token: SessionToken) -> Result<(), MixError> {
        let session = self.running_session(token)?;
        log::debug!(
            "committing mix of pose {} (flipped: {})",
            session.pose_index,
            session.flipped
        );
        self.phase = MixPhase::Committed;
        self.session = None;
        host.request_redraw();
        self.phase = MixPhase::Idle;
        Ok(())
    }

    /// Cancel the running mix, forcing the rig back to the pre-mix pose.
    ///
    /// The final write is a full mix at factor 0.0 rather than trusting the
    /// last factor seen, so an intermediate blend or floating-point residue
    /// cannot stick.
    pub fn cancel(&mut self, host: &mut dyn PoseHost, token: SessionToken) -> Result<(), MixError> {
        let session = self.running_session(token)?;
        log::debug!("cancelling mix of pose {}", session.pose_index);
        let result = mix_pose(host, &session.current_pose, &session.target_pose, 0.0);
        self.phase = MixPhase::Cancelled;
        self.session = None;
        host.request_redraw();
        self.phase = MixPhase::Idle;
        result
    }

    /// Teardown hook: drop any session unconditionally.
    ///
    /// For host shutdown or deletion of the posed object while running; a
    /// leaked session would otherwise block every future mix.
    pub fn reset(&mut self) {
        if self.session.take().is_some() {
            log::warn!("mix session dropped without commit or cancel");
        }
        self.phase = MixPhase::Idle;
    }
}
