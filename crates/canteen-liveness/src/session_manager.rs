//! Owns the liveness session state machine end to end: starting a
//! session, processing submitted frames, and the pass/fail decision
//! (§4.1).

use std::sync::Arc;

use canteen_types::{
    CanteenError, EmployeeId, FailReasonCode, LivenessCommand, LivenessSession, LivenessSessionId,
    LivenessStatus, Pose, TerminalId, constants, error::Result,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::identity_matcher::IdentityMatcher;
use crate::oracles::{DecodedFrame, FaceDetector, FrameDecoder, PoseEstimator};

/// Samples a command sequence for a new session: k ∈ {2, 3} commands
/// drawn without replacement from the pool, per §4.1.
pub fn sample_commands<R: Rng + ?Sized>(rng: &mut R) -> Vec<LivenessCommand> {
    let k = rng.gen_range(2..=3);
    let mut pool = LivenessCommand::POOL;
    pool.shuffle(rng);
    pool[..k].to_vec()
}

/// Outcome of processing one frame.
#[derive(Debug, Clone)]
pub struct FrameOutcome {
    pub status: LivenessStatus,
    pub current_index: usize,
    pub blink_seen: bool,
    pub hint: &'static str,
}

/// Ties together the identity matcher and the pose/face oracles to drive
/// a [`LivenessSession`] through its state machine.
pub struct SessionManager<D, F, P> {
    pub decoder: Arc<D>,
    pub detector: Arc<F>,
    pub pose_estimator: Arc<P>,
    pub matcher: IdentityMatcher,
    pub session_ttl_sec: i64,
}

impl<D, F, P> SessionManager<D, F, P>
where
    D: FrameDecoder,
    F: FaceDetector,
    P: PoseEstimator,
{
    #[must_use]
    pub fn new(decoder: Arc<D>, detector: Arc<F>, pose_estimator: Arc<P>, matcher: IdentityMatcher, session_ttl_sec: i64) -> Self {
        Self {
            decoder,
            detector,
            pose_estimator,
            matcher,
            session_ttl_sec,
        }
    }

    /// Creates a new `in_progress` session for `employee_id`/`terminal_id`
    /// with a freshly sampled command list.
    pub fn start<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        employee_id: EmployeeId,
        terminal_id: TerminalId,
        now: DateTime<Utc>,
    ) -> LivenessSession {
        let commands = sample_commands(rng);
        LivenessSession::new(
            employee_id,
            terminal_id,
            commands,
            now,
            chrono::Duration::seconds(self.session_ttl_sec),
        )
    }

    /// Processes one submitted frame against `session`, mutating it in
    /// place and returning the resulting outcome.
    ///
    /// Frame-quality errors (`FaceNotFound`, `MultipleFaces`, etc.) are
    /// returned as-is without advancing or failing the session (§4.1,
    /// §7). A face mismatch is fatal to the session and transitions it
    /// to `failed` before the error is returned.
    pub async fn submit_frame(
        &self,
        session: &mut LivenessSession,
        template_embedding: &[f32],
        image_bytes: &[u8],
        now: DateTime<Utc>,
    ) -> Result<FrameOutcome> {
        if session.status != LivenessStatus::InProgress {
            return Err(CanteenError::LivenessNotInProgress { session_id: session.id });
        }

        if session.is_expired(now) {
            session.mark_expired()?;
            return Err(CanteenError::LivenessExpired { session_id: session.id });
        }

        let frame: DecodedFrame = self.decoder.decode(image_bytes).await?;
        let encoding = self.detector.detect_and_encode(&frame).await?;

        let distance = match self.matcher.check(&encoding.embedding, template_embedding) {
            Ok(d) => d,
            Err(CanteenError::FaceNotMatch { distance, threshold }) => {
                session.mark_failed(FailReasonCode::FaceNotMatch)?;
                return Err(CanteenError::FaceNotMatch { distance, threshold });
            }
            Err(other) => return Err(other),
        };
        session.min_face_distance = Some(match session.min_face_distance {
            Some(prev) => prev.min(distance),
            None => distance,
        });

        let observation = self.pose_estimator.estimate_pose_and_blink(&frame).await?;
        session.last_seen_at = Some(now);

        if session.anchor_pose.is_none() {
            session.anchor_pose = Some(observation.pose);
            session.baseline_pose = Some(observation.pose);
        }
        if observation.blink {
            session.blink_seen = true;
        }

        self.advance_on_command_satisfaction(session, observation.pose);

        let status = if session.commands_exhausted() {
            if session.blink_seen {
                session.mark_passed()?;
                LivenessStatus::Passed
            } else {
                session.mark_failed(FailReasonCode::BlinkNotDetected)?;
                LivenessStatus::Failed
            }
        } else {
            LivenessStatus::InProgress
        };

        Ok(FrameOutcome {
            status,
            current_index: session.current_index,
            blink_seen: session.blink_seen,
            hint: hint_for(session),
        })
    }

    /// Checks the current command's satisfaction predicate against the
    /// observed pose (§4.1 table) and, if satisfied, advances and
    /// re-anchors. At most one advance per frame.
    fn advance_on_command_satisfaction(&self, session: &mut LivenessSession, pose: Pose) {
        if session.commands_exhausted() {
            return;
        }
        let Some(anchor) = session.anchor_pose else {
            return;
        };
        let command = session.commands[session.current_index];
        let satisfied = match command {
            LivenessCommand::TurnLeft => pose.yaw <= anchor.yaw - constants::TURN_THRESHOLD_DEG,
            LivenessCommand::TurnRight => pose.yaw >= anchor.yaw + constants::TURN_THRESHOLD_DEG,
            LivenessCommand::Tilt => (pose.roll - anchor.roll).abs() >= constants::TILT_THRESHOLD_DEG,
        };
        if satisfied {
            session.current_index += 1;
            session.anchor_pose = Some(pose);
        }
    }
}

fn hint_for(session: &LivenessSession) -> &'static str {
    if session.commands_exhausted() {
        return "HOLD_STILL";
    }
    match session.commands.get(session.current_index) {
        Some(LivenessCommand::TurnLeft) => "TURN_LEFT",
        Some(LivenessCommand::TurnRight) => "TURN_RIGHT",
        Some(LivenessCommand::Tilt) => "TILT",
        None => "HOLD_STILL",
    }
}
