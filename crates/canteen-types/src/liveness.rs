//! Liveness session state machine types.
//!
//! ## State Machine
//!
//! ```text
//!              ┌─────────────┐
//!              │ in_progress │ (initial)
//!              └──────┬──────┘
//!         ┌───────────┼───────────┐
//!         ▼           ▼           ▼
//!     ┌───────┐   ┌────────┐  ┌─────────┐
//!     │passed │   │ failed │  │ expired │
//!     └───┬───┘   └────────┘  └─────────┘
//!         ▼
//!     ┌───────┐
//!     │ used  │
//!     └───────┘
//! ```
//!
//! `used`, `failed`, and `expired` are terminal: no edge leaves them
//! (invariant 5). Only a session in `passed` may transition to `used`,
//! and only once — the one-shot consumption guarantee a liveness token
//! rests on (§4.4, invariant 4).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CanteenError, EmployeeId, LivenessSessionId, TerminalId, error::Result};

/// A single active-liveness challenge instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LivenessCommand {
    TurnLeft,
    TurnRight,
    Tilt,
}

impl std::fmt::Display for LivenessCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TurnLeft => write!(f, "TURN_LEFT"),
            Self::TurnRight => write!(f, "TURN_RIGHT"),
            Self::Tilt => write!(f, "TILT"),
        }
    }
}

impl LivenessCommand {
    /// The full command pool, in a fixed order for deterministic sampling
    /// by callers that supply their own RNG (see `canteen-liveness`).
    pub const POOL: [Self; 3] = [Self::TurnLeft, Self::TurnRight, Self::Tilt];
}

/// Head pose observed in a single frame, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// Why a session transitioned to `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailReasonCode {
    FaceNotMatch,
    BlinkNotDetected,
}

impl std::fmt::Display for FailReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FaceNotMatch => write!(f, "FACE_NOT_MATCH"),
            Self::BlinkNotDetected => write!(f, "BLINK_NOT_DETECTED"),
        }
    }
}

/// Liveness session lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LivenessStatus {
    InProgress,
    Passed,
    Failed,
    Expired,
    Used,
}

impl std::fmt::Display for LivenessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "in_progress"),
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
            Self::Expired => write!(f, "expired"),
            Self::Used => write!(f, "used"),
        }
    }
}

impl LivenessStatus {
    /// Whether `self -> target` is a legal edge in the state graph above.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::InProgress, Self::Passed)
                | (Self::InProgress, Self::Failed)
                | (Self::InProgress, Self::Expired)
                | (Self::Passed, Self::Used)
        )
    }

    /// Terminal states have no outgoing edges (invariant 5).
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Expired | Self::Used)
    }
}

/// The liveness session state machine (§3, §4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessSession {
    pub id: LivenessSessionId,
    pub employee_id: EmployeeId,
    pub terminal_id: TerminalId,
    pub status: LivenessStatus,
    pub commands: Vec<LivenessCommand>,
    pub current_index: usize,
    pub anchor_pose: Option<Pose>,
    pub baseline_pose: Option<Pose>,
    pub blink_seen: bool,
    pub min_face_distance: Option<f64>,
    pub fail_reason_code: Option<FailReasonCode>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub used_at: Option<DateTime<Utc>>,
}

impl LivenessSession {
    #[must_use]
    pub fn new(
        employee_id: EmployeeId,
        terminal_id: TerminalId,
        commands: Vec<LivenessCommand>,
        now: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            id: LivenessSessionId::new(),
            employee_id,
            terminal_id,
            status: LivenessStatus::InProgress,
            commands,
            current_index: 0,
            anchor_pose: None,
            baseline_pose: None,
            blink_seen: false,
            min_face_distance: None,
            fail_reason_code: None,
            created_at: now,
            expires_at: now + ttl,
            last_seen_at: None,
            used_at: None,
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    #[must_use]
    pub fn commands_exhausted(&self) -> bool {
        self.current_index >= self.commands.len()
    }

    /// Apply the `in_progress -> expired` edge.
    pub fn mark_expired(&mut self) -> Result<()> {
        self.transition(LivenessStatus::Expired)
    }

    pub fn mark_failed(&mut self, reason: FailReasonCode) -> Result<()> {
        self.transition(LivenessStatus::Failed)?;
        self.fail_reason_code = Some(reason);
        Ok(())
    }

    pub fn mark_passed(&mut self) -> Result<()> {
        self.transition(LivenessStatus::Passed)
    }

    /// Consume the session: `passed -> used`. This is the one-way edge the
    /// Payment Authorizer's idempotency guarantee rests on (§4.4).
    pub fn mark_used(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(LivenessStatus::Used)?;
        self.used_at = Some(now);
        Ok(())
    }

    fn transition(&mut self, target: LivenessStatus) -> Result<()> {
        if !self.status.can_transition_to(target) {
            return Err(CanteenError::LivenessNotInProgress {
                session_id: self.id,
            });
        }
        self.status = target;
        Ok(())
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl LivenessSession {
    pub fn dummy(employee_id: EmployeeId, terminal_id: TerminalId) -> Self {
        Self::new(
            employee_id,
            terminal_id,
            vec![LivenessCommand::TurnLeft, LivenessCommand::Tilt],
            Utc::now(),
            chrono::Duration::seconds(crate::constants::LIVENESS_SESSION_TTL_SEC),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy() -> LivenessSession {
        LivenessSession::dummy(EmployeeId::new(), TerminalId::new())
    }

    #[test]
    fn state_transitions_valid() {
        assert!(LivenessStatus::InProgress.can_transition_to(LivenessStatus::Passed));
        assert!(LivenessStatus::InProgress.can_transition_to(LivenessStatus::Failed));
        assert!(LivenessStatus::InProgress.can_transition_to(LivenessStatus::Expired));
        assert!(LivenessStatus::Passed.can_transition_to(LivenessStatus::Used));
    }

    #[test]
    fn state_transitions_invalid() {
        assert!(!LivenessStatus::Failed.can_transition_to(LivenessStatus::Used));
        assert!(!LivenessStatus::Expired.can_transition_to(LivenessStatus::Passed));
        assert!(!LivenessStatus::Used.can_transition_to(LivenessStatus::Passed));
        assert!(!LivenessStatus::InProgress.can_transition_to(LivenessStatus::Used));
    }

    #[test]
    fn mark_used_from_passed() {
        let mut s = dummy();
        s.mark_passed().unwrap();
        assert!(s.mark_used(Utc::now()).is_ok());
        assert_eq!(s.status, LivenessStatus::Used);
        assert!(s.used_at.is_some());
    }

    #[test]
    fn double_use_blocked() {
        let mut s = dummy();
        s.mark_passed().unwrap();
        s.mark_used(Utc::now()).unwrap();
        assert!(s.mark_used(Utc::now()).is_err());
    }

    #[test]
    fn used_cannot_be_failed() {
        let mut s = dummy();
        s.mark_passed().unwrap();
        s.mark_used(Utc::now()).unwrap();
        assert!(s.mark_failed(FailReasonCode::FaceNotMatch).is_err());
    }

    #[test]
    fn terminal_states_are_terminal() {
        assert!(LivenessStatus::Failed.is_terminal());
        assert!(LivenessStatus::Expired.is_terminal());
        assert!(LivenessStatus::Used.is_terminal());
        assert!(!LivenessStatus::InProgress.is_terminal());
        assert!(!LivenessStatus::Passed.is_terminal());
    }

    #[test]
    fn fail_reason_display() {
        assert_eq!(format!("{}", FailReasonCode::FaceNotMatch), "FACE_NOT_MATCH");
        assert_eq!(
            format!("{}", FailReasonCode::BlinkNotDetected),
            "BLINK_NOT_DETECTED"
        );
    }

    #[test]
    fn command_display() {
        assert_eq!(format!("{}", LivenessCommand::TurnLeft), "TURN_LEFT");
        assert_eq!(format!("{}", LivenessCommand::Tilt), "TILT");
    }

    #[test]
    fn session_serde_roundtrip() {
        let s = dummy();
        let json = serde_json::to_string(&s).unwrap();
        let back: LivenessSession = serde_json::from_str(&json).unwrap();
        assert_eq!(s.id, back.id);
        assert_eq!(s.commands, back.commands);
    }
}
