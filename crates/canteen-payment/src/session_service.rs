//! Orchestrates `StartLiveness`, `SubmitFrame`, and `FinishLiveness`
//! (§2, §6) by wiring the Session Manager's state machine to the Data
//! Access Boundary and the Token Service. [`PaymentAuthorizer`] owns the
//! matching `Pay` leg; together the two cover the full control flow.

use std::sync::Arc;

use canteen_liveness::{FaceDetector, FrameDecoder, FrameOutcome, IdentityMatcher, PoseEstimator, SessionManager};
use canteen_store::Store;
use canteen_token::TokenService;
use canteen_types::{
    CanteenConfig, CanteenError, LivenessCommand, LivenessSessionId, LivenessStatus, TerminalId,
    error::Result,
};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Response shape for `POST /api/start_liveness` (§6).
#[derive(Debug, Clone)]
pub struct StartLivenessOutcome {
    pub session_id: LivenessSessionId,
    pub commands: Vec<LivenessCommand>,
    pub expires_at: DateTime<Utc>,
    pub frame_interval_ms: u32,
}

/// Response shape for `POST /api/finish_liveness` (§6).
#[derive(Debug, Clone)]
pub struct FinishLivenessOutcome {
    pub result: &'static str,
    pub liveness_token: Option<String>,
    pub expires_in_sec: Option<i64>,
    pub reason_code: Option<&'static str>,
}

/// Drives the liveness leg of the control flow (§2): start a session,
/// feed it frames, and mint the token once it passes.
pub struct LivenessService<S, D, F, P> {
    pub store: S,
    pub sessions: SessionManager<D, F, P>,
    pub tokens: TokenService,
    pub config: CanteenConfig,
}

impl<S, D, F, P> LivenessService<S, D, F, P>
where
    S: Store,
    D: FrameDecoder,
    F: FaceDetector,
    P: PoseEstimator,
{
    /// Builds the matcher and token service from `config` rather than
    /// taking them pre-built, so `face_dist_threshold`/`jwt_secret`/the
    /// session and token TTLs are always the configured values (§9, §10.3).
    #[must_use]
    pub fn new(store: S, decoder: Arc<D>, detector: Arc<F>, pose_estimator: Arc<P>, config: CanteenConfig) -> Self {
        let matcher = IdentityMatcher::new(config.face_dist_threshold);
        let tokens = TokenService::new(config.jwt_secret.clone().into_bytes());
        Self {
            store,
            sessions: SessionManager::new(decoder, detector, pose_estimator, matcher, config.liveness_session_ttl_sec),
            tokens,
            config,
        }
    }

    /// `StartLiveness(card_uid)`: resolves card → employee → active face
    /// template, then creates and persists a fresh `in_progress` session.
    pub async fn start_liveness<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        card_uid: &str,
        terminal_id: TerminalId,
        now: DateTime<Utc>,
    ) -> Result<StartLivenessOutcome> {
        let card = self.store.get_card_by_uid(card_uid).await?;
        if !card.is_active() {
            return Err(CanteenError::CardBlocked { uid: card_uid.to_string() });
        }
        let employee = self.store.get_employee(card.employee_id).await?;
        if !employee.is_active() {
            return Err(CanteenError::EmployeeBlocked { employee_id: employee.id });
        }
        self.store
            .get_active_face_template(employee.id)
            .await
            .map_err(|_| CanteenError::NoActiveFace { employee_id: employee.id })?;

        let session = self.sessions.start(rng, employee.id, terminal_id, now);
        let outcome = StartLivenessOutcome {
            session_id: session.id,
            commands: session.commands.clone(),
            expires_at: session.expires_at,
            frame_interval_ms: 150,
        };
        self.store.insert_liveness_session(session).await?;
        Ok(outcome)
    }

    /// `SubmitFrame(session_id, image)`: loads the session, advances it by
    /// one frame against the employee's active template, and persists the
    /// mutated session regardless of outcome — expiry and failure are
    /// state transitions that must stick (§4.1).
    pub async fn submit_frame(
        &self,
        session_id: LivenessSessionId,
        image_bytes: &[u8],
        now: DateTime<Utc>,
    ) -> Result<FrameOutcome> {
        let mut session = self.store.get_liveness_session(session_id).await?;
        let template = self.store.get_active_face_template(session.employee_id).await?;

        let result = self
            .sessions
            .submit_frame(&mut session, &template.embedding, image_bytes, now)
            .await;
        self.store.save_liveness_session(session).await?;
        result
    }

    /// `FinishLiveness(session_id)`: mints a liveness token if the session
    /// passed, or reports the terminal failure reason otherwise.
    pub async fn finish_liveness(
        &self,
        session_id: LivenessSessionId,
        terminal_id: TerminalId,
        now: DateTime<Utc>,
    ) -> Result<FinishLivenessOutcome> {
        let session = self.store.get_liveness_session(session_id).await?;
        if session.terminal_id != terminal_id {
            return Err(CanteenError::LivenessTokenTerminalMismatch);
        }

        match session.status {
            LivenessStatus::Passed => {
                let token = self.tokens.issue(
                    session.employee_id,
                    session.id,
                    terminal_id,
                    now,
                    self.config.liveness_token_ttl_sec,
                )?;
                Ok(FinishLivenessOutcome {
                    result: "PASSED",
                    liveness_token: Some(token),
                    expires_in_sec: Some(self.config.liveness_token_ttl_sec),
                    reason_code: None,
                })
            }
            LivenessStatus::Failed => Ok(FinishLivenessOutcome {
                result: "FAILED",
                liveness_token: None,
                expires_in_sec: None,
                reason_code: session.fail_reason_code.map(|r| match r {
                    canteen_types::FailReasonCode::FaceNotMatch => "FACE_NOT_MATCH",
                    canteen_types::FailReasonCode::BlinkNotDetected => "BLINK_NOT_DETECTED",
                }),
            }),
            LivenessStatus::Expired => Ok(FinishLivenessOutcome {
                result: "FAILED",
                liveness_token: None,
                expires_in_sec: None,
                reason_code: Some("LIVENESS_EXPIRED"),
            }),
            LivenessStatus::InProgress => Err(CanteenError::LivenessNotInProgress { session_id }),
            LivenessStatus::Used => Err(CanteenError::LivenessAlreadyUsed { session_id }),
        }
    }
}
