//! Error types for the canteen authorization system.
//!
//! Every variant carries one of the stable string codes a caller-facing
//! API would surface verbatim, plus the HTTP status that code maps to.
//! `code()` and `http_status()` let a caller translate any `CanteenError`
//! into a `{ok:false, code, message}` envelope without a second table.

use thiserror::Error;

use crate::{CardId, EmployeeId, LivenessSessionId};

/// Central error enum for all canteen authorization operations.
#[derive(Debug, Error)]
pub enum CanteenError {
    // -- Terminal / authentication --------------------------------------
    #[error("missing or unknown terminal token")]
    TerminalUnauthorized,

    #[error("terminal is not active")]
    TerminalBlocked,

    // -- Card / employee gating ------------------------------------------
    #[error("card not found: {uid}")]
    CardNotFound { uid: String },

    #[error("card is blocked or reported lost: {uid}")]
    CardBlocked { uid: String },

    #[error("employee {employee_id} is not active")]
    EmployeeBlocked { employee_id: EmployeeId },

    // -- Enrollment / frame quality ---------------------------------------
    #[error("no active face template enrolled for employee {employee_id}")]
    NoActiveFace { employee_id: EmployeeId },

    #[error("no face detected in frame")]
    FaceNotFound,

    #[error("more than one face detected in frame")]
    MultipleFaces,

    #[error("detected face is too small in frame")]
    FaceTooSmall,

    #[error("frame is too dark to evaluate")]
    LowLight,

    #[error("frame is too blurry to evaluate")]
    Blurry,

    #[error("frame could not be decoded")]
    BadImage,

    // -- Identity match ----------------------------------------------------
    #[error("face distance {distance:.4} exceeds threshold {threshold:.4}")]
    FaceNotMatch { distance: f64, threshold: f64 },

    // -- Liveness session lifecycle ------------------------------------
    #[error("liveness session {session_id} has expired")]
    LivenessExpired { session_id: LivenessSessionId },

    #[error("liveness session {session_id} is not in progress")]
    LivenessNotInProgress { session_id: LivenessSessionId },

    #[error("liveness session {session_id} failed: {reason_code}")]
    LivenessFailed {
        session_id: LivenessSessionId,
        reason_code: &'static str,
    },

    #[error("liveness session not found: {session_id}")]
    LivenessSessionNotFound { session_id: LivenessSessionId },

    // -- Token service ----------------------------------------------------
    #[error("liveness token has expired")]
    LivenessTokenExpired,

    #[error("liveness token is malformed or signature is invalid")]
    LivenessTokenInvalid,

    #[error("liveness token terminal does not match caller")]
    LivenessTokenTerminalMismatch,

    #[error("liveness session {session_id} has already been used")]
    LivenessAlreadyUsed { session_id: LivenessSessionId },

    // -- Payment input validation -----------------------------------------
    #[error("amount must be a positive number of cents")]
    BadAmount,

    #[error("amount exceeds the maximum single-meal charge")]
    MaxMealExceeded,

    #[error("amount exceeds the maximum single-receipt charge")]
    MaxReceiptExceeded,

    #[error("insufficient monthly personal allowance for card {card_id}")]
    InsufficientMonthlyLimit { card_id: CardId },

    #[error("malformed request: {reason}")]
    BadRequest { reason: String },

    // -- Internal / infrastructure -----------------------------------------
    #[error("internal error: {0}")]
    Internal(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl CanteenError {
    /// The stable string code a caller-facing API would surface verbatim.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::TerminalUnauthorized => "TERMINAL_UNAUTHORIZED",
            Self::TerminalBlocked => "TERMINAL_BLOCKED",
            Self::CardNotFound { .. } => "CARD_NOT_FOUND",
            Self::CardBlocked { .. } => "CARD_BLOCKED",
            Self::EmployeeBlocked { .. } => "EMPLOYEE_BLOCKED",
            Self::NoActiveFace { .. } => "NO_ACTIVE_FACE",
            Self::FaceNotFound => "FACE_NOT_FOUND",
            Self::MultipleFaces => "MULTIPLE_FACES",
            Self::FaceTooSmall => "FACE_TOO_SMALL",
            Self::LowLight => "LOW_LIGHT",
            Self::Blurry => "BLURRY",
            Self::BadImage => "BAD_IMAGE",
            Self::FaceNotMatch { .. } => "FACE_NOT_MATCH",
            Self::LivenessExpired { .. } => "LIVENESS_EXPIRED",
            Self::LivenessNotInProgress { .. } => "LIVENESS_NOT_IN_PROGRESS",
            Self::LivenessFailed { .. } => "LIVENESS_FAILED",
            Self::LivenessSessionNotFound { .. } => "LIVENESS_SESSION_NOT_FOUND",
            Self::LivenessTokenExpired => "LIVENESS_TOKEN_EXPIRED",
            Self::LivenessTokenInvalid => "LIVENESS_TOKEN_INVALID",
            Self::LivenessTokenTerminalMismatch => "LIVENESS_TOKEN_TERMINAL_MISMATCH",
            Self::LivenessAlreadyUsed { .. } => "LIVENESS_ALREADY_USED",
            Self::BadAmount => "BAD_AMOUNT",
            Self::MaxMealExceeded => "MAX_MEAL_1000_EXCEEDED",
            Self::MaxReceiptExceeded => "MAX_RECEIPT_500_EXCEEDED",
            Self::InsufficientMonthlyLimit { .. } => "INSUFFICIENT_MONTHLY_LIMIT",
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::Internal(_) => "INTERNAL",
            Self::Serialization(_) => "INTERNAL",
            Self::Configuration(_) => "INTERNAL",
            Self::Storage(_) => "INTERNAL",
        }
    }

    /// The HTTP status a caller-facing API would attach to this error.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::TerminalUnauthorized
            | Self::LivenessTokenExpired
            | Self::LivenessTokenInvalid => 401,
            Self::TerminalBlocked
            | Self::CardBlocked { .. }
            | Self::EmployeeBlocked { .. }
            | Self::FaceNotMatch { .. }
            | Self::LivenessFailed { .. }
            | Self::LivenessTokenTerminalMismatch => 403,
            Self::CardNotFound { .. } => 404,
            Self::LivenessExpired { .. }
            | Self::LivenessNotInProgress { .. }
            | Self::LivenessAlreadyUsed { .. }
            | Self::LivenessSessionNotFound { .. } => 409,
            Self::NoActiveFace { .. }
            | Self::FaceNotFound
            | Self::MultipleFaces
            | Self::FaceTooSmall
            | Self::LowLight
            | Self::Blurry
            | Self::BadImage
            | Self::BadAmount
            | Self::MaxMealExceeded
            | Self::MaxReceiptExceeded
            | Self::InsufficientMonthlyLimit { .. }
            | Self::BadRequest { .. } => 400,
            Self::Internal(_) | Self::Serialization(_) | Self::Configuration(_) | Self::Storage(_) => 500,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, CanteenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_matches_spec_table() {
        assert_eq!(CanteenError::TerminalUnauthorized.code(), "TERMINAL_UNAUTHORIZED");
        assert_eq!(
            CanteenError::InsufficientMonthlyLimit {
                card_id: CardId::new()
            }
            .code(),
            "INSUFFICIENT_MONTHLY_LIMIT"
        );
        assert_eq!(CanteenError::MaxReceiptExceeded.code(), "MAX_RECEIPT_500_EXCEEDED");
    }

    #[test]
    fn http_status_matches_spec_table() {
        assert_eq!(CanteenError::TerminalUnauthorized.http_status(), 401);
        assert_eq!(
            CanteenError::CardNotFound { uid: "X".into() }.http_status(),
            404
        );
        assert_eq!(
            CanteenError::LivenessAlreadyUsed {
                session_id: LivenessSessionId::new()
            }
            .http_status(),
            409
        );
        assert_eq!(CanteenError::BadAmount.http_status(), 400);
    }

    #[test]
    fn face_not_match_display_contains_values() {
        let err = CanteenError::FaceNotMatch {
            distance: 0.8,
            threshold: 0.52,
        };
        let msg = format!("{err}");
        assert!(msg.contains("0.8"));
        assert!(msg.contains("0.52"));
    }
}
