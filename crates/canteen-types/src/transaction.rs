//! The immutable payment audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EmployeeId, LivenessSessionId, TerminalId, TransactionId, money::Cents};

/// Outcome of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    Approved,
    Declined,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "APPROVED"),
            Self::Declined => write!(f, "DECLINED"),
        }
    }
}

/// An immutable record of one payment attempt.
///
/// Invariant (§3, §8 property 1): `status == Approved` implies
/// `subsidy_spent_cents + monthly_spent_cents == amount_cents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub timestamp: DateTime<Utc>,
    pub terminal_id: TerminalId,
    pub employee_id: EmployeeId,
    pub card_uid: String,
    pub amount_cents: Cents,
    pub subsidy_spent_cents: Cents,
    pub monthly_spent_cents: Cents,
    pub status: TransactionStatus,
    pub decline_code: Option<&'static str>,
    pub decline_message: Option<String>,
    pub liveness_session_id: Option<LivenessSessionId>,
}

impl Transaction {
    /// Whether this record satisfies the approved-sum invariant. Declined
    /// records are exempt — they carry whatever split was computed (often
    /// zero) up to the point of rejection.
    #[must_use]
    pub fn amounts_balance(&self) -> bool {
        if self.status != TransactionStatus::Approved {
            return true;
        }
        self.subsidy_spent_cents + self.monthly_spent_cents == self.amount_cents
    }
}
