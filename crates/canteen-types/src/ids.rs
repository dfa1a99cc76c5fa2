//! Globally unique identifiers used throughout the canteen authorization system.
//!
//! All entity IDs use UUIDv7 for time-ordered lexicographic sorting.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// EmployeeId
// ---------------------------------------------------------------------------

/// Unique identifier for an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EmployeeId(pub Uuid);

impl EmployeeId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for EmployeeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// CardId
// ---------------------------------------------------------------------------

/// Unique identifier for a card record. Distinct from the card's external
/// `uid` string printed on the physical token — see [`crate::Card::uid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CardId(pub Uuid);

impl CardId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// FaceTemplateId
// ---------------------------------------------------------------------------

/// Unique identifier for a stored face template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct FaceTemplateId(pub Uuid);

impl FaceTemplateId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for FaceTemplateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FaceTemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TerminalId
// ---------------------------------------------------------------------------

/// Unique identifier for an authenticated cashier terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TerminalId(pub Uuid);

impl TerminalId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TerminalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// LivenessSessionId
// ---------------------------------------------------------------------------

/// Unique identifier for a liveness session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct LivenessSessionId(pub Uuid);

impl LivenessSessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for LivenessSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LivenessSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TransactionId
// ---------------------------------------------------------------------------

/// Unique identifier for a transaction audit record.
///
/// Deterministic derivation is intentionally *not* offered here (unlike
/// `TradeId` in a matching engine): transactions are created exactly once,
/// by the single authorizer holding the session row lock, so random
/// UUIDv7 assignment carries no duplication risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TransactionId(pub Uuid);

impl TransactionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_id_uniqueness() {
        let a = EmployeeId::new();
        let b = EmployeeId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn employee_id_ordering() {
        let a = EmployeeId::new();
        let b = EmployeeId::new();
        assert!(a < b);
    }

    #[test]
    fn card_id_uniqueness() {
        assert_ne!(CardId::new(), CardId::new());
    }

    #[test]
    fn liveness_session_id_uniqueness() {
        assert_ne!(LivenessSessionId::new(), LivenessSessionId::new());
    }

    #[test]
    fn serde_roundtrips() {
        let eid = EmployeeId::new();
        let json = serde_json::to_string(&eid).unwrap();
        let back: EmployeeId = serde_json::from_str(&json).unwrap();
        assert_eq!(eid, back);

        let sid = LivenessSessionId::new();
        let json = serde_json::to_string(&sid).unwrap();
        let back: LivenessSessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(sid, back);
    }
}
