//! Authenticated cashier terminals.

use serde::{Deserialize, Serialize};

use crate::TerminalId;

/// Terminal lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalStatus {
    Active,
    Blocked,
}

impl std::fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Blocked => write!(f, "blocked"),
        }
    }
}

/// A provisioned cashier terminal. `api_token_hash` is the salted hash of
/// the opaque bearer token presented in `X-Terminal-Token`; the raw token
/// itself is never persisted (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terminal {
    pub id: TerminalId,
    pub display_name: String,
    pub status: TerminalStatus,
    pub api_token_hash: String,
}

impl Terminal {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == TerminalStatus::Active
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Terminal {
    pub fn dummy_active(display_name: impl Into<String>) -> Self {
        Self {
            id: TerminalId::new(),
            display_name: display_name.into(),
            status: TerminalStatus::Active,
            api_token_hash: "test-hash".to_string(),
        }
    }
}
