//! Physical card tokens presented at the terminal.

use serde::{Deserialize, Serialize};

use crate::{CardId, EmployeeId};

/// Card lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardStatus {
    Active,
    Blocked,
    Lost,
}

impl std::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Blocked => write!(f, "blocked"),
            Self::Lost => write!(f, "lost"),
        }
    }
}

/// A physical card. `uid` is the opaque string printed/encoded on the
/// token and is the lookup key terminals use; `id` is the internal
/// primary key. Invariant: at most one `Card` row per `uid` (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub uid: String,
    pub employee_id: EmployeeId,
    pub status: CardStatus,
}

impl Card {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == CardStatus::Active
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Card {
    pub fn dummy_active(uid: impl Into<String>, employee_id: EmployeeId) -> Self {
        Self {
            id: CardId::new(),
            uid: uid.into(),
            employee_id,
            status: CardStatus::Active,
        }
    }
}
