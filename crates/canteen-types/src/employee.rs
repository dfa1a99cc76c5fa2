//! Employee identity and policy.

use serde::{Deserialize, Serialize};

use crate::{EmployeeId, money::Cents};

/// Employment category. Only `Worker` is subsidy-eligible — see
/// the Payment Authorizer's eligibility computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeKind {
    Worker,
    Staff,
}

impl std::fmt::Display for EmployeeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Worker => write!(f, "worker"),
            Self::Staff => write!(f, "staff"),
        }
    }
}

/// Employee lifecycle status. Never reverts past `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeStatus {
    Active,
    Blocked,
    Terminated,
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Blocked => write!(f, "blocked"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}

/// An employee of the industrial site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub personnel_number: Option<String>,
    pub full_name: String,
    pub kind: EmployeeKind,
    pub status: EmployeeStatus,
    pub monthly_limit_cents: Cents,
    pub photo: Option<Vec<u8>>,
    pub notification_channel_id: Option<String>,
}

impl Employee {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Employee {
    pub fn dummy_worker(monthly_limit_cents: i64) -> Self {
        Self {
            id: EmployeeId::new(),
            personnel_number: Some("P-0001".to_string()),
            full_name: "Test Worker".to_string(),
            kind: EmployeeKind::Worker,
            status: EmployeeStatus::Active,
            monthly_limit_cents: Cents::new(monthly_limit_cents),
            photo: None,
            notification_channel_id: None,
        }
    }

    pub fn dummy_staff(monthly_limit_cents: i64) -> Self {
        Self {
            id: EmployeeId::new(),
            personnel_number: Some("P-0002".to_string()),
            full_name: "Test Staff".to_string(),
            kind: EmployeeKind::Staff,
            status: EmployeeStatus::Active,
            monthly_limit_cents: Cents::new(monthly_limit_cents),
            photo: None,
            notification_channel_id: None,
        }
    }
}
