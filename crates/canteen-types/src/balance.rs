//! Per-employee subsidy and allowance counters.
//!
//! Both balances are created lazily on first charge (§3) and are never
//! decremented by the core — only the Payment Authorizer increments them,
//! under the row lock acquired in the canonical order of §5.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{EmployeeId, money::Cents};

/// A calendar year and month, used as half of the `MonthlyBalance` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Subsidy usage for one employee on one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySubsidyBalance {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub used_cents: Cents,
}

impl DailySubsidyBalance {
    #[must_use]
    pub fn new(employee_id: EmployeeId, date: NaiveDate) -> Self {
        Self {
            employee_id,
            date,
            used_cents: Cents::ZERO,
        }
    }
}

/// Personal-allowance usage for one employee in one calendar month.
///
/// `limit_cents` is a snapshot of `Employee::monthly_limit_cents` taken at
/// first use of the month (§9) — it must never be refreshed mid-month even
/// if the employee's limit changes later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyBalance {
    pub employee_id: EmployeeId,
    pub year_month: YearMonth,
    pub limit_cents: Cents,
    pub used_cents: Cents,
}

impl MonthlyBalance {
    #[must_use]
    pub fn new(employee_id: EmployeeId, year_month: YearMonth, limit_cents: Cents) -> Self {
        Self {
            employee_id,
            year_month,
            limit_cents,
            used_cents: Cents::ZERO,
        }
    }

    #[must_use]
    pub fn available(&self) -> Cents {
        self.limit_cents.saturating_sub(self.used_cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_month_of_date() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(YearMonth::of(d), YearMonth { year: 2025, month: 3 });
    }

    #[test]
    fn year_month_display() {
        assert_eq!(format!("{}", YearMonth { year: 2025, month: 3 }), "2025-03");
    }

    #[test]
    fn daily_balance_starts_zero() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let b = DailySubsidyBalance::new(EmployeeId::new(), d);
        assert_eq!(b.used_cents, Cents::ZERO);
    }

    #[test]
    fn monthly_balance_available() {
        let ym = YearMonth { year: 2025, month: 3 };
        let mut b = MonthlyBalance::new(EmployeeId::new(), ym, Cents::new(200_000));
        assert_eq!(b.available(), Cents::new(200_000));
        b.used_cents += Cents::new(5_000);
        assert_eq!(b.available(), Cents::new(195_000));
    }
}
