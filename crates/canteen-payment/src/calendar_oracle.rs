//! Company working-day and employee-absence lookups (§4.5). Both are
//! side-effect-free reads — no locking, no mutation.

use canteen_types::EmployeeId;
use chrono::{Datelike, NaiveDate, Weekday};

/// An inclusive absence range for one employee.
#[derive(Debug, Clone, Copy)]
pub struct AbsenceRange {
    pub employee_id: EmployeeId,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl AbsenceRange {
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.date_from <= date && date <= self.date_to
    }
}

/// Company holiday calendar and employee absence tracking.
#[derive(Debug, Default, Clone)]
pub struct CalendarOracle {
    holidays: Vec<NaiveDate>,
    absences: Vec<AbsenceRange>,
}

impl CalendarOracle {
    #[must_use]
    pub fn new(holidays: Vec<NaiveDate>, absences: Vec<AbsenceRange>) -> Self {
        Self { holidays, absences }
    }

    /// `company_workday(date) = weekday in Mon..Fri AND date not in holidays`.
    #[must_use]
    pub fn company_workday(&self, date: NaiveDate) -> bool {
        let is_weekday = !matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        is_weekday && !self.holidays.contains(&date)
    }

    /// `employee_working(employee, date) = no absence row covers date`.
    #[must_use]
    pub fn employee_working(&self, employee_id: EmployeeId, date: NaiveDate) -> bool {
        !self
            .absences
            .iter()
            .any(|a| a.employee_id == employee_id && a.covers(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_not_holiday_is_workday() {
        let oracle = CalendarOracle::default();
        let tue = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert!(oracle.company_workday(tue));
    }

    #[test]
    fn weekend_is_not_workday() {
        let oracle = CalendarOracle::default();
        let sat = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        assert!(!oracle.company_workday(sat));
    }

    #[test]
    fn holiday_is_not_workday() {
        let new_years = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let oracle = CalendarOracle::new(vec![new_years], vec![]);
        assert!(!oracle.company_workday(new_years));
    }

    #[test]
    fn absence_range_blocks_employee() {
        let employee_id = EmployeeId::new();
        let from = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let oracle = CalendarOracle::new(vec![], vec![AbsenceRange { employee_id, date_from: from, date_to: to }]);

        let mid_absence = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert!(!oracle.employee_working(employee_id, mid_absence));

        let after_absence = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        assert!(oracle.employee_working(employee_id, after_absence));
    }

    #[test]
    fn unrelated_employee_unaffected_by_absence() {
        let employee_a = EmployeeId::new();
        let employee_b = EmployeeId::new();
        let from = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let oracle = CalendarOracle::new(vec![], vec![AbsenceRange { employee_id: employee_a, date_from: from, date_to: to }]);

        let mid = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert!(oracle.employee_working(employee_b, mid));
    }
}
