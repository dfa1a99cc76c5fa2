//! An in-memory reference [`Store`] implementation. No SQL driver exists
//! anywhere in this workspace's dependency stack — `MemStore` is what
//! exercises the locking discipline of §4.4/§5 in tests, and is a
//! perfectly adequate single-process backend otherwise.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use canteen_types::{
    Card, CanteenError, DailySubsidyBalance, Employee, EmployeeId, FaceTemplate, LivenessSession,
    LivenessSessionId, MonthlyBalance, Terminal, Transaction, YearMonth, error::Result, money::Cents,
};
use chrono::NaiveDate;

use crate::row_locks::RowLocks;
use crate::store::{PaymentLock, Store};

#[derive(Default)]
struct Tables {
    terminals_by_token_hash: Mutex<HashMap<String, Terminal>>,
    cards_by_uid: Mutex<HashMap<String, Card>>,
    employees: Mutex<HashMap<EmployeeId, Employee>>,
    active_face_templates: Mutex<HashMap<EmployeeId, FaceTemplate>>,
    sessions: Mutex<HashMap<LivenessSessionId, LivenessSession>>,
    daily_balances: Mutex<HashMap<(EmployeeId, NaiveDate), DailySubsidyBalance>>,
    monthly_balances: Mutex<HashMap<(EmployeeId, YearMonth), MonthlyBalance>>,
    transactions: Mutex<Vec<Transaction>>,
}

#[derive(Default)]
struct Locks {
    session: RowLocks<LivenessSessionId>,
    card: RowLocks<String>,
    employee: RowLocks<EmployeeId>,
    daily: RowLocks<(EmployeeId, NaiveDate)>,
    monthly: RowLocks<(EmployeeId, YearMonth)>,
}

/// The in-memory [`Store`]. Cheap to clone (`Arc` internally) and safe to
/// share across concurrent request handlers.
#[derive(Clone, Default)]
pub struct MemStore {
    tables: Arc<Tables>,
    locks: Arc<Locks>,
}

impl MemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_terminal(&self, token_hash: impl Into<String>, terminal: Terminal) {
        self.tables
            .terminals_by_token_hash
            .lock()
            .expect("poisoned")
            .insert(token_hash.into(), terminal);
    }

    pub fn seed_card(&self, card: Card) {
        self.tables.cards_by_uid.lock().expect("poisoned").insert(card.uid.clone(), card);
    }

    pub fn seed_employee(&self, employee: Employee) {
        self.tables.employees.lock().expect("poisoned").insert(employee.id, employee);
    }

    pub fn seed_face_template(&self, template: FaceTemplate) {
        self.tables
            .active_face_templates
            .lock()
            .expect("poisoned")
            .insert(template.employee_id, template);
    }
}

#[async_trait]
impl Store for MemStore {
    async fn find_terminal_by_token_hash(&self, token_hash: &str) -> Result<Terminal> {
        self.tables
            .terminals_by_token_hash
            .lock()
            .expect("poisoned")
            .get(token_hash)
            .cloned()
            .ok_or(CanteenError::TerminalUnauthorized)
    }

    async fn get_card_by_uid(&self, uid: &str) -> Result<Card> {
        self.tables
            .cards_by_uid
            .lock()
            .expect("poisoned")
            .get(uid)
            .cloned()
            .ok_or_else(|| CanteenError::CardNotFound { uid: uid.to_string() })
    }

    async fn get_employee(&self, id: EmployeeId) -> Result<Employee> {
        self.tables
            .employees
            .lock()
            .expect("poisoned")
            .get(&id)
            .cloned()
            .ok_or_else(|| CanteenError::EmployeeBlocked { employee_id: id })
    }

    async fn get_active_face_template(&self, employee_id: EmployeeId) -> Result<FaceTemplate> {
        self.tables
            .active_face_templates
            .lock()
            .expect("poisoned")
            .get(&employee_id)
            .cloned()
            .ok_or(CanteenError::NoActiveFace { employee_id })
    }

    async fn put_face_template(&self, template: FaceTemplate) -> Result<()> {
        self.tables
            .active_face_templates
            .lock()
            .expect("poisoned")
            .insert(template.employee_id, template);
        Ok(())
    }

    async fn insert_liveness_session(&self, session: LivenessSession) -> Result<()> {
        self.tables.sessions.lock().expect("poisoned").insert(session.id, session);
        Ok(())
    }

    async fn get_liveness_session(&self, id: LivenessSessionId) -> Result<LivenessSession> {
        self.tables
            .sessions
            .lock()
            .expect("poisoned")
            .get(&id)
            .cloned()
            .ok_or(CanteenError::LivenessSessionNotFound { session_id: id })
    }

    async fn save_liveness_session(&self, session: LivenessSession) -> Result<()> {
        self.tables.sessions.lock().expect("poisoned").insert(session.id, session);
        Ok(())
    }

    async fn get_daily_subsidy_balance(&self, employee_id: EmployeeId, date: NaiveDate) -> Result<DailySubsidyBalance> {
        Ok(self
            .tables
            .daily_balances
            .lock()
            .expect("poisoned")
            .get(&(employee_id, date))
            .cloned()
            .unwrap_or_else(|| DailySubsidyBalance::new(employee_id, date)))
    }

    async fn get_monthly_balance(&self, employee_id: EmployeeId, year_month: YearMonth, limit_cents: Cents) -> Result<MonthlyBalance> {
        Ok(self
            .tables
            .monthly_balances
            .lock()
            .expect("poisoned")
            .get(&(employee_id, year_month))
            .cloned()
            .unwrap_or_else(|| MonthlyBalance::new(employee_id, year_month, limit_cents)))
    }

    async fn lock_for_payment(
        &self,
        card_uid: &str,
        session_id: LivenessSessionId,
        today: NaiveDate,
    ) -> Result<Box<dyn PaymentLock>> {
        // Canonical order (§5): session -> card -> employee -> daily -> monthly.
        let session_guard = self.locks.session.acquire(session_id).await;
        let card_guard = self.locks.card.acquire(card_uid.to_string()).await;

        let session = self.get_liveness_session(session_id).await?;
        let card = self.get_card_by_uid(card_uid).await?;

        let employee_guard = self.locks.employee.acquire(card.employee_id).await;
        let employee = self.get_employee(card.employee_id).await?;

        let daily_guard = self.locks.daily.acquire((employee.id, today)).await;
        let year_month = YearMonth::of(today);
        let monthly_guard = self.locks.monthly.acquire((employee.id, year_month)).await;

        let daily = self
            .tables
            .daily_balances
            .lock()
            .expect("poisoned")
            .entry((employee.id, today))
            .or_insert_with(|| DailySubsidyBalance::new(employee.id, today))
            .clone();
        let monthly = self
            .tables
            .monthly_balances
            .lock()
            .expect("poisoned")
            .entry((employee.id, year_month))
            .or_insert_with(|| MonthlyBalance::new(employee.id, year_month, employee.monthly_limit_cents))
            .clone();

        Ok(Box::new(MemPaymentLock {
            tables: self.tables.clone(),
            _session_guard: session_guard,
            _card_guard: card_guard,
            _employee_guard: employee_guard,
            _daily_guard: daily_guard,
            _monthly_guard: monthly_guard,
            session,
            card,
            employee,
            daily,
            monthly,
        }))
    }

    async fn transactions_for_session(&self, session_id: LivenessSessionId) -> Result<Vec<Transaction>> {
        Ok(self
            .tables
            .transactions
            .lock()
            .expect("poisoned")
            .iter()
            .filter(|t| t.liveness_session_id == Some(session_id))
            .cloned()
            .collect())
    }
}

struct MemPaymentLock {
    tables: Arc<Tables>,
    _session_guard: tokio::sync::OwnedMutexGuard<()>,
    _card_guard: tokio::sync::OwnedMutexGuard<()>,
    _employee_guard: tokio::sync::OwnedMutexGuard<()>,
    _daily_guard: tokio::sync::OwnedMutexGuard<()>,
    _monthly_guard: tokio::sync::OwnedMutexGuard<()>,
    session: LivenessSession,
    card: Card,
    employee: Employee,
    daily: DailySubsidyBalance,
    monthly: MonthlyBalance,
}

#[async_trait]
impl PaymentLock for MemPaymentLock {
    fn session(&self) -> &LivenessSession {
        &self.session
    }

    fn card(&self) -> &Card {
        &self.card
    }

    fn employee(&self) -> &Employee {
        &self.employee
    }

    fn daily(&self) -> &DailySubsidyBalance {
        &self.daily
    }

    fn monthly(&self) -> &MonthlyBalance {
        &self.monthly
    }

    async fn commit(
        mut self: Box<Self>,
        subsidy_spent: Cents,
        personal_spent: Cents,
        transaction: Transaction,
    ) -> Result<()> {
        self.daily.used_cents += subsidy_spent;
        self.monthly.used_cents += personal_spent;
        self.session.mark_used(transaction.timestamp)?;

        self.tables
            .daily_balances
            .lock()
            .expect("poisoned")
            .insert((self.daily.employee_id, self.daily.date), self.daily.clone());
        self.tables
            .monthly_balances
            .lock()
            .expect("poisoned")
            .insert((self.monthly.employee_id, self.monthly.year_month), self.monthly.clone());
        self.tables.sessions.lock().expect("poisoned").insert(self.session.id, self.session.clone());
        self.tables.transactions.lock().expect("poisoned").push(transaction);
        Ok(())
    }

    async fn record_declined(self: Box<Self>, transaction: Transaction) -> Result<()> {
        self.tables.transactions.lock().expect("poisoned").push(transaction);
        Ok(())
    }
}
