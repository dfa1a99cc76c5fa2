//! The Data Access Boundary (§4.6): typed accessors for entities and
//! balances, plus the row-locked payment transaction handle that backs
//! the locking discipline of §4.4/§5.

use async_trait::async_trait;
use canteen_types::{
    Card, DailySubsidyBalance, Employee, EmployeeId, FaceTemplate, LivenessSession,
    LivenessSessionId, MonthlyBalance, Terminal, Transaction, YearMonth, error::Result, money::Cents,
};
use chrono::NaiveDate;

/// Typed, transactional accessors for every entity the core touches.
///
/// Implementations must honor the row-locking discipline of §5: mutating
/// operations on balances, sessions, and transactions only happen through
/// [`Self::lock_for_payment`], never through an unguarded read-modify-write.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_terminal_by_token_hash(&self, token_hash: &str) -> Result<Terminal>;
    async fn get_card_by_uid(&self, uid: &str) -> Result<Card>;
    async fn get_employee(&self, id: EmployeeId) -> Result<Employee>;
    async fn get_active_face_template(&self, employee_id: EmployeeId) -> Result<FaceTemplate>;

    /// Deactivates any existing active template for `template.employee_id`
    /// and stores `template` as the new active one, atomically (§3).
    async fn put_face_template(&self, template: FaceTemplate) -> Result<()>;

    async fn insert_liveness_session(&self, session: LivenessSession) -> Result<()>;
    async fn get_liveness_session(&self, id: LivenessSessionId) -> Result<LivenessSession>;

    /// Unlocked read of today's subsidy usage, for the `employee_info`
    /// read path (§6) — returns a zero balance if none has been created
    /// yet, without inserting one (only a payment creates the row, §3).
    async fn get_daily_subsidy_balance(&self, employee_id: EmployeeId, date: NaiveDate) -> Result<DailySubsidyBalance>;

    /// Unlocked read of this month's personal allowance usage, for the
    /// `employee_info` read path (§6) — same no-create-on-read contract
    /// as [`Self::get_daily_subsidy_balance`].
    async fn get_monthly_balance(&self, employee_id: EmployeeId, year_month: YearMonth, limit_cents: Cents) -> Result<MonthlyBalance>;

    /// Persists `session` outside of a payment transaction — used by
    /// `SubmitFrame`/`FinishLiveness`, which mutate only the session row
    /// and need no cross-entity lock ordering.
    async fn save_liveness_session(&self, session: LivenessSession) -> Result<()>;

    /// Acquires exclusive locks on the session, card, employee, daily
    /// balance, and monthly balance rows needed to authorize a payment,
    /// in the canonical order of §5: session → card → employee → daily →
    /// monthly. Daily and monthly balances are created lazily if absent
    /// (§3, §4.4 steps 4–5). The returned handle holds the locks until
    /// dropped or consumed by [`PaymentLock::commit`]/[`PaymentLock::record_declined`].
    async fn lock_for_payment(
        &self,
        card_uid: &str,
        session_id: LivenessSessionId,
        today: NaiveDate,
    ) -> Result<Box<dyn PaymentLock>>;

    /// Transactions recorded against a given session, for idempotency
    /// checks and audit queries (§8 properties 4, 8).
    async fn transactions_for_session(&self, session_id: LivenessSessionId) -> Result<Vec<Transaction>>;
}

/// A held set of row locks for one payment authorization attempt.
///
/// Dropping this value without calling [`Self::commit`] or
/// [`Self::record_declined`] releases the locks without persisting any
/// change — equivalent to a rolled-back transaction.
#[async_trait]
pub trait PaymentLock: Send {
    fn session(&self) -> &LivenessSession;
    fn card(&self) -> &Card;
    fn employee(&self) -> &Employee;
    fn daily(&self) -> &DailySubsidyBalance;
    fn monthly(&self) -> &MonthlyBalance;

    /// Commits the approved outcome in one atomic step (§4.4 step 10):
    /// bumps daily/monthly usage, marks the session `used`, and inserts
    /// `transaction`. Consumes the lock handle, releasing the rows.
    async fn commit(
        self: Box<Self>,
        subsidy_spent: Cents,
        personal_spent: Cents,
        transaction: Transaction,
    ) -> Result<()>;

    /// Records a `declined` transaction without mutating balances or the
    /// session — the session remains `passed` so the cashier can retry
    /// within the token's TTL (§4.4, §9). Consumes the lock handle.
    async fn record_declined(self: Box<Self>, transaction: Transaction) -> Result<()>;
}
