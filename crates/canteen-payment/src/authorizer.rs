//! The Payment Authorizer (§4.4): card/employee gating, subsidy
//! eligibility, split computation, and the atomic balance debit.

use canteen_liveness::NotificationSink;
use canteen_store::Store;
use canteen_token::TokenService;
use canteen_types::{
    CanteenConfig, CanteenError, Cents, TerminalId, Transaction, TransactionId, TransactionStatus,
    error::Result,
};
use chrono::{DateTime, Utc};

use crate::calendar_oracle::CalendarOracle;

/// Outcome of one `Pay` call (§6). A `Declined` outcome after the token
/// was accepted still carries a `decline_code`/`decline_message` and is
/// recorded as a `declined` [`Transaction`] — only rejections before
/// token acceptance return an `Err` with no transaction recorded.
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub status: TransactionStatus,
    pub amount_cents: Cents,
    pub subsidy_spent_cents: Cents,
    pub monthly_spent_cents: Cents,
    pub subsidy_today_left_cents: Cents,
    pub monthly_left_cents: Cents,
    pub decline_code: Option<&'static str>,
    pub decline_message: Option<String>,
    pub transaction_id: TransactionId,
}

/// Authorizes payments against the pipeline of §4.4.
pub struct PaymentAuthorizer<S, N> {
    pub store: S,
    pub tokens: TokenService,
    pub calendar: CalendarOracle,
    pub config: CanteenConfig,
    pub notifications: N,
}

impl<S, N> PaymentAuthorizer<S, N>
where
    S: Store,
    N: NotificationSink,
{
    #[must_use]
    pub fn new(store: S, tokens: TokenService, calendar: CalendarOracle, config: CanteenConfig, notifications: N) -> Self {
        Self { store, tokens, calendar, config, notifications }
    }

    /// Runs the full authorization pipeline. See §4.4 steps 1–11.
    pub async fn pay(
        &self,
        card_uid: &str,
        amount_cents: Cents,
        liveness_token: &str,
        caller_terminal_id: TerminalId,
        now: DateTime<Utc>,
    ) -> Result<PaymentOutcome> {
        if card_uid.is_empty() {
            return Err(CanteenError::BadRequest { reason: "card_uid is required".to_string() });
        }
        if liveness_token.is_empty() {
            return Err(CanteenError::BadRequest { reason: "liveness_token is required".to_string() });
        }
        if !amount_cents.is_positive() {
            return Err(CanteenError::BadAmount);
        }
        if amount_cents.0 > self.config.max_meal_cents {
            return Err(CanteenError::MaxMealExceeded);
        }
        if amount_cents.0 > self.config.max_receipt_cents {
            return Err(CanteenError::MaxReceiptExceeded);
        }

        // Step 1: verify token and accept-or-reject before any row is locked.
        let claims = self.tokens.verify(liveness_token, now)?;
        if claims.tid != caller_terminal_id {
            return Err(CanteenError::LivenessTokenTerminalMismatch);
        }
        let session = self.store.get_liveness_session(claims.sid).await?;
        if session.terminal_id != caller_terminal_id {
            return Err(CanteenError::LivenessTokenTerminalMismatch);
        }
        if session.used_at.is_some() {
            return Err(CanteenError::LivenessAlreadyUsed { session_id: session.id });
        }
        if session.status != canteen_types::LivenessStatus::Passed {
            return Err(CanteenError::LivenessNotInProgress { session_id: session.id });
        }

        // Steps 2–5: acquire the canonical lock order (session -> card ->
        // employee -> daily -> monthly), creating daily/monthly lazily.
        let today = now.date_naive();
        let lock = self.store.lock_for_payment(card_uid, session.id, today).await?;

        // Re-check under lock: a concurrent Pay may have consumed this
        // session between the check above and acquiring the lock (§5).
        if lock.session().used_at.is_some() || lock.session().status != canteen_types::LivenessStatus::Passed {
            return Err(CanteenError::LivenessAlreadyUsed { session_id: session.id });
        }

        if !lock.card().is_active() {
            let reason = CanteenError::CardBlocked { uid: card_uid.to_string() };
            return self
                .record_decline(lock, session.id, caller_terminal_id, card_uid, amount_cents, now, reason.code(), reason.to_string())
                .await;
        }

        let employee = lock.employee().clone();
        if !employee.is_active() {
            let reason = CanteenError::EmployeeBlocked { employee_id: employee.id };
            return self
                .record_decline(lock, session.id, caller_terminal_id, card_uid, amount_cents, now, reason.code(), reason.to_string())
                .await;
        }

        // Step 6: subsidy eligibility.
        let eligible = employee.kind == canteen_types::EmployeeKind::Worker
            && self.calendar.company_workday(today)
            && self.calendar.employee_working(employee.id, today);

        // Step 7-8: split.
        let daily_limit = Cents::new(self.config.subsidy_daily_cents);
        let subsidy_available = if eligible { daily_limit.saturating_sub(lock.daily().used_cents) } else { Cents::ZERO };
        let subsidy_spent = subsidy_available.min(amount_cents);
        let personal_spent = amount_cents.saturating_sub(subsidy_spent);

        // Step 9: monthly gate.
        let monthly_available = lock.monthly().available();
        if personal_spent.0 > monthly_available.0 {
            let reason = CanteenError::InsufficientMonthlyLimit { card_id: lock.card().id };
            return self
                .record_decline(lock, session.id, caller_terminal_id, card_uid, amount_cents, now, reason.code(), reason.to_string())
                .await;
        }

        // Step 10-11: commit and report remaining balances.
        let new_daily_used = lock.daily().used_cents + subsidy_spent;
        let new_monthly_used = lock.monthly().used_cents + personal_spent;
        let monthly_limit = lock.monthly().limit_cents;

        let transaction = Transaction {
            id: TransactionId::new(),
            timestamp: now,
            terminal_id: caller_terminal_id,
            employee_id: employee.id,
            card_uid: card_uid.to_string(),
            amount_cents,
            subsidy_spent_cents: subsidy_spent,
            monthly_spent_cents: personal_spent,
            status: TransactionStatus::Approved,
            decline_code: None,
            decline_message: None,
            liveness_session_id: Some(session.id),
        };
        let transaction_id = transaction.id;
        lock.commit(subsidy_spent, personal_spent, transaction).await?;

        tracing::info!(employee_id = %employee.id, session_id = %session.id, %amount_cents, "payment approved");

        if let Some(channel_id) = employee.notification_channel_id.as_deref() {
            let text = format!("Payment of {amount_cents} approved for {}", employee.full_name);
            let timeout = std::time::Duration::from_secs(self.config.notification_timeout_sec);
            if tokio::time::timeout(timeout, self.notifications.notify(channel_id, &text)).await.is_err() {
                tracing::warn!(employee_id = %employee.id, session_id = %session.id, "payment notification timed out");
            }
        }

        Ok(PaymentOutcome {
            status: TransactionStatus::Approved,
            amount_cents,
            subsidy_spent_cents: subsidy_spent,
            monthly_spent_cents: personal_spent,
            subsidy_today_left_cents: if eligible { daily_limit.saturating_sub(new_daily_used) } else { Cents::ZERO },
            monthly_left_cents: monthly_limit.saturating_sub(new_monthly_used),
            decline_code: None,
            decline_message: None,
            transaction_id,
        })
    }

    async fn record_decline(
        &self,
        lock: Box<dyn canteen_store::PaymentLock>,
        session_id: canteen_types::LivenessSessionId,
        terminal_id: TerminalId,
        card_uid: &str,
        amount_cents: Cents,
        now: DateTime<Utc>,
        code: &'static str,
        message: String,
    ) -> Result<PaymentOutcome> {
        let employee_id = lock.employee().id;
        let transaction = Transaction {
            id: TransactionId::new(),
            timestamp: now,
            terminal_id,
            employee_id,
            card_uid: card_uid.to_string(),
            amount_cents,
            subsidy_spent_cents: Cents::ZERO,
            monthly_spent_cents: Cents::ZERO,
            status: TransactionStatus::Declined,
            decline_code: Some(code),
            decline_message: Some(message.clone()),
            liveness_session_id: Some(session_id),
        };
        let transaction_id = transaction.id;
        lock.record_declined(transaction).await?;

        tracing::warn!(employee_id = %employee_id, session_id = %session_id, code, "payment declined");

        Ok(PaymentOutcome {
            status: TransactionStatus::Declined,
            amount_cents,
            subsidy_spent_cents: Cents::ZERO,
            monthly_spent_cents: Cents::ZERO,
            subsidy_today_left_cents: Cents::ZERO,
            monthly_left_cents: Cents::ZERO,
            decline_code: Some(code),
            decline_message: Some(message),
            transaction_id,
        })
    }
}
