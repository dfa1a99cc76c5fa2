//! Seed scenarios S1–S5 (§8), end to end against `MemStore`.

use canteen_liveness::oracles::stub::NoopNotificationSink;
use canteen_payment::{CalendarOracle, PaymentAuthorizer};
use canteen_store::MemStore;
use canteen_token::TokenService;
use canteen_types::{
    Card, CanteenConfig, Employee, EmployeeKind, LivenessSession, LivenessStatus, TerminalId, money::Cents,
};
use chrono::{NaiveDate, TimeZone, Utc};

fn tuesday_2025_03_04() -> chrono::DateTime<Utc> {
    Utc.from_utc_datetime(&NaiveDate::from_ymd_opt(2025, 3, 4).unwrap().and_hms_opt(12, 0, 0).unwrap())
}

async fn passed_session_setup(
    employee: &Employee,
    card: &Card,
    terminal_id: TerminalId,
    now: chrono::DateTime<Utc>,
) -> (MemStore, TokenService, LivenessSession) {
    let store = MemStore::new();
    store.seed_employee(employee.clone());
    store.seed_card(card.clone());

    let mut session = LivenessSession::new(
        employee.id,
        terminal_id,
        vec![canteen_types::LivenessCommand::TurnLeft, canteen_types::LivenessCommand::Tilt],
        now,
        chrono::Duration::seconds(25),
    );
    session.mark_passed().unwrap();
    store.insert_liveness_session(session.clone()).await.unwrap();

    (store, TokenService::new(b"test-secret".to_vec()), session)
}

#[tokio::test]
async fn s1_happy_path_worker_workday() {
    let terminal_id = TerminalId::new();
    let employee = Employee::dummy_worker(200_000);
    let card = Card::dummy_active("DEMO-1", employee.id);
    let now = tuesday_2025_03_04();
    let (store, tokens, session) = passed_session_setup(&employee, &card, terminal_id, now).await;

    let authorizer = PaymentAuthorizer::new(store, tokens.clone(), CalendarOracle::default(), CanteenConfig::test_default(), NoopNotificationSink);
    let token = tokens.issue(employee.id, session.id, terminal_id, now, 60).unwrap();

    let outcome = authorizer
        .pay(&card.uid, Cents::new(15_000), &token, terminal_id, now)
        .await
        .unwrap();

    assert_eq!(outcome.status, canteen_types::TransactionStatus::Approved);
    assert_eq!(outcome.subsidy_spent_cents, Cents::new(10_000));
    assert_eq!(outcome.monthly_spent_cents, Cents::new(5_000));
    assert_eq!(outcome.subsidy_today_left_cents, Cents::ZERO);
    assert_eq!(outcome.monthly_left_cents, Cents::new(195_000));
}

#[tokio::test]
async fn s2_staff_gets_no_subsidy() {
    let terminal_id = TerminalId::new();
    let mut employee = Employee::dummy_worker(200_000);
    employee.kind = EmployeeKind::Staff;
    let card = Card::dummy_active("DEMO-2", employee.id);
    let now = tuesday_2025_03_04();
    let (store, tokens, session) = passed_session_setup(&employee, &card, terminal_id, now).await;

    let authorizer = PaymentAuthorizer::new(store, tokens.clone(), CalendarOracle::default(), CanteenConfig::test_default(), NoopNotificationSink);
    let token = tokens.issue(employee.id, session.id, terminal_id, now, 60).unwrap();

    let outcome = authorizer
        .pay(&card.uid, Cents::new(8_000), &token, terminal_id, now)
        .await
        .unwrap();

    assert_eq!(outcome.subsidy_spent_cents, Cents::ZERO);
    assert_eq!(outcome.monthly_spent_cents, Cents::new(8_000));
    assert_eq!(outcome.subsidy_today_left_cents, Cents::ZERO);
}

#[tokio::test]
async fn s3_worker_on_company_holiday_gets_no_subsidy() {
    let terminal_id = TerminalId::new();
    let employee = Employee::dummy_worker(200_000);
    let card = Card::dummy_active("DEMO-3", employee.id);
    let new_years = Utc.from_utc_datetime(&NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap());
    let (store, tokens, session) = passed_session_setup(&employee, &card, terminal_id, new_years).await;

    let calendar = CalendarOracle::new(vec![new_years.date_naive()], vec![]);
    let authorizer = PaymentAuthorizer::new(store, tokens.clone(), calendar, CanteenConfig::test_default(), NoopNotificationSink);
    let token = tokens.issue(employee.id, session.id, terminal_id, new_years, 60).unwrap();

    let outcome = authorizer
        .pay(&card.uid, Cents::new(8_000), &token, terminal_id, new_years)
        .await
        .unwrap();

    assert_eq!(outcome.subsidy_spent_cents, Cents::ZERO);
    assert_eq!(outcome.monthly_spent_cents, Cents::new(8_000));
}

#[tokio::test]
async fn s4_token_replay_rejected_without_new_transaction() {
    let terminal_id = TerminalId::new();
    let employee = Employee::dummy_worker(200_000);
    let card = Card::dummy_active("DEMO-4", employee.id);
    let now = tuesday_2025_03_04();
    let (store, tokens, session) = passed_session_setup(&employee, &card, terminal_id, now).await;

    let authorizer = PaymentAuthorizer::new(store.clone(), tokens.clone(), CalendarOracle::default(), CanteenConfig::test_default(), NoopNotificationSink);
    let token = tokens.issue(employee.id, session.id, terminal_id, now, 60).unwrap();

    authorizer.pay(&card.uid, Cents::new(15_000), &token, terminal_id, now).await.unwrap();

    let before = authorizer.store.transactions_for_session(session.id).await.unwrap().len();
    let err = authorizer
        .pay(&card.uid, Cents::new(15_000), &token, terminal_id, now)
        .await
        .unwrap_err();
    let after = authorizer.store.transactions_for_session(session.id).await.unwrap().len();

    assert_eq!(err.code(), "LIVENESS_ALREADY_USED");
    assert_eq!(before, after);
}

#[tokio::test]
async fn s5_amount_above_receipt_limit_declined_session_stays_passed() {
    let terminal_id = TerminalId::new();
    let employee = Employee::dummy_worker(200_000);
    let card = Card::dummy_active("DEMO-5", employee.id);
    let now = tuesday_2025_03_04();
    let (store, tokens, session) = passed_session_setup(&employee, &card, terminal_id, now).await;

    let authorizer = PaymentAuthorizer::new(store.clone(), tokens.clone(), CalendarOracle::default(), CanteenConfig::test_default(), NoopNotificationSink);
    let token = tokens.issue(employee.id, session.id, terminal_id, now, 60).unwrap();

    let err = authorizer
        .pay(&card.uid, Cents::new(60_000), &token, terminal_id, now)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "MAX_RECEIPT_500_EXCEEDED");

    let reloaded = authorizer.store.get_liveness_session(session.id).await.unwrap();
    assert_eq!(reloaded.status, LivenessStatus::Passed);
    assert!(authorizer.store.transactions_for_session(session.id).await.unwrap().is_empty());
}
