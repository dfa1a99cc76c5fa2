//! End-to-end control flow (§2): `StartLiveness` → `SubmitFrame` →
//! `FinishLiveness` → `Pay`, plus enrollment and the employee-info read
//! path, all against `MemStore` and the deterministic oracle stubs.

use std::sync::Arc;

use canteen_liveness::oracles::stub::{FrameFixture, NoopNotificationSink, StubFaceDetector, StubFrameDecoder, StubPoseEstimator};
use canteen_payment::{CalendarOracle, FaceEnroller, LivenessService, PaymentAuthorizer};
use canteen_store::MemStore;
use canteen_token::TokenService;
use canteen_types::{Card, CanteenConfig, Employee, Pose, money::Cents};
use chrono::{NaiveDate, TimeZone, Utc};

fn tuesday_2025_03_04() -> chrono::DateTime<Utc> {
    Utc.from_utc_datetime(&NaiveDate::from_ymd_opt(2025, 3, 4).unwrap().and_hms_opt(12, 0, 0).unwrap())
}

fn liveness_service(store: MemStore) -> LivenessService<MemStore, StubFrameDecoder, StubFaceDetector, StubPoseEstimator> {
    LivenessService::new(
        store,
        Arc::new(StubFrameDecoder),
        Arc::new(StubFaceDetector),
        Arc::new(StubPoseEstimator),
        CanteenConfig::test_default(),
    )
}

#[tokio::test]
async fn full_flow_start_submit_finish_pay() {
    let store = MemStore::new();
    let employee = Employee::dummy_worker(200_000);
    let card = Card::dummy_active("DEMO-1", employee.id);
    let terminal_id = canteen_types::TerminalId::new();
    store.seed_employee(employee.clone());
    store.seed_card(card.clone());
    store.seed_face_template(canteen_types::FaceTemplate {
        embedding: [0.0; canteen_types::constants::FACE_EMBEDDING_DIM],
        ..canteen_types::FaceTemplate::dummy(employee.id)
    });

    let now = tuesday_2025_03_04();
    let liveness = liveness_service(store.clone());

    let mut rng = rand::rngs::mock::StepRng::new(0, 1);
    let started = liveness.start_liveness(&mut rng, &card.uid, terminal_id, now).await.unwrap();
    assert!(started.commands.len() == 2 || started.commands.len() == 3);

    // Drive whatever commands were sampled to completion: turn far enough
    // in both directions and tilt far enough either way, then blink.
    let base_pose = Pose { yaw: 0.0, pitch: 0.0, roll: 0.0 };
    liveness
        .submit_frame(
            started.session_id,
            FrameFixture { embedding: [0.0; canteen_types::constants::FACE_EMBEDDING_DIM], pose: base_pose, blink: false }
                .to_bytes()
                .as_slice(),
            now,
        )
        .await
        .unwrap();

    for _ in 0..started.commands.len() {
        let session = store.get_liveness_session(started.session_id).await.unwrap();
        if session.status != canteen_types::LivenessStatus::InProgress {
            break;
        }
        let anchor = session.anchor_pose.unwrap();
        let command = session.commands[session.current_index];
        let pose = match command {
            canteen_types::LivenessCommand::TurnLeft => Pose { yaw: anchor.yaw - 20.0, pitch: 0.0, roll: anchor.roll },
            canteen_types::LivenessCommand::TurnRight => Pose { yaw: anchor.yaw + 20.0, pitch: 0.0, roll: anchor.roll },
            canteen_types::LivenessCommand::Tilt => Pose { yaw: anchor.yaw, pitch: 0.0, roll: anchor.roll + 15.0 },
        };
        liveness
            .submit_frame(
                started.session_id,
                FrameFixture { embedding: [0.0; canteen_types::constants::FACE_EMBEDDING_DIM], pose, blink: true }
                    .to_bytes()
                    .as_slice(),
                now,
            )
            .await
            .unwrap();
    }

    let session = store.get_liveness_session(started.session_id).await.unwrap();
    assert_eq!(session.status, canteen_types::LivenessStatus::Passed);

    let finished = liveness.finish_liveness(started.session_id, terminal_id, now).await.unwrap();
    assert_eq!(finished.result, "PASSED");
    let token = finished.liveness_token.unwrap();

    let authorizer = PaymentAuthorizer::new(
        store.clone(),
        TokenService::new(b"test-secret".to_vec()),
        CalendarOracle::default(),
        CanteenConfig::test_default(),
        NoopNotificationSink,
    );
    let outcome = authorizer.pay(&card.uid, Cents::new(15_000), &token, terminal_id, now).await.unwrap();
    assert_eq!(outcome.status, canteen_types::TransactionStatus::Approved);
    assert_eq!(outcome.subsidy_spent_cents, Cents::new(10_000));
}

#[tokio::test]
async fn start_liveness_without_enrollment_fails() {
    let store = MemStore::new();
    let employee = Employee::dummy_worker(200_000);
    let card = Card::dummy_active("DEMO-2", employee.id);
    store.seed_employee(employee.clone());
    store.seed_card(card.clone());

    let liveness = liveness_service(store);
    let mut rng = rand::rngs::mock::StepRng::new(0, 1);
    let err = liveness
        .start_liveness(&mut rng, &card.uid, canteen_types::TerminalId::new(), tuesday_2025_03_04())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NO_ACTIVE_FACE");
}

#[tokio::test]
async fn finish_liveness_on_failed_session_reports_reason_code() {
    let store = MemStore::new();
    let employee = Employee::dummy_worker(200_000);
    let terminal_id = canteen_types::TerminalId::new();
    store.seed_employee(employee.clone());

    let mut session = canteen_types::LivenessSession::new(
        employee.id,
        terminal_id,
        vec![canteen_types::LivenessCommand::Tilt],
        tuesday_2025_03_04(),
        chrono::Duration::seconds(25),
    );
    session.mark_failed(canteen_types::FailReasonCode::BlinkNotDetected).unwrap();
    store.insert_liveness_session(session.clone()).await.unwrap();

    let liveness = liveness_service(store);
    let finished = liveness.finish_liveness(session.id, terminal_id, tuesday_2025_03_04()).await.unwrap();
    assert_eq!(finished.result, "FAILED");
    assert_eq!(finished.reason_code, Some("BLINK_NOT_DETECTED"));
    assert!(finished.liveness_token.is_none());
}

#[tokio::test]
async fn enroll_then_employee_info_reports_no_enrollment_needed() {
    let store = MemStore::new();
    let employee = Employee::dummy_worker(200_000);
    let card = Card::dummy_active("DEMO-3", employee.id);
    store.seed_employee(employee.clone());
    store.seed_card(card.clone());

    let enroller = FaceEnroller::new(store.clone(), Arc::new(StubFrameDecoder), Arc::new(StubFaceDetector), CanteenConfig::test_default());

    let today = tuesday_2025_03_04().date_naive();
    let before = enroller.employee_info(&card.uid, today).await.unwrap();
    assert!(before.needs_face_enrollment);

    let fixture = FrameFixture {
        embedding: [0.2; canteen_types::constants::FACE_EMBEDDING_DIM],
        pose: Pose { yaw: 0.0, pitch: 0.0, roll: 0.0 },
        blink: false,
    };
    let outcome = enroller.enroll(employee.id, vec![fixture.to_bytes()]).await.unwrap();
    assert_eq!(outcome.employee_id, employee.id);
    assert!((outcome.quality_score - 1.0).abs() < f32::EPSILON);

    let after = enroller.employee_info(&card.uid, today).await.unwrap();
    assert!(!after.needs_face_enrollment);
    assert_eq!(after.subsidy_today_left_cents, Cents::new(canteen_types::constants::SUBSIDY_DAILY_CENTS));
    assert_eq!(after.monthly_left_cents, Cents::new(200_000));
}

#[tokio::test]
async fn enroll_rejects_empty_image_list() {
    let store = MemStore::new();
    let enroller = FaceEnroller::new(store, Arc::new(StubFrameDecoder), Arc::new(StubFaceDetector), CanteenConfig::test_default());
    let err = enroller.enroll(canteen_types::EmployeeId::new(), vec![]).await.unwrap_err();
    assert_eq!(err.code(), "BAD_REQUEST");
}
