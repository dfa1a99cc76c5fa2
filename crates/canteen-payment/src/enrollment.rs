//! Enrollment (`POST /api/enroll_face`) and the employee-info read path
//! (`GET /api/employee_info`) — §6. Both sit on the same Data Access
//! Boundary the payment and liveness legs use, but touch no balances
//! under lock: enrollment replaces a face template atomically via
//! `Store::put_face_template`, and the info path is a plain unlocked
//! snapshot.

use std::sync::Arc;

use base64::Engine;
use canteen_liveness::{FaceDetector, FrameDecoder};
use canteen_store::Store;
use canteen_types::{
    CanteenConfig, CanteenError, EmployeeId, EmployeeKind, EmployeeStatus, FaceTemplate,
    FaceTemplateId, YearMonth, error::Result, money::Cents,
};
use chrono::NaiveDate;

/// Response shape for `GET /api/employee_info` (§6).
#[derive(Debug, Clone)]
pub struct EmployeeInfo {
    pub employee_id: EmployeeId,
    pub full_name: String,
    pub employee_type: &'static str,
    pub status: &'static str,
    pub photo_base64: Option<String>,
    pub subsidy_today_left_cents: Cents,
    pub monthly_left_cents: Cents,
    pub needs_face_enrollment: bool,
}

/// Response shape for `POST /api/enroll_face` (§6).
#[derive(Debug, Clone)]
pub struct EnrollmentOutcome {
    pub employee_id: EmployeeId,
    pub face_id: FaceTemplateId,
    pub quality_score: f32,
    pub model: &'static str,
}

const ENROLL_MODEL: &str = "canteen-embed-v1";

/// Looks up `employee_info` for a card and enrolls new face templates.
pub struct FaceEnroller<S, D, F> {
    pub store: S,
    pub decoder: Arc<D>,
    pub detector: Arc<F>,
    pub config: CanteenConfig,
}

impl<S, D, F> FaceEnroller<S, D, F>
where
    S: Store,
    D: FrameDecoder,
    F: FaceDetector,
{
    #[must_use]
    pub fn new(store: S, decoder: Arc<D>, detector: Arc<F>, config: CanteenConfig) -> Self {
        Self { store, decoder, detector, config }
    }

    /// `GET /api/employee_info?card_uid=…`.
    pub async fn employee_info(&self, card_uid: &str, today: NaiveDate) -> Result<EmployeeInfo> {
        let card = self.store.get_card_by_uid(card_uid).await?;
        let employee = self.store.get_employee(card.employee_id).await?;
        let has_face = self.store.get_active_face_template(employee.id).await.is_ok();

        let daily = self.store.get_daily_subsidy_balance(employee.id, today).await?;
        let monthly = self
            .store
            .get_monthly_balance(employee.id, YearMonth::of(today), employee.monthly_limit_cents)
            .await?;
        let subsidy_today_left_cents = if employee.kind == EmployeeKind::Worker {
            Cents::new(self.config.subsidy_daily_cents).saturating_sub(daily.used_cents)
        } else {
            Cents::ZERO
        };

        Ok(EmployeeInfo {
            employee_id: employee.id,
            full_name: employee.full_name.clone(),
            employee_type: match employee.kind {
                EmployeeKind::Worker => "worker",
                EmployeeKind::Staff => "staff",
            },
            status: match employee.status {
                EmployeeStatus::Active => "active",
                EmployeeStatus::Blocked => "blocked",
                EmployeeStatus::Terminated => "terminated",
            },
            photo_base64: employee
                .photo
                .as_ref()
                .map(|bytes| base64::engine::general_purpose::STANDARD.encode(bytes)),
            subsidy_today_left_cents,
            monthly_left_cents: monthly.available(),
            needs_face_enrollment: !has_face,
        })
    }

    /// `POST /api/enroll_face`: decodes and encodes each submitted image
    /// in order, taking the first one that yields a single detected face
    /// (§9: quality scoring beyond "one clear face per frame" is a
    /// non-goal — `quality_score` reports only the accepted fraction).
    /// Deactivates the employee's previous template atomically (§3).
    pub async fn enroll(&self, employee_id: EmployeeId, images: Vec<Vec<u8>>) -> Result<EnrollmentOutcome> {
        if images.is_empty() || images.len() > 10 {
            return Err(CanteenError::BadRequest {
                reason: "images must contain between 1 and 10 entries".to_string(),
            });
        }

        let mut accepted = 0usize;
        let mut last_err = CanteenError::FaceNotFound;
        let mut embedding = None;
        for image in &images {
            let frame = match self.decoder.decode(image).await {
                Ok(frame) => frame,
                Err(e) => {
                    last_err = e;
                    continue;
                }
            };
            match self.detector.detect_and_encode(&frame).await {
                Ok(encoding) => {
                    accepted += 1;
                    if embedding.is_none() {
                        embedding = Some(encoding.embedding);
                    }
                }
                Err(e) => last_err = e,
            }
        }

        let embedding = embedding.ok_or(last_err)?;
        let template = FaceTemplate {
            id: FaceTemplateId::new(),
            employee_id,
            embedding,
            active: true,
            model: ENROLL_MODEL.to_string(),
            quality_score: accepted as f32 / images.len() as f32,
        };
        let outcome = EnrollmentOutcome {
            employee_id,
            face_id: template.id,
            quality_score: template.quality_score,
            model: ENROLL_MODEL,
        };
        self.store.put_face_template(template).await?;
        Ok(outcome)
    }
}
