//! # canteen-payment
//!
//! The Payment Authorizer (§4.4) and Calendar Oracle (§4.5): the split
//! computation and balance debit that the whole authorization pipeline
//! exists to protect. Also hosts the orchestration glue that ties the
//! liveness session machine and the token service to the Data Access
//! Boundary for the rest of the control flow (§2): `StartLiveness`,
//! `SubmitFrame`, `FinishLiveness`, enrollment, and the employee-info
//! read path.

pub mod authorizer;
pub mod calendar_oracle;
pub mod enrollment;
pub mod session_service;

pub use authorizer::{PaymentAuthorizer, PaymentOutcome};
pub use calendar_oracle::{AbsenceRange, CalendarOracle};
pub use enrollment::{EmployeeInfo, EnrollmentOutcome, FaceEnroller};
pub use session_service::{FinishLivenessOutcome, LivenessService, StartLivenessOutcome};
