//! # canteen-liveness
//!
//! The liveness session state machine (§4.1), identity matching (§4.2),
//! and the injectable pose/face oracle capabilities (§9) that drive it.
//!
//! This crate owns no persistent state of its own — the [`LivenessSession`]
//! it mutates is supplied by the caller (typically loaded from and saved
//! back to `canteen-store` under a row lock). It only knows how to advance
//! one session through one frame at a time.

pub mod identity_matcher;
pub mod oracles;
pub mod session_manager;

pub use canteen_types::{LivenessCommand, LivenessSession, LivenessStatus, Pose};
pub use identity_matcher::IdentityMatcher;
pub use oracles::{DecodedFrame, FaceDetector, FaceEncoding, FrameDecoder, NotificationSink, PoseEstimator, PoseObservation};
pub use session_manager::{FrameOutcome, SessionManager, sample_commands};
