//! Injectable capabilities for everything this crate consumes but does not
//! implement: frame decoding, face detection/encoding, pose/blink
//! estimation, and best-effort cashier notification.
//!
//! Decoding JPEG bytes, running a face-detection model, and estimating
//! head pose from landmarks are out of scope for this workspace (§1, §6) —
//! the real implementations live behind whatever process wires this crate
//! up. Modeling them as traits rather than a concrete call lets the
//! Session Manager's frame-processing logic (and the seed scenarios of
//! §8) be exercised deterministically without a camera or a model.

use async_trait::async_trait;
use canteen_types::{Pose, error::Result};

/// An opaque decoded frame. Its contents mean nothing to this crate;
/// only [`FaceDetector`] and [`PoseEstimator`] implementations interpret it.
#[derive(Debug, Clone)]
pub struct DecodedFrame(pub Vec<u8>);

/// A 128-float face embedding extracted from a single detected face.
#[derive(Debug, Clone)]
pub struct FaceEncoding {
    pub embedding: [f32; canteen_types::constants::FACE_EMBEDDING_DIM],
}

/// Head pose and blink state observed in a single frame.
#[derive(Debug, Clone, Copy)]
pub struct PoseObservation {
    pub pose: Pose,
    pub blink: bool,
}

/// Turns raw frame bytes into a [`DecodedFrame`]. Surfaces `BadImage` if
/// the bytes are not a decodable image.
#[async_trait]
pub trait FrameDecoder: Send + Sync {
    async fn decode(&self, bytes: &[u8]) -> Result<DecodedFrame>;
}

/// Detects the single face in a frame and returns its embedding.
///
/// Implementations surface `FaceNotFound`, `MultipleFaces`, `FaceTooSmall`,
/// `LowLight`, or `Blurry` as typed errors — these are non-fatal to the
/// session (§4.1: the frame is rejected without advancing or failing it).
#[async_trait]
pub trait FaceDetector: Send + Sync {
    async fn detect_and_encode(&self, frame: &DecodedFrame) -> Result<FaceEncoding>;
}

/// Estimates head pose and blink state from a decoded frame.
#[async_trait]
pub trait PoseEstimator: Send + Sync {
    async fn estimate_pose_and_blink(&self, frame: &DecodedFrame) -> Result<PoseObservation>;
}

/// Best-effort, fire-and-forget cashier notification (§5, §6). Failures
/// are swallowed by the implementation itself — callers never see them
/// and the authorization result is never affected.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, channel_id: &str, text: &str);
}

/// Production-adjacent default: logs instead of calling out to Telegram,
/// since the real HTTP notification call is an external collaborator
/// this workspace does not implement (§1, §6).
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotificationSink;

#[async_trait]
impl NotificationSink for LoggingNotificationSink {
    async fn notify(&self, channel_id: &str, text: &str) {
        tracing::info!(channel_id, text, "notification (logging sink, no transport configured)");
    }
}

/// Deterministic stub implementations for tests, gated behind
/// `test-helpers` per §10.4/§10.5.
#[cfg(any(test, feature = "test-helpers"))]
pub mod stub {
    use super::{DecodedFrame, FaceDetector, FaceEncoding, NotificationSink, PoseEstimator, PoseObservation};
    use async_trait::async_trait;
    use canteen_types::{CanteenError, Pose, constants::FACE_EMBEDDING_DIM, error::Result};
    use serde::{Deserialize, Serialize};

    /// A fully deterministic "frame" — what a test wants the oracle to
    /// report for this frame, serialized as the frame's opaque bytes.
    #[derive(Debug, Clone, Copy, Serialize, Deserialize)]
    pub struct FrameFixture {
        pub embedding: [f32; FACE_EMBEDDING_DIM],
        pub pose: Pose,
        pub blink: bool,
    }

    impl FrameFixture {
        #[must_use]
        pub fn to_bytes(self) -> Vec<u8> {
            serde_json::to_vec(&self).expect("FrameFixture always serializes")
        }
    }

    /// Decodes a [`FrameFixture`]'s bytes back into a [`DecodedFrame`]
    /// unchanged — the stub decoder never rejects anything.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct StubFrameDecoder;

    #[async_trait]
    impl super::FrameDecoder for StubFrameDecoder {
        async fn decode(&self, bytes: &[u8]) -> Result<DecodedFrame> {
            Ok(DecodedFrame(bytes.to_vec()))
        }
    }

    fn fixture_of(frame: &DecodedFrame) -> Result<FrameFixture> {
        serde_json::from_slice(&frame.0)
            .map_err(|e| CanteenError::Internal(format!("not a FrameFixture: {e}")))
    }

    /// Reports whatever embedding the test encoded into the frame fixture.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct StubFaceDetector;

    #[async_trait]
    impl FaceDetector for StubFaceDetector {
        async fn detect_and_encode(&self, frame: &DecodedFrame) -> Result<FaceEncoding> {
            Ok(FaceEncoding {
                embedding: fixture_of(frame)?.embedding,
            })
        }
    }

    /// Reports whatever pose/blink the test encoded into the frame fixture.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct StubPoseEstimator;

    #[async_trait]
    impl PoseEstimator for StubPoseEstimator {
        async fn estimate_pose_and_blink(&self, frame: &DecodedFrame) -> Result<PoseObservation> {
            let fixture = fixture_of(frame)?;
            Ok(PoseObservation {
                pose: fixture.pose,
                blink: fixture.blink,
            })
        }
    }

    /// Swallows every notification without even logging, for tests that
    /// don't want to assert on tracing output.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct NoopNotificationSink;

    #[async_trait]
    impl NotificationSink for NoopNotificationSink {
        async fn notify(&self, _channel_id: &str, _text: &str) {}
    }
}
