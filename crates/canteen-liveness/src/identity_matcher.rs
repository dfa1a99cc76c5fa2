//! Face embedding comparison (§4.2).
//!
//! The matcher never decides the outcome itself — it only computes a
//! distance and compares it to the configured threshold, leaving session
//! bookkeeping (tracking the running minimum, failing the session) to the
//! Session Manager.

use canteen_types::{CanteenError, error::Result};

/// Compares face embeddings by Euclidean (L2) distance.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityMatcher {
    pub threshold: f64,
}

impl IdentityMatcher {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// L2 distance between two embeddings of equal dimensionality.
    #[must_use]
    pub fn distance(a: &[f32], b: &[f32]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| f64::from(x - y).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// Returns `Ok(distance)` if within threshold, `Err(FaceNotMatch)` otherwise.
    pub fn check(&self, frame_embedding: &[f32], template_embedding: &[f32]) -> Result<f64> {
        let distance = Self::distance(frame_embedding, template_embedding);
        if distance <= self.threshold {
            Ok(distance)
        } else {
            Err(CanteenError::FaceNotMatch {
                distance,
                threshold: self.threshold,
            })
        }
    }
}
