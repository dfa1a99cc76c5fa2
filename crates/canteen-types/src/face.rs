//! Biometric reference templates.

use serde::{Deserialize, Serialize};

use crate::{EmployeeId, FaceTemplateId, constants};

/// A stored face embedding used as the match reference for an employee.
///
/// Invariant: at most one active template per employee (§3) — enforced
/// by the Data Access Boundary, which atomically deactivates the previous
/// active template when a new one is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceTemplate {
    pub id: FaceTemplateId,
    pub employee_id: EmployeeId,
    pub embedding: [f32; constants::FACE_EMBEDDING_DIM],
    pub active: bool,
    pub model: String,
    pub quality_score: f32,
}

#[cfg(any(test, feature = "test-helpers"))]
impl FaceTemplate {
    /// A deterministic template useful as a fixed match target in tests.
    pub fn dummy(employee_id: EmployeeId) -> Self {
        Self {
            id: FaceTemplateId::new(),
            employee_id,
            embedding: [0.0; constants::FACE_EMBEDDING_DIM],
            active: true,
            model: "test-model".to_string(),
            quality_score: 0.95,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_template_is_active_with_expected_dimension() {
        let t = FaceTemplate::dummy(EmployeeId::new());
        assert!(t.active);
        assert_eq!(t.embedding.len(), constants::FACE_EMBEDDING_DIM);
    }
}
