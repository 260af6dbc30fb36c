//! Company-specific evidence collection practices.
//!
//! The practices document is a YAML map keyed by control ID:
//!
//! ```yaml
//! AC-2:
//!   practice: Quarterly access reviews exported from the identity provider
//!   responsible_team: Identity & Access
//!   artifacts:
//!     - Access review export
//!   review_frequency: Quarterly
//!   notes: Reviews are tracked as tickets
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use super::EvidenceError;
use crate::models::{canonical_id, EvidencePractice};

const BUNDLED_PRACTICES: &str = include_str!("../../data/evidence_practices.yaml");

/// Read-only company practices keyed by control ID
#[derive(Debug, Clone, Default)]
pub struct EvidencePractices {
    practices: BTreeMap<String, EvidencePractice>,
}

impl EvidencePractices {
    /// Load practices from `path` when given, otherwise the bundled document
    pub fn load(path: Option<&Path>) -> Result<Self, EvidenceError> {
        match path {
            Some(path) => {
                tracing::info!("Loading evidence practices from {}", path.display());
                let data = std::fs::read(path)?;
                Self::from_yaml(&data)
            }
            None => Self::bundled(),
        }
    }

    /// Load the practices shipped with the crate
    pub fn bundled() -> Result<Self, EvidenceError> {
        Self::from_yaml(BUNDLED_PRACTICES.as_bytes())
    }

    /// Parse a YAML map of `control ID -> practice`
    pub fn from_yaml(data: &[u8]) -> Result<Self, EvidenceError> {
        let raw: BTreeMap<String, EvidencePractice> = serde_yaml::from_slice(data)?;

        let practices = raw
            .into_iter()
            .map(|(id, mut practice)| {
                let id = canonical_id(&id);
                practice.control_id = id.clone();
                (id, practice)
            })
            .collect();

        Ok(Self { practices })
    }

    /// Practice for a control (case-insensitive)
    pub fn get(&self, control_id: &str) -> Result<&EvidencePractice, EvidenceError> {
        self.practices
            .get(&canonical_id(control_id))
            .ok_or_else(|| EvidenceError::PracticeNotFound(control_id.to_string()))
    }

    /// Practices mentioning `query` anywhere, ordered by control ID
    pub fn search(&self, query: &str) -> Vec<&EvidencePractice> {
        let needle = query.to_lowercase();
        self.practices
            .values()
            .filter(|p| p.matches(&needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.practices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.practices.is_empty()
    }
}
