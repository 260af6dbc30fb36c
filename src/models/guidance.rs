//! Evidence guidance and company practice records.

use serde::{Deserialize, Serialize};

/// Static advice on how to demonstrate compliance with a control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceGuidance {
    /// Set from the document key when loaded
    #[serde(default)]
    pub control_id: String,

    pub description: String,

    #[serde(default)]
    pub evidence_types: Vec<String>,

    #[serde(default)]
    pub collection_steps: Vec<String>,

    #[serde(default)]
    pub examples: Vec<String>,

    #[serde(default)]
    pub common_pitfalls: Vec<String>,
}

impl EvidenceGuidance {
    /// Whether the ID, description, an evidence type or a collection step
    /// contains `needle` (already lowercase).
    pub fn matches(&self, needle: &str) -> bool {
        self.control_id.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .evidence_types
                .iter()
                .any(|t| t.to_lowercase().contains(needle))
            || self
                .collection_steps
                .iter()
                .any(|s| s.to_lowercase().contains(needle))
    }
}

/// How this organization actually collects evidence for a control
///
/// Practice documents use snake_case keys; JSON output is camelCase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidencePractice {
    /// Set from the document key when loaded
    #[serde(default, alias = "control_id")]
    pub control_id: String,

    pub practice: String,

    #[serde(default, alias = "responsible_team")]
    pub responsible_team: String,

    #[serde(default)]
    pub artifacts: Vec<String>,

    #[serde(default, alias = "review_frequency")]
    pub review_frequency: String,

    #[serde(default)]
    pub notes: String,
}

impl EvidencePractice {
    /// Whether any text field or artifact contains `needle` (already lowercase).
    pub fn matches(&self, needle: &str) -> bool {
        self.control_id.to_lowercase().contains(needle)
            || self.practice.to_lowercase().contains(needle)
            || self.responsible_team.to_lowercase().contains(needle)
            || self
                .artifacts
                .iter()
                .any(|a| a.to_lowercase().contains(needle))
            || self.notes.to_lowercase().contains(needle)
    }
}
