//! Evidence guidance reference data.

use std::collections::BTreeMap;

use super::EvidenceError;
use crate::models::{canonical_id, EvidenceGuidance};

const BUNDLED_GUIDANCE: &str = include_str!("../../data/evidence_guidance.yaml");

/// Read-only evidence guidance keyed by control ID
#[derive(Debug, Clone, Default)]
pub struct EvidenceGuidanceStore {
    entries: BTreeMap<String, EvidenceGuidance>,
}

impl EvidenceGuidanceStore {
    /// Load the guidance shipped with the crate
    pub fn bundled() -> Result<Self, EvidenceError> {
        Self::from_yaml(BUNDLED_GUIDANCE.as_bytes())
    }

    /// Parse a YAML map of `control ID -> guidance`
    pub fn from_yaml(data: &[u8]) -> Result<Self, EvidenceError> {
        let raw: BTreeMap<String, EvidenceGuidance> = serde_yaml::from_slice(data)?;

        let entries = raw
            .into_iter()
            .map(|(id, mut guidance)| {
                let id = canonical_id(&id);
                guidance.control_id = id.clone();
                (id, guidance)
            })
            .collect();

        Ok(Self { entries })
    }

    /// Guidance for a control (case-insensitive)
    pub fn get(&self, control_id: &str) -> Option<&EvidenceGuidance> {
        self.entries.get(&canonical_id(control_id))
    }

    /// Entries whose ID, description, evidence types or collection steps
    /// contain `query`, ordered by control ID
    pub fn search(&self, query: &str) -> Vec<&EvidenceGuidance> {
        let needle = query.to_lowercase();
        self.entries
            .values()
            .filter(|g| g.matches(&needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_guidance_loads() {
        let store = EvidenceGuidanceStore::bundled().unwrap();
        assert!(!store.is_empty());

        let ac1 = store.get("ac-1").unwrap();
        assert_eq!(ac1.control_id, "AC-1");
        assert!(ac1
            .description
            .contains("Access Control Policy and Procedures"));
        assert_eq!(ac1.evidence_types.len(), 4);
        assert_eq!(ac1.common_pitfalls.len(), 4);
    }

    #[test]
    fn test_search_guidance() {
        let store = EvidenceGuidanceStore::bundled().unwrap();

        let results = store.search("MFA");
        assert!(results.iter().any(|g| g.control_id == "IA-2"));
        assert!(results.iter().all(|g| g.matches("mfa")));

        let ids: Vec<&str> = store
            .search("policy")
            .iter()
            .map(|g| g.control_id.as_str())
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);

        assert!(store.search("no-such-evidence-keyword").is_empty());
    }

    #[test]
    fn test_from_yaml_normalizes_keys() {
        let yaml = r#"
sc-7:
  description: Boundary protection evidence
  evidenceTypes: [Network diagrams]
"#;
        let store = EvidenceGuidanceStore::from_yaml(yaml.as_bytes()).unwrap();
        let guidance = store.get("SC-7").unwrap();
        assert_eq!(guidance.control_id, "SC-7");
        assert_eq!(guidance.evidence_types, vec!["Network diagrams"]);
        assert!(guidance.collection_steps.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_from_yaml_rejects_garbage() {
        assert!(EvidenceGuidanceStore::from_yaml(b"- just\n- a list\n").is_err());
    }
}
