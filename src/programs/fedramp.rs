//! Bundled FedRAMP Rev 5 baselines.

use std::sync::Arc;

use super::{CatalogProgram, ProgramError, ProgramSpec};
use crate::evidence::EvidenceGuidanceStore;
use crate::models::Impact;

pub const FEDRAMP_HIGH: &str = "FedRAMP High";
pub const FEDRAMP_MODERATE: &str = "FedRAMP Moderate";

const HIGH_CATALOG: &str = include_str!("../../data/fedramp_high_catalog.yaml");
const MODERATE_CATALOG: &str = include_str!("../../data/fedramp_moderate_catalog.yaml");

/// FedRAMP High baseline
pub fn high(guidance: Arc<EvidenceGuidanceStore>) -> Result<CatalogProgram, ProgramError> {
    CatalogProgram::load(
        ProgramSpec {
            name: FEDRAMP_HIGH.to_string(),
            version: "Rev 5".to_string(),
            description: "FedRAMP High Impact Level security controls baseline".to_string(),
            impact: Impact::High,
        },
        HIGH_CATALOG.as_bytes(),
        guidance,
    )
}

/// FedRAMP Moderate baseline
pub fn moderate(guidance: Arc<EvidenceGuidanceStore>) -> Result<CatalogProgram, ProgramError> {
    CatalogProgram::load(
        ProgramSpec {
            name: FEDRAMP_MODERATE.to_string(),
            version: "Rev 5".to_string(),
            description: "FedRAMP Moderate Impact Level security controls baseline".to_string(),
            impact: Impact::Moderate,
        },
        MODERATE_CATALOG.as_bytes(),
        guidance,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::programs::ComplianceProgram;

    fn guidance() -> Arc<EvidenceGuidanceStore> {
        Arc::new(EvidenceGuidanceStore::bundled().unwrap())
    }

    #[test]
    fn test_high_baseline() {
        let program = high(guidance()).unwrap();
        assert_eq!(program.name(), FEDRAMP_HIGH);
        assert_eq!(program.version(), "Rev 5");

        let ac2 = program.get_control("ac-2").unwrap();
        assert_eq!(ac2.title, "Account Management");
        assert_eq!(ac2.impact, Impact::High);
        assert_eq!(ac2.enhancements.len(), 3);
        assert_eq!(ac2.enhancements[0].id, "AC-2.1");

        let ac1 = program.get_control("AC-1").unwrap();
        assert!(ac1.assessment_info.is_some());

        let families: Vec<String> = program
            .get_control_families()
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(families, vec!["AC", "AU", "CM", "IA", "SC"]);
    }

    #[test]
    fn test_moderate_baseline() {
        let program = moderate(guidance()).unwrap();
        assert_eq!(program.name(), FEDRAMP_MODERATE);

        let control = program.get_control("AC-2").unwrap();
        assert_eq!(control.impact, Impact::Moderate);

        // boundary protection is only in the high bundle
        assert!(program.get_control("SC-7").is_err());
        assert!(program.get_control_family("SC").is_err());
    }

    #[test]
    fn test_bundled_search() {
        let program = high(guidance()).unwrap();
        let results = program.search_controls("access");
        assert!(!results.is_empty());
        assert!(results.iter().any(|c| c.id == "AC-1"));
        for control in &results {
            assert!(control.matches("access"));
        }
    }
}
