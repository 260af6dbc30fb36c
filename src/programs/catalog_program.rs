//! A compliance program backed by a parsed catalog document.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{ComplianceProgram, ProgramError};
use crate::catalog::{parse_catalog, SearchIndex};
use crate::evidence::EvidenceGuidanceStore;
use crate::models::{Control, ControlFamily, EvidenceGuidance, Impact};

/// Static identity of a program
#[derive(Debug, Clone)]
pub struct ProgramSpec {
    pub name: String,

    /// Falls back to the catalog's `metadata.version` when empty
    pub version: String,

    pub description: String,

    /// Impact level stamped on every control of this baseline
    pub impact: Impact,
}

#[derive(Debug)]
struct ProgramData {
    /// Keyed by lowercase control ID
    controls: BTreeMap<String, Arc<Control>>,
    families: BTreeMap<String, ControlFamily>,
    index: SearchIndex,
}

/// One loaded baseline: controls, families and a keyword index.
///
/// Readers share a read lock; the only writer is [`CatalogProgram::rebuild_index`].
#[derive(Debug)]
pub struct CatalogProgram {
    name: String,
    version: String,
    description: String,
    impact: Impact,
    data: RwLock<ProgramData>,
    guidance: Arc<EvidenceGuidanceStore>,
}

impl CatalogProgram {
    /// Parse `catalog` and build the program.
    ///
    /// A malformed catalog fails the whole program; nothing partial is returned.
    pub fn load(
        spec: ProgramSpec,
        catalog: &[u8],
        guidance: Arc<EvidenceGuidanceStore>,
    ) -> Result<Self, ProgramError> {
        let parsed = parse_catalog(catalog, spec.impact).map_err(|source| ProgramError::Load {
            program: spec.name.clone(),
            source,
        })?;

        let index = SearchIndex::build(parsed.controls.values().map(|c| c.as_ref()));

        let version = if spec.version.is_empty() {
            parsed.version
        } else {
            spec.version
        };

        tracing::info!(
            program = %spec.name,
            controls = parsed.controls.len(),
            families = parsed.families.len(),
            keywords = index.len(),
            "Loaded compliance program"
        );

        Ok(Self {
            name: spec.name,
            version,
            description: spec.description,
            impact: spec.impact,
            data: RwLock::new(ProgramData {
                controls: parsed.controls,
                families: parsed.families,
                index,
            }),
            guidance,
        })
    }

    pub fn impact(&self) -> Impact {
        self.impact
    }

    /// Number of top-level controls
    pub fn control_count(&self) -> usize {
        self.data.read().controls.len()
    }

    /// Rebuild the keyword index from the current control set
    pub fn rebuild_index(&self) {
        let mut data = self.data.write();
        data.index = SearchIndex::build(data.controls.values().map(|c| c.as_ref()));
    }
}

impl ComplianceProgram for CatalogProgram {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn get_control(&self, control_id: &str) -> Result<Arc<Control>, ProgramError> {
        self.data
            .read()
            .controls
            .get(&control_id.trim().to_lowercase())
            .cloned()
            .ok_or_else(|| ProgramError::ControlNotFound(control_id.to_string()))
    }

    fn get_control_families(&self) -> Vec<ControlFamily> {
        self.data.read().families.values().cloned().collect()
    }

    /// Exact keyword hits come back in index order. Anything else falls back
    /// to a substring scan of ID, title and statement, ordered by control ID.
    fn search_controls(&self, query: &str) -> Vec<Arc<Control>> {
        let data = self.data.read();
        let needle = query.to_lowercase();

        if let Some(ids) = data.index.lookup(&needle) {
            return ids
                .iter()
                .filter_map(|id| data.controls.get(&id.to_lowercase()).cloned())
                .collect();
        }

        tracing::debug!(program = %self.name, query, "Keyword not indexed, scanning controls");
        data.controls
            .values()
            .filter(|c| c.matches(&needle))
            .cloned()
            .collect()
    }

    fn get_evidence_guidance(&self, control_id: &str) -> Result<EvidenceGuidance, ProgramError> {
        self.guidance
            .get(control_id)
            .cloned()
            .ok_or_else(|| ProgramError::GuidanceNotFound(control_id.to_string()))
    }
}
