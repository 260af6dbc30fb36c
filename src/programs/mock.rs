//! Mock program for testing purposes.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::{canonical_id, Control, ControlFamily, EvidenceGuidance, Impact};
use crate::programs::{ComplianceProgram, ProgramError};

/// An in-memory program whose controls are added by hand.
#[derive(Debug, Default)]
pub struct MockProgram {
    name: String,
    version: String,
    controls: Mutex<BTreeMap<String, Arc<Control>>>,
}

impl MockProgram {
    /// Create an empty mock program.
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            controls: Mutex::new(BTreeMap::new()),
        }
    }

    /// Add (or replace) a control.
    pub fn add_control(&self, id: &str, title: &str) {
        let control = Control::new(id, title, Impact::Low);
        self.controls
            .lock()
            .insert(control.id.clone(), Arc::new(control));
    }
}

impl ComplianceProgram for MockProgram {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn description(&self) -> &str {
        "Mock compliance program"
    }

    fn get_control(&self, control_id: &str) -> Result<Arc<Control>, ProgramError> {
        self.controls
            .lock()
            .get(&canonical_id(control_id))
            .cloned()
            .ok_or_else(|| ProgramError::ControlNotFound(control_id.to_string()))
    }

    fn get_control_families(&self) -> Vec<ControlFamily> {
        let mut families: BTreeMap<String, ControlFamily> = BTreeMap::new();
        for control in self.controls.lock().values() {
            families
                .entry(control.family.clone())
                .or_insert_with(|| ControlFamily::new(&control.family, &control.family))
                .controls
                .push(Arc::clone(control));
        }
        families.into_values().collect()
    }

    fn search_controls(&self, query: &str) -> Vec<Arc<Control>> {
        let needle = query.to_lowercase();
        self.controls
            .lock()
            .values()
            .filter(|c| c.matches(&needle))
            .cloned()
            .collect()
    }

    fn get_evidence_guidance(&self, control_id: &str) -> Result<EvidenceGuidance, ProgramError> {
        Err(ProgramError::GuidanceNotFound(control_id.to_string()))
    }
}
