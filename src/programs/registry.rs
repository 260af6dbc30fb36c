//! Registry for managing compliance programs.

use std::collections::HashMap;
use std::sync::Arc;

use super::{fedramp, CatalogProgram, ComplianceProgram, ProgramError};
use crate::evidence::EvidenceGuidanceStore;

/// Registry of all available compliance programs, keyed by program name
///
/// Populated at startup and read-only afterwards, so it is shared behind an
/// `Arc` without further locking.
#[derive(Debug, Clone, Default)]
pub struct ProgramRegistry {
    programs: HashMap<String, Arc<dyn ComplianceProgram>>,
}

impl ProgramRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the bundled FedRAMP baselines.
    pub fn with_defaults(guidance: Arc<EvidenceGuidanceStore>) -> Self {
        Self::from_loaded([
            fedramp::high(Arc::clone(&guidance)).map(into_dyn),
            fedramp::moderate(guidance).map(into_dyn),
        ])
    }

    /// Create a registry from program load results.
    ///
    /// A program that failed to load is logged and left out; the others are
    /// still registered.
    pub fn from_loaded<I>(loaded: I) -> Self
    where
        I: IntoIterator<Item = Result<Arc<dyn ComplianceProgram>, ProgramError>>,
    {
        let mut registry = Self::new();

        for result in loaded {
            match result {
                Ok(program) => registry.register(program),
                Err(e) => tracing::error!("Skipping program: {}", e),
            }
        }

        registry
    }

    /// Register a program. A later registration with the same name replaces
    /// the earlier one.
    pub fn register(&mut self, program: Arc<dyn ComplianceProgram>) {
        let name = program.name().to_string();
        if self.programs.insert(name.clone(), program).is_some() {
            tracing::warn!("Replacing previously registered program '{}'", name);
        }
    }

    /// Get a program by exact name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ComplianceProgram>> {
        self.programs.get(name)
    }

    /// Get a program by name, returning an error if not found
    pub fn get_required(&self, name: &str) -> Result<&Arc<dyn ComplianceProgram>, ProgramError> {
        self.get(name)
            .ok_or_else(|| ProgramError::ProgramNotFound(name.to_string()))
    }

    /// Name to program mapping of everything registered
    pub fn all(&self) -> &HashMap<String, Arc<dyn ComplianceProgram>> {
        &self.programs
    }

    /// Registered program names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.programs.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Check if a program exists
    pub fn has(&self, name: &str) -> bool {
        self.programs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

fn into_dyn(program: CatalogProgram) -> Arc<dyn ComplianceProgram> {
    Arc::new(program)
}
