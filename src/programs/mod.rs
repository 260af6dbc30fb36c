//! Compliance programs with a trait-based architecture.
//!
//! This module defines the [`ComplianceProgram`] trait that every baseline
//! implements. Handlers only see programs through this trait, via the
//! [`ProgramRegistry`].
//!
//! # Bundled Programs
//!
//! - `FedRAMP High` - FedRAMP Rev 5 High baseline
//! - `FedRAMP Moderate` - FedRAMP Rev 5 Moderate baseline
//!
//! Each is a [`CatalogProgram`] built once at startup from a catalog embedded
//! in the binary; nothing mutates it afterwards.
//!
//! # Lookup Rules
//!
//! Program names are matched exactly (`"FedRAMP High"`, not `"fedramp high"`).
//! Control and family IDs are matched case-insensitively (`ac-1` == `AC-1`).

mod catalog_program;
pub mod fedramp;
pub mod mock;
mod registry;

pub use catalog_program::{CatalogProgram, ProgramSpec};
pub use mock::MockProgram;
pub use registry::ProgramRegistry;

use std::sync::Arc;

use crate::catalog::CatalogError;
use crate::models::{Control, ControlFamily, EvidenceGuidance, ProgramInfo};

/// The ComplianceProgram trait defines the query surface of one baseline.
///
/// # Implementing a New Program
///
/// 1. Create a struct that implements `ComplianceProgram` (or build a
///    [`CatalogProgram`] from a new catalog document)
/// 2. Register it with [`ProgramRegistry::register`]
///
/// All methods take `&self` and must be safe to call concurrently.
pub trait ComplianceProgram: Send + Sync + std::fmt::Debug {
    /// Unique program name (registry key, e.g. "FedRAMP High")
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    fn description(&self) -> &str;

    /// Get a control by ID (case-insensitive)
    fn get_control(&self, control_id: &str) -> Result<Arc<Control>, ProgramError>;

    /// All control families, sorted by family ID
    fn get_control_families(&self) -> Vec<ControlFamily>;

    /// Controls matching a keyword, or any control containing the query when
    /// the keyword is not indexed
    fn search_controls(&self, query: &str) -> Vec<Arc<Control>>;

    /// Evidence collection guidance for a control
    fn get_evidence_guidance(&self, control_id: &str) -> Result<EvidenceGuidance, ProgramError>;

    /// Get one family by ID (case-insensitive)
    fn get_control_family(&self, family_id: &str) -> Result<ControlFamily, ProgramError> {
        self.get_control_families()
            .into_iter()
            .find(|f| f.id.eq_ignore_ascii_case(family_id.trim()))
            .ok_or_else(|| ProgramError::FamilyNotFound(family_id.to_string()))
    }

    /// Name, version and description
    fn info(&self) -> ProgramInfo {
        ProgramInfo {
            name: self.name().to_string(),
            version: self.version().to_string(),
            description: self.description().to_string(),
        }
    }
}

/// Errors that can occur when loading or querying a program
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// The program's catalog could not be loaded; the program is unusable
    #[error("Failed to load program '{program}': {source}")]
    Load {
        program: String,
        #[source]
        source: CatalogError,
    },

    #[error("compliance program not found: {0}")]
    ProgramNotFound(String),

    #[error("control not found: {0}")]
    ControlNotFound(String),

    #[error("control family not found: {0}")]
    FamilyNotFound(String),

    #[error("evidence guidance not found for control: {0}")]
    GuidanceNotFound(String),
}
