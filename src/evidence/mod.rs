//! Static evidence reference data: per-control guidance and company practices.
//!
//! Both documents are loaded once at startup and held immutably. Nothing here
//! records collected evidence.

mod guidance;
mod practices;

pub use guidance::EvidenceGuidanceStore;
pub use practices::EvidencePractices;

/// Errors that can occur when loading or querying evidence data
#[derive(Debug, thiserror::Error)]
pub enum EvidenceError {
    /// The document could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// No company practice exists for the control
    #[error("No evidence practice found for control: {0}")]
    PracticeNotFound(String),

    /// IO error (override file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for EvidenceError {
    fn from(err: serde_yaml::Error) -> Self {
        EvidenceError::Parse(format!("YAML: {}", err))
    }
}
