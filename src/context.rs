//! Application state shared by the CLI and the MCP handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::evidence::{EvidenceError, EvidenceGuidanceStore, EvidencePractices};
use crate::programs::{ComplianceProgram, ProgramError, ProgramRegistry};

/// Everything a request handler needs, built once at startup.
///
/// Nothing in here changes after construction; handlers hold it behind an
/// `Arc` and only read.
#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub registry: ProgramRegistry,
    pub guidance: Arc<EvidenceGuidanceStore>,
    pub practices: EvidencePractices,
}

impl AppContext {
    /// Load bundled reference data and programs according to `config`
    pub fn load(config: Config) -> Result<Self, EvidenceError> {
        let guidance = Arc::new(EvidenceGuidanceStore::bundled()?);
        let practices = EvidencePractices::load(config.data.evidence_practices_path.as_deref())?;
        let registry = ProgramRegistry::with_defaults(Arc::clone(&guidance));

        tracing::info!(
            programs = registry.len(),
            guidance = guidance.len(),
            practices = practices.len(),
            "Compliance data loaded"
        );

        Ok(Self {
            config,
            registry,
            guidance,
            practices,
        })
    }

    /// Assemble a context from already-built parts
    pub fn from_parts(
        config: Config,
        registry: ProgramRegistry,
        guidance: Arc<EvidenceGuidanceStore>,
        practices: EvidencePractices,
    ) -> Self {
        Self {
            config,
            registry,
            guidance,
            practices,
        }
    }

    pub fn default_program(&self) -> &str {
        &self.config.server.default_program
    }

    /// Resolve a program by name, or the configured default when `name` is
    /// `None` or blank
    pub fn program(&self, name: Option<&str>) -> Result<&Arc<dyn ComplianceProgram>, ProgramError> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.default_program());
        self.registry.get_required(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_context() {
        let ctx = AppContext::load(Config::default()).unwrap();
        assert_eq!(ctx.registry.len(), 2);
        assert!(!ctx.guidance.is_empty());
        assert!(!ctx.practices.is_empty());
    }

    #[test]
    fn test_program_resolution() {
        let ctx = AppContext::load(Config::default()).unwrap();

        assert_eq!(ctx.program(None).unwrap().name(), "FedRAMP High");
        assert_eq!(ctx.program(Some("  ")).unwrap().name(), "FedRAMP High");
        assert_eq!(
            ctx.program(Some("FedRAMP Moderate")).unwrap().name(),
            "FedRAMP Moderate"
        );
        assert!(matches!(
            ctx.program(Some("ISO 27001")),
            Err(ProgramError::ProgramNotFound(_))
        ));
    }

    #[test]
    fn test_configured_default_program() {
        let mut config = Config::default();
        config.server.default_program = "FedRAMP Moderate".to_string();
        let ctx = AppContext::load(config).unwrap();
        assert_eq!(ctx.program(None).unwrap().name(), "FedRAMP Moderate");
    }

    #[test]
    fn test_missing_practices_file_fails() {
        let mut config = Config::default();
        config.data.evidence_practices_path = Some("/nonexistent/practices.yaml".into());
        assert!(AppContext::load(config).is_err());
    }
}
