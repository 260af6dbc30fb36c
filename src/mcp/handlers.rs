//! Tool handlers backed by the shared [`AppContext`].

use std::sync::Arc;

use serde_json::Value;

use super::format;
use super::tools::ToolHandler;
use crate::context::AppContext;

/// Fetch a required, non-blank string argument
fn required_str<'a>(args: &'a Value, key: &str, label: &str) -> Result<&'a str, String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("{} is required", label))
}

fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}

/// Handler listing every registered program
#[derive(Debug)]
pub struct ListProgramsHandler {
    pub ctx: Arc<AppContext>,
}

#[async_trait::async_trait]
impl ToolHandler for ListProgramsHandler {
    async fn execute(&self, _args: Value) -> Result<String, String> {
        let programs: Vec<_> = self
            .ctx
            .registry
            .names()
            .into_iter()
            .filter_map(|name| self.ctx.registry.get(name))
            .map(|p| p.info())
            .collect();

        Ok(format::format_program_list(&programs))
    }
}

/// Handler for detailed control information
#[derive(Debug)]
pub struct GetControlInfoHandler {
    pub ctx: Arc<AppContext>,
}

#[async_trait::async_trait]
impl ToolHandler for GetControlInfoHandler {
    async fn execute(&self, args: Value) -> Result<String, String> {
        let control_id = required_str(&args, "controlId", "Control ID")?;
        let program = self
            .ctx
            .program(optional_str(&args, "program"))
            .map_err(|e| e.to_string())?;

        let control = program
            .get_control(control_id)
            .map_err(|e| format!("Failed to get control: {}", e))?;

        Ok(format::format_control(&control))
    }
}

/// Handler for one control family
#[derive(Debug)]
pub struct GetControlFamilyHandler {
    pub ctx: Arc<AppContext>,
}

#[async_trait::async_trait]
impl ToolHandler for GetControlFamilyHandler {
    async fn execute(&self, args: Value) -> Result<String, String> {
        let family_id = required_str(&args, "familyId", "Family ID")?;
        let program = self
            .ctx
            .program(optional_str(&args, "program"))
            .map_err(|e| e.to_string())?;

        let family = program
            .get_control_family(family_id)
            .map_err(|e| e.to_string())?;

        Ok(format::format_family(&family))
    }
}

/// Handler listing the families of a program
#[derive(Debug)]
pub struct ListControlFamiliesHandler {
    pub ctx: Arc<AppContext>,
}

#[async_trait::async_trait]
impl ToolHandler for ListControlFamiliesHandler {
    async fn execute(&self, args: Value) -> Result<String, String> {
        let program = self
            .ctx
            .program(optional_str(&args, "program"))
            .map_err(|e| e.to_string())?;

        let families = program.get_control_families();
        Ok(format::format_family_list(
            program.name(),
            &families,
        ))
    }
}

/// Handler for keyword search over a program's controls
#[derive(Debug)]
pub struct SearchControlsHandler {
    pub ctx: Arc<AppContext>,
}

#[async_trait::async_trait]
impl ToolHandler for SearchControlsHandler {
    async fn execute(&self, args: Value) -> Result<String, String> {
        let query = required_str(&args, "query", "Search query")?;
        let program = self
            .ctx
            .program(optional_str(&args, "program"))
            .map_err(|e| e.to_string())?;

        let results = program.search_controls(query);
        tracing::debug!(program = program.name(), query, hits = results.len(), "search_controls");

        Ok(format::format_search_results(
            program.name(),
            query,
            &results,
        ))
    }
}

/// Handler for program evidence guidance
#[derive(Debug)]
pub struct GetEvidenceGuidanceHandler {
    pub ctx: Arc<AppContext>,
}

#[async_trait::async_trait]
impl ToolHandler for GetEvidenceGuidanceHandler {
    async fn execute(&self, args: Value) -> Result<String, String> {
        let control_id = required_str(&args, "controlId", "Control ID")?;
        let program = self
            .ctx
            .program(optional_str(&args, "program"))
            .map_err(|e| e.to_string())?;

        let guidance = program
            .get_evidence_guidance(control_id)
            .map_err(|e| e.to_string())?;

        Ok(format::format_guidance(&guidance))
    }
}

/// Handler for searching evidence guidance
#[derive(Debug)]
pub struct SearchEvidenceGuidanceHandler {
    pub ctx: Arc<AppContext>,
}

#[async_trait::async_trait]
impl ToolHandler for SearchEvidenceGuidanceHandler {
    async fn execute(&self, args: Value) -> Result<String, String> {
        let query = required_str(&args, "query", "Search query")?;
        let results = self.ctx.guidance.search(query);
        Ok(format::format_guidance_search(query, &results))
    }
}

/// Handler for company practices, falling back to program guidance
#[derive(Debug)]
pub struct GetCompanyEvidencePracticeHandler {
    pub ctx: Arc<AppContext>,
}

#[async_trait::async_trait]
impl ToolHandler for GetCompanyEvidencePracticeHandler {
    async fn execute(&self, args: Value) -> Result<String, String> {
        let control_id = required_str(&args, "controlId", "Control ID")?;

        if let Ok(practice) = self.ctx.practices.get(control_id) {
            return Ok(format::format_practice(practice));
        }

        tracing::debug!("No company practice for {}, using program guidance", control_id);

        let program = self
            .ctx
            .program(optional_str(&args, "program"))
            .map_err(|_| format!("No company evidence practice found for control: {}", control_id))?;

        let guidance = program
            .get_evidence_guidance(control_id)
            .map_err(|_| format!("No evidence guidance found for control: {}", control_id))?;

        Ok(format::format_general_guidance(
            control_id, &guidance,
        ))
    }
}

/// Handler for searching company practices
#[derive(Debug)]
pub struct SearchCompanyEvidencePracticesHandler {
    pub ctx: Arc<AppContext>,
}

#[async_trait::async_trait]
impl ToolHandler for SearchCompanyEvidencePracticesHandler {
    async fn execute(&self, args: Value) -> Result<String, String> {
        let query = required_str(&args, "query", "Search query")?;
        let results = self.ctx.practices.search(query);
        Ok(format::format_practice_search(query, &results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    fn ctx() -> Arc<AppContext> {
        Arc::new(AppContext::load(Config::default()).unwrap())
    }

    #[tokio::test]
    async fn test_get_control_info_defaults_to_high() {
        let handler = GetControlInfoHandler { ctx: ctx() };
        let out = handler.execute(json!({"controlId": "ac-2"})).await.unwrap();
        assert!(out.starts_with("Control Information: AC-2 - Account Management"));
        assert!(out.contains("Impact: High"));
    }

    #[tokio::test]
    async fn test_get_control_info_other_program() {
        let handler = GetControlInfoHandler { ctx: ctx() };
        let out = handler
            .execute(json!({"controlId": "AC-2", "program": "FedRAMP Moderate"}))
            .await
            .unwrap();
        assert!(out.contains("Impact: Moderate"));
    }

    #[tokio::test]
    async fn test_get_control_info_errors() {
        let handler = GetControlInfoHandler { ctx: ctx() };

        let err = handler.execute(json!({})).await.unwrap_err();
        assert_eq!(err, "Control ID is required");

        let err = handler
            .execute(json!({"controlId": "ZZ-99"}))
            .await
            .unwrap_err();
        assert!(err.contains("control not found: ZZ-99"));

        let err = handler
            .execute(json!({"controlId": "AC-1", "program": "fedramp high"}))
            .await
            .unwrap_err();
        assert!(err.contains("compliance program not found"));
    }

    #[tokio::test]
    async fn test_family_tools() {
        let ctx = ctx();

        let handler = GetControlFamilyHandler { ctx: ctx.clone() };
        let out = handler.execute(json!({"familyId": "ia"})).await.unwrap();
        assert!(out.starts_with("Control Family: IA - Identification and Authentication"));

        let handler = ListControlFamiliesHandler { ctx };
        let out = handler.execute(json!({})).await.unwrap();
        assert!(out.starts_with("Control Families in FedRAMP High (5):"));
    }

    #[tokio::test]
    async fn test_search_controls() {
        let handler = SearchControlsHandler { ctx: ctx() };
        let out = handler.execute(json!({"query": "access"})).await.unwrap();
        assert!(out.contains("- AC-1:"));

        let err = handler.execute(json!({"query": "  "})).await.unwrap_err();
        assert_eq!(err, "Search query is required");
    }

    #[tokio::test]
    async fn test_company_practice_falls_back_to_guidance() {
        let handler = GetCompanyEvidencePracticeHandler { ctx: ctx() };

        let out = handler.execute(json!({"controlId": "AC-2"})).await.unwrap();
        assert!(out.starts_with("Company Evidence Practice for AC-2"));

        // AU-1 has program guidance but no company practice
        let out = handler.execute(json!({"controlId": "AU-1"})).await.unwrap();
        assert!(out.starts_with("No company-specific evidence practice found for AU-1."));

        let err = handler
            .execute(json!({"controlId": "SC-28"}))
            .await
            .unwrap_err();
        assert_eq!(err, "No evidence guidance found for control: SC-28");
    }

    #[tokio::test]
    async fn test_search_tools() {
        let ctx = ctx();

        let handler = SearchEvidenceGuidanceHandler { ctx: ctx.clone() };
        let out = handler.execute(json!({"query": "mfa"})).await.unwrap();
        assert!(out.contains("- IA-2:"));

        let handler = SearchCompanyEvidencePracticesHandler { ctx };
        let out = handler.execute(json!({"query": "zzzz-nothing"})).await.unwrap();
        assert!(out.contains("No company evidence practices found"));
    }

    #[tokio::test]
    async fn test_list_programs() {
        let handler = ListProgramsHandler { ctx: ctx() };
        let out = handler.execute(json!({})).await.unwrap();
        assert!(out.starts_with("Available Compliance Programs (2):"));
        assert!(out.contains("- FedRAMP High (Rev 5):"));
    }
}
