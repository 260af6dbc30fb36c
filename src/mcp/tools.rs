//! Tool registry for MCP tools.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};

use super::handlers::{
    GetCompanyEvidencePracticeHandler, GetControlFamilyHandler, GetControlInfoHandler,
    GetEvidenceGuidanceHandler, ListControlFamiliesHandler, ListProgramsHandler,
    SearchCompanyEvidencePracticesHandler, SearchControlsHandler, SearchEvidenceGuidanceHandler,
};
use crate::context::AppContext;

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "get_control_info")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<String, String>;
}

/// Registry for all MCP tools
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create a tool registry with every compliance tool bound to `ctx`
    pub fn from_context(ctx: &Arc<AppContext>) -> Self {
        let mut registry = Self::default();
        registry.register_compliance_tools(ctx);
        registry
    }

    fn register_compliance_tools(&mut self, ctx: &Arc<AppContext>) {
        let program_property = json!({
            "type": "string",
            "description": format!(
                "The compliance program (default: {}). Available: {}",
                ctx.default_program(),
                ctx.registry.names().join(", ")
            )
        });

        self.register(Tool {
            name: "list_programs".to_string(),
            description: "List the available compliance programs".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
            handler: Arc::new(ListProgramsHandler { ctx: ctx.clone() }),
        });

        self.register(Tool {
            name: "get_control_info".to_string(),
            description: "Get detailed information about a specific security control".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "controlId": {
                        "type": "string",
                        "description": "The ID of the security control (e.g., AC-1, IA-2)"
                    },
                    "program": program_property
                },
                "required": ["controlId"]
            }),
            handler: Arc::new(GetControlInfoHandler { ctx: ctx.clone() }),
        });

        self.register(Tool {
            name: "get_control_family".to_string(),
            description: "Get information about a control family and its controls".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "familyId": {
                        "type": "string",
                        "description": "The ID of the control family (e.g., AC, IA)"
                    },
                    "program": program_property
                },
                "required": ["familyId"]
            }),
            handler: Arc::new(GetControlFamilyHandler { ctx: ctx.clone() }),
        });

        self.register(Tool {
            name: "list_control_families".to_string(),
            description: "List all control families in a program".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "program": program_property
                }
            }),
            handler: Arc::new(ListControlFamiliesHandler { ctx: ctx.clone() }),
        });

        self.register(Tool {
            name: "search_controls".to_string(),
            description: "Search for controls by keyword. Single keywords use the index; \
                          other queries match any control containing the text."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query (e.g., 'access', 'audit')"
                    },
                    "program": program_property
                },
                "required": ["query"]
            }),
            handler: Arc::new(SearchControlsHandler { ctx: ctx.clone() }),
        });

        self.register(Tool {
            name: "get_evidence_guidance".to_string(),
            description: "Get guidance on collecting evidence for a specific security control"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "controlId": {
                        "type": "string",
                        "description": "The ID of the security control (e.g., AC-1, IA-2)"
                    },
                    "program": program_property
                },
                "required": ["controlId"]
            }),
            handler: Arc::new(GetEvidenceGuidanceHandler { ctx: ctx.clone() }),
        });

        self.register(Tool {
            name: "search_evidence_guidance".to_string(),
            description: "Search for evidence guidance by keyword".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query (e.g., 'policy', 'authentication')"
                    }
                },
                "required": ["query"]
            }),
            handler: Arc::new(SearchEvidenceGuidanceHandler { ctx: ctx.clone() }),
        });

        self.register(Tool {
            name: "get_company_evidence_practice".to_string(),
            description: "Get company-specific evidence collection practices for a control, \
                          or general guidance when the company has none"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "controlId": {
                        "type": "string",
                        "description": "The ID of the security control (e.g., AC-1, IA-2)"
                    },
                    "program": program_property
                },
                "required": ["controlId"]
            }),
            handler: Arc::new(GetCompanyEvidencePracticeHandler { ctx: ctx.clone() }),
        });

        self.register(Tool {
            name: "search_company_evidence_practices".to_string(),
            description: "Search for company-specific evidence collection practices by keyword"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query (e.g., 'policy', 'authentication', 'quarterly')"
                    }
                },
                "required": ["query"]
            }),
            handler: Arc::new(SearchCompanyEvidencePracticesHandler { ctx: ctx.clone() }),
        });
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get all tools
    pub fn all(&self) -> Vec<&Tool> {
        self.tools.values().collect()
    }

    /// Tool names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Execute a tool by name, returning its formatted text
    pub async fn execute(&self, name: &str, args: Value) -> Result<String, String> {
        let tool = self
            .get(name)
            .ok_or_else(|| format!("Tool '{}' not found", name))?;

        tool.handler.execute(args).await
    }
}
