//! Read-only JSON resources addressed by `compliance://` URIs.
//!
//! | URI | Content |
//! |---|---|
//! | `compliance://programs` | program summaries |
//! | `compliance://{program}/families` | families of a program |
//! | `compliance://{program}/controls/{id}` | one control |
//! | `compliance://{program}/search/{query}` | search results |
//!
//! Program names and queries are percent-encoded in the URI
//! (`compliance://FedRAMP%20High/families`).

use std::sync::Arc;

use serde::Serialize;

use crate::context::AppContext;

pub const SCHEME: &str = "compliance://";
pub const MIME_JSON: &str = "application/json";

/// A parsed resource address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    Programs,
    Families { program: String },
    Control { program: String, id: String },
    Search { program: String, query: String },
}

impl ResourceUri {
    pub fn parse(uri: &str) -> Result<Self, String> {
        let rest = uri
            .strip_prefix(SCHEME)
            .ok_or_else(|| format!("invalid URI format: {}", uri))?;

        let segments: Vec<&str> = rest.split('/').collect();
        match segments.as_slice() {
            ["programs"] => Ok(Self::Programs),
            [program, "families"] => Ok(Self::Families {
                program: decode(program, uri)?,
            }),
            [program, "controls", id] => Ok(Self::Control {
                program: decode(program, uri)?,
                id: decode(id, uri)?,
            }),
            [program, "search", query] => Ok(Self::Search {
                program: decode(program, uri)?,
                query: decode(query, uri)?,
            }),
            _ => Err(format!("invalid URI format: {}", uri)),
        }
    }

    /// Build the URI for a family listing
    pub fn families(program: &str) -> String {
        format!("{}{}/families", SCHEME, urlencoding::encode(program))
    }
}

fn decode(segment: &str, uri: &str) -> Result<String, String> {
    let decoded = urlencoding::decode(segment)
        .map_err(|e| format!("invalid URI encoding in {}: {}", uri, e))?;

    if decoded.trim().is_empty() {
        return Err(format!("invalid URI format: {}", uri));
    }
    Ok(decoded.into_owned())
}

/// Listing entry for a concrete resource
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

/// Resolves resource URIs against the loaded programs
#[derive(Debug, Clone)]
pub struct ResourceRouter {
    ctx: Arc<AppContext>,
}

impl ResourceRouter {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// The program list plus one family listing per program
    pub fn list(&self) -> Vec<ResourceDescriptor> {
        let mut resources = vec![ResourceDescriptor {
            uri: format!("{}programs", SCHEME),
            name: "Available Compliance Programs".to_string(),
            description: "List of all available compliance programs".to_string(),
            mime_type: MIME_JSON.to_string(),
        }];

        for name in self.ctx.registry.names() {
            resources.push(ResourceDescriptor {
                uri: ResourceUri::families(name),
                name: format!("{} Control Families", name),
                description: format!("List of all control families for {}", name),
                mime_type: MIME_JSON.to_string(),
            });
        }

        resources
    }

    /// Read a resource as pretty-printed JSON
    pub fn read(&self, uri: &str) -> Result<String, String> {
        let value = match ResourceUri::parse(uri)? {
            ResourceUri::Programs => {
                let infos: Vec<_> = self
                    .ctx
                    .registry
                    .names()
                    .into_iter()
                    .filter_map(|name| self.ctx.registry.get(name))
                    .map(|p| p.info())
                    .collect();
                serde_json::to_value(infos)
            }
            ResourceUri::Families { program } => {
                let program = self.program(&program)?;
                serde_json::to_value(program.get_control_families())
            }
            ResourceUri::Control { program, id } => {
                let program = self.program(&program)?;
                let control = program.get_control(&id).map_err(|e| e.to_string())?;
                serde_json::to_value(control.as_ref())
            }
            ResourceUri::Search { program, query } => {
                let program = self.program(&program)?;
                serde_json::to_value(program.search_controls(&query))
            }
        }
        .map_err(|e| format!("failed to serialize resource: {}", e))?;

        serde_json::to_string_pretty(&value)
            .map_err(|e| format!("failed to serialize resource: {}", e))
    }

    fn program(
        &self,
        name: &str,
    ) -> Result<&Arc<dyn crate::programs::ComplianceProgram>, String> {
        self.ctx.registry.get_required(name).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::Value;

    fn router() -> ResourceRouter {
        ResourceRouter::new(Arc::new(AppContext::load(Config::default()).unwrap()))
    }

    #[test]
    fn test_parse_uris() {
        assert_eq!(
            ResourceUri::parse("compliance://programs").unwrap(),
            ResourceUri::Programs
        );
        assert_eq!(
            ResourceUri::parse("compliance://FedRAMP%20High/controls/ac-2").unwrap(),
            ResourceUri::Control {
                program: "FedRAMP High".to_string(),
                id: "ac-2".to_string(),
            }
        );
        assert_eq!(
            ResourceUri::parse("compliance://FedRAMP%20High/search/account%20management").unwrap(),
            ResourceUri::Search {
                program: "FedRAMP High".to_string(),
                query: "account management".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for uri in [
            "http://programs",
            "compliance://",
            "compliance://FedRAMP%20High",
            "compliance://FedRAMP%20High/controls",
            "compliance://FedRAMP%20High/controls/",
            "compliance://FedRAMP%20High/unknown/x",
            "compliance://a/controls/b/c",
        ] {
            assert!(ResourceUri::parse(uri).is_err(), "{} should be rejected", uri);
        }
    }

    #[test]
    fn test_family_uri_round_trips() {
        let uri = ResourceUri::families("FedRAMP High");
        assert_eq!(uri, "compliance://FedRAMP%20High/families");
        assert_eq!(
            ResourceUri::parse(&uri).unwrap(),
            ResourceUri::Families {
                program: "FedRAMP High".to_string()
            }
        );
    }

    #[test]
    fn test_list_resources() {
        let resources = router().list();
        let uris: Vec<&str> = resources.iter().map(|r| r.uri.as_str()).collect();
        assert_eq!(
            uris,
            vec![
                "compliance://programs",
                "compliance://FedRAMP%20High/families",
                "compliance://FedRAMP%20Moderate/families",
            ]
        );
        assert!(resources.iter().all(|r| r.mime_type == MIME_JSON));
    }

    #[test]
    fn test_read_programs() {
        let text = router().read("compliance://programs").unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["name"], "FedRAMP High");
    }

    #[test]
    fn test_read_control_json() {
        let text = router()
            .read("compliance://FedRAMP%20High/controls/ac-1")
            .unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["id"], "AC-1");
        assert_eq!(value["family"], "AC");
        assert_eq!(value["impact"], "High");
        assert!(value["assessmentInfo"]["objectives"].is_array());
    }

    #[test]
    fn test_read_families_and_search() {
        let router = router();

        let text = router.read("compliance://FedRAMP%20Moderate/families").unwrap();
        let families: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(families[0]["id"], "AC");
        assert!(families[0]["controls"].as_array().unwrap().len() > 1);

        let text = router.read("compliance://FedRAMP%20High/search/audit").unwrap();
        let results: Value = serde_json::from_str(&text).unwrap();
        assert!(!results.as_array().unwrap().is_empty());
    }

    #[test]
    fn test_read_errors() {
        let router = router();

        let err = router.read("compliance://NoSuch/families").unwrap_err();
        assert_eq!(err, "compliance program not found: NoSuch");

        let err = router
            .read("compliance://FedRAMP%20High/controls/zz-99")
            .unwrap_err();
        assert_eq!(err, "control not found: zz-99");
    }
}
