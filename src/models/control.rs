//! Control model: the normalized representation of a catalog entry.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Impact level of the baseline a control was loaded into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    High,
    Moderate,
    Low,
}

impl Impact {
    /// Returns the display name of the impact level
    pub fn name(&self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Moderate => "Moderate",
            Impact::Low => "Low",
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a control is assessed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentInfo {
    pub objectives: Vec<String>,
    pub methods: Vec<String>,
}

impl AssessmentInfo {
    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty() && self.methods.is_empty()
    }
}

/// A single security requirement (e.g. `AC-1`)
///
/// The same catalog control can appear in several baselines, so `impact` is
/// assigned by the owning program rather than read from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    /// Canonical (uppercase) identifier
    pub id: String,

    pub title: String,

    /// Normative statement text
    pub description: String,

    /// Implementation guidance text
    pub guidance: String,

    /// Family prefix (everything before the first `-` of the ID)
    pub family: String,

    pub impact: Impact,

    /// Child controls with dotted suffixes (e.g. `AC-2.1`)
    #[serde(default)]
    pub enhancements: Vec<Control>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_info: Option<AssessmentInfo>,
}

impl Control {
    /// Create a control with the canonical ID and derived family.
    pub fn new(id: &str, title: impl Into<String>, impact: Impact) -> Self {
        let id = canonical_id(id);
        Self {
            family: family_of(&id).to_string(),
            id,
            title: title.into(),
            description: String::new(),
            guidance: String::new(),
            impact,
            enhancements: Vec::new(),
            assessment_info: None,
        }
    }

    /// Whether the ID, title or description contains `needle`.
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.id.to_lowercase().contains(needle)
            || self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Canonical form of a control ID: trimmed and uppercase.
pub fn canonical_id(id: &str) -> String {
    id.trim().to_uppercase()
}

/// Family prefix of a control ID.
///
/// An ID without a hyphen is its own family. A leading hyphen yields an
/// empty prefix, which the catalog parser rejects.
pub fn family_of(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

/// A named group of related controls (e.g. `AC` = Access Control)
///
/// Controls are shared with the owning program's control map.
#[derive(Debug, Clone, Serialize)]
pub struct ControlFamily {
    pub id: String,
    pub name: String,
    pub description: String,
    pub controls: Vec<Arc<Control>>,
}

impl ControlFamily {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.trim().to_uppercase(),
            name: name.to_string(),
            description: format!("{} controls", name),
            controls: Vec::new(),
        }
    }
}

/// Summary of a registered compliance program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_new_canonicalizes_id() {
        let control = Control::new("ac-2.1", "Automated Account Management", Impact::High);
        assert_eq!(control.id, "AC-2.1");
        assert_eq!(control.family, "AC");
        assert!(control.enhancements.is_empty());
    }

    #[test]
    fn test_family_without_hyphen_is_whole_id() {
        assert_eq!(family_of("PM"), "PM");
        assert_eq!(family_of("SC-7"), "SC");
        assert_eq!(family_of("SA-9-2"), "SA");
    }

    #[test]
    fn test_control_matches() {
        let mut control = Control::new("IA-2", "Identification and Authentication", Impact::Low);
        control.description = "Uniquely identify organizational users.".to_string();

        assert!(control.matches("ia-2"));
        assert!(control.matches("authentication"));
        assert!(control.matches("organizational"));
        assert!(!control.matches("audit"));
    }

    #[test]
    fn test_impact_display() {
        assert_eq!(Impact::High.to_string(), "High");
        assert_eq!(Impact::Moderate.to_string(), "Moderate");
        assert_eq!(
            serde_json::to_value(Impact::Low).unwrap(),
            serde_json::json!("Low")
        );
    }

    #[test]
    fn test_control_serializes_camel_case() {
        let mut control = Control::new("AU-2", "Event Logging", Impact::Moderate);
        control.assessment_info = Some(AssessmentInfo {
            objectives: vec!["events are logged".to_string()],
            methods: Vec::new(),
        });

        let json = serde_json::to_value(&control).unwrap();
        assert_eq!(json["id"], "AU-2");
        assert_eq!(json["impact"], "Moderate");
        assert_eq!(json["assessmentInfo"]["objectives"][0], "events are logged");
    }

    #[test]
    fn test_family_description() {
        let family = ControlFamily::new("ac", "Access Control");
        assert_eq!(family.id, "AC");
        assert_eq!(family.description, "Access Control controls");
    }
}
