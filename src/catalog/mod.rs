//! OSCAL-style catalog parsing.
//!
//! A catalog document is a tree of `groups`, each with `controls`, each with
//! `parts`:
//!
//! ```yaml
//! catalog:
//!   metadata:
//!     title: NIST SP 800-53 Rev 5 (FedRAMP High baseline)
//!     version: Rev 5
//!   groups:
//!     - id: ac
//!       title: Access Control
//!       controls:
//!         - id: ac-2
//!           title: Account Management
//!           parts:
//!             - name: statement
//!               prose: Define and document the types of accounts ...
//!             - name: guidance
//!               prose: Examples of system account types include ...
//!           controls:          # enhancements
//!             - id: ac-2.1
//!               title: Automated System Account Management
//! ```
//!
//! Only the parts named `statement`, `guidance`, `assessment-objective` and
//! `assessment-method` are read. Everything else in the document (props,
//! params, links, back-matter) is ignored; this is not a profile resolver.

mod index;

pub use index::SearchIndex;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::{canonical_id, family_of, AssessmentInfo, Control, ControlFamily, Impact};

const STATEMENT_PART: &str = "statement";
const GUIDANCE_PART: &str = "guidance";
const OBJECTIVE_PART: &str = "assessment-objective";
const METHOD_PART: &str = "assessment-method";

/// Errors raised while loading a catalog document
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The document is not valid YAML/JSON or lacks the `catalog` root
    #[error("Failed to parse catalog: {0}")]
    Parse(String),
}

impl From<serde_yaml::Error> for CatalogError {
    fn from(err: serde_yaml::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    catalog: RawCatalog,
}

#[derive(Debug, Default, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    metadata: RawMetadata,
    #[serde(default)]
    groups: Vec<RawGroup>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    title: String,
    #[serde(default)]
    version: String,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    controls: Vec<RawControl>,
}

#[derive(Debug, Deserialize)]
struct RawControl {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    parts: Vec<RawPart>,
    #[serde(default)]
    controls: Vec<RawControl>,
}

#[derive(Debug, Deserialize)]
struct RawPart {
    #[serde(default)]
    name: String,
    #[serde(default)]
    prose: String,
    #[serde(default)]
    parts: Vec<RawPart>,
}

impl RawPart {
    /// Own prose followed by nested prose, depth-first.
    fn collect_prose(&self, out: &mut Vec<String>) {
        let prose = self.prose.trim();
        if !prose.is_empty() {
            out.push(prose.to_string());
        }
        for part in &self.parts {
            part.collect_prose(out);
        }
    }
}

/// A parsed catalog, normalized into controls and families
#[derive(Debug, Clone)]
pub struct ParsedCatalog {
    pub title: String,
    pub version: String,

    /// Families keyed by family ID; each holds the controls whose derived
    /// family equals that ID, in document order
    pub families: BTreeMap<String, ControlFamily>,

    /// Top-level controls keyed by lowercase ID
    pub controls: BTreeMap<String, Arc<Control>>,
}

/// Parse a catalog document, assigning `impact` to every control.
pub fn parse_catalog(data: &[u8], impact: Impact) -> Result<ParsedCatalog, CatalogError> {
    let document: CatalogDocument = serde_yaml::from_slice(data)?;
    let raw = document.catalog;

    let mut parsed = ParsedCatalog {
        title: raw.metadata.title,
        version: raw.metadata.version,
        families: BTreeMap::new(),
        controls: BTreeMap::new(),
    };

    for group in raw.groups {
        let family_id = canonical_id(&group.id);
        parsed
            .families
            .entry(family_id.clone())
            .or_insert_with(|| ControlFamily::new(&family_id, &group.title));

        for raw_control in group.controls {
            let Some(control) = convert_control(raw_control, impact) else {
                continue;
            };
            parsed.insert(Arc::new(control));
        }
    }

    tracing::debug!(
        title = %parsed.title,
        families = parsed.families.len(),
        controls = parsed.controls.len(),
        "Parsed catalog"
    );

    Ok(parsed)
}

impl ParsedCatalog {
    /// Add a control to the map and to its family's list.
    ///
    /// A repeated ID replaces the earlier control in both places.
    fn insert(&mut self, control: Arc<Control>) {
        let family = self
            .families
            .entry(control.family.clone())
            .or_insert_with(|| ControlFamily::new(&control.family, &control.family));

        match family.controls.iter().position(|c| c.id == control.id) {
            Some(pos) => {
                tracing::warn!(control = %control.id, "Duplicate control ID in catalog, keeping the last one");
                family.controls[pos] = Arc::clone(&control);
            }
            None => family.controls.push(Arc::clone(&control)),
        }

        self.controls.insert(control.id.to_lowercase(), control);
    }
}

fn convert_control(raw: RawControl, impact: Impact) -> Option<Control> {
    if raw.id.trim().is_empty() {
        tracing::warn!(title = %raw.title, "Skipping catalog control without an ID");
        return None;
    }
    if family_of(raw.id.trim()).is_empty() {
        tracing::warn!(control = %raw.id, "Skipping catalog control without a family prefix");
        return None;
    }

    let mut control = Control::new(&raw.id, raw.title, impact);
    let mut statement_seen = false;
    let mut guidance_seen = false;
    let mut assessment = AssessmentInfo::default();

    for part in &raw.parts {
        match part.name.as_str() {
            STATEMENT_PART if !statement_seen => {
                statement_seen = true;
                control.description = part_text(part);
            }
            GUIDANCE_PART if !guidance_seen => {
                guidance_seen = true;
                control.guidance = part_text(part);
            }
            OBJECTIVE_PART => part.collect_prose(&mut assessment.objectives),
            METHOD_PART => part.collect_prose(&mut assessment.methods),
            _ => {}
        }
    }

    if !assessment.is_empty() {
        control.assessment_info = Some(assessment);
    }

    control.enhancements = raw
        .controls
        .into_iter()
        .filter_map(|child| convert_control(child, impact))
        .collect();

    Some(control)
}

/// The part's prose, or its items' prose joined by newlines when the part
/// itself carries none (OSCAL statements are often just a list of items).
fn part_text(part: &RawPart) -> String {
    let prose = part.prose.trim();
    if !prose.is_empty() {
        return prose.to_string();
    }

    let mut items = Vec::new();
    for child in &part.parts {
        child.collect_prose(&mut items);
    }
    items.join("\n")
}
