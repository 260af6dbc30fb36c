//! Plain-text rendering of controls, families and evidence data for tool
//! responses.

use std::sync::Arc;

use crate::models::{Control, ControlFamily, EvidenceGuidance, EvidencePractice, ProgramInfo};

/// Full control detail
pub fn format_control(control: &Control) -> String {
    let mut text = format!("Control Information: {} - {}\n\n", control.id, control.title);
    text.push_str(&format!("Family: {}\n", control.family));
    text.push_str(&format!("Impact: {}\n\n", control.impact));

    text.push_str("Description:\n");
    text.push_str(&format!("{}\n\n", control.description));

    if !control.guidance.is_empty() {
        text.push_str("Implementation Guidance:\n");
        text.push_str(&format!("{}\n\n", control.guidance));
    }

    if let Some(info) = &control.assessment_info {
        if !info.objectives.is_empty() {
            text.push_str("Assessment Objectives:\n");
            push_bullets(&mut text, &info.objectives);
            text.push('\n');
        }

        if !info.methods.is_empty() {
            text.push_str("Assessment Methods:\n");
            push_bullets(&mut text, &info.methods);
            text.push('\n');
        }
    }

    if !control.enhancements.is_empty() {
        text.push_str("Control Enhancements:\n");
        for enhancement in &control.enhancements {
            text.push_str(&format!("- {}: {}\n", enhancement.id, enhancement.title));
        }
    }

    text
}

/// One family with its member controls
pub fn format_family(family: &ControlFamily) -> String {
    let mut text = format!("Control Family: {} - {}\n\n", family.id, family.name);
    text.push_str(&format!("Description: {}\n\n", family.description));

    text.push_str(&format!(
        "Controls in this family ({}):\n",
        family.controls.len()
    ));
    for control in &family.controls {
        text.push_str(&format!("- {}: {}\n", control.id, control.title));
    }

    text
}

/// Family summary lines for a program
pub fn format_family_list(program: &str, families: &[ControlFamily]) -> String {
    let mut text = format!("Control Families in {} ({}):\n\n", program, families.len());
    for family in families {
        text.push_str(&format!(
            "- {}: {} ({} controls)\n",
            family.id,
            family.name,
            family.controls.len()
        ));
    }
    text
}

pub fn format_program_list(programs: &[ProgramInfo]) -> String {
    let mut text = format!("Available Compliance Programs ({}):\n\n", programs.len());
    for program in programs {
        text.push_str(&format!(
            "- {} ({}): {}\n",
            program.name, program.version, program.description
        ));
    }
    text
}

pub fn format_search_results(program: &str, query: &str, controls: &[Arc<Control>]) -> String {
    let mut text = format!("Search Results for '{}' in {}\n\n", query, program);

    if controls.is_empty() {
        text.push_str("No controls found matching the query.\n");
        return text;
    }

    text.push_str(&format!("Found {} control(s):\n", controls.len()));
    for control in controls {
        text.push_str(&format!("- {}: {}\n", control.id, control.title));
    }
    text
}

/// Complete evidence guidance for a control
pub fn format_guidance(guidance: &EvidenceGuidance) -> String {
    let mut text = format!("Evidence Guidance for {}\n\n", guidance.control_id);
    text.push_str(&format!("Description: {}\n\n", guidance.description));

    text.push_str("Evidence Types:\n");
    push_bullets(&mut text, &guidance.evidence_types);
    text.push('\n');

    text.push_str("Collection Steps:\n");
    push_numbered(&mut text, &guidance.collection_steps);
    text.push('\n');

    text.push_str("Examples:\n");
    push_bullets(&mut text, &guidance.examples);

    if !guidance.common_pitfalls.is_empty() {
        text.push('\n');
        text.push_str("Common Pitfalls:\n");
        push_bullets(&mut text, &guidance.common_pitfalls);
    }

    text
}

/// Program guidance shown when no company practice exists for a control
pub fn format_general_guidance(control_id: &str, guidance: &EvidenceGuidance) -> String {
    let mut text = format!(
        "No company-specific evidence practice found for {}. Here is general guidance:\n\n",
        control_id
    );
    text.push_str(&format!("Description: {}\n\n", guidance.description));

    text.push_str("Recommended Evidence Types:\n");
    push_bullets(&mut text, &guidance.evidence_types);
    text.push('\n');

    text.push_str("Suggested Collection Steps:\n");
    push_numbered(&mut text, &guidance.collection_steps);
    text.push('\n');

    text.push_str("Examples:\n");
    push_bullets(&mut text, &guidance.examples);

    text
}

pub fn format_guidance_search(query: &str, results: &[&EvidenceGuidance]) -> String {
    let mut text = format!("Evidence Guidance Search Results for '{}'\n\n", query);

    if results.is_empty() {
        text.push_str("No evidence guidance found matching the query.\n");
        return text;
    }

    for guidance in results {
        text.push_str(&format!("- {}: {}\n", guidance.control_id, guidance.description));
    }
    text
}

pub fn format_practice(practice: &EvidencePractice) -> String {
    let mut text = format!("Company Evidence Practice for {}\n\n", practice.control_id);
    text.push_str(&format!("{}\n\n", practice.practice));

    text.push_str(&format!("Responsible Team: {}\n", practice.responsible_team));
    text.push_str(&format!("Review Frequency: {}\n\n", practice.review_frequency));

    text.push_str("Required Artifacts:\n");
    push_bullets(&mut text, &practice.artifacts);
    text.push('\n');

    if !practice.notes.is_empty() {
        text.push_str(&format!("Notes: {}\n", practice.notes));
    }

    text
}

pub fn format_practice_search(query: &str, results: &[&EvidencePractice]) -> String {
    let mut text = format!("Company Evidence Practices Search Results for '{}'\n\n", query);

    if results.is_empty() {
        text.push_str("No company evidence practices found matching the query.\n");
        return text;
    }

    for (i, practice) in results.iter().enumerate() {
        if i > 0 {
            text.push_str("\n---\n\n");
        }

        text.push_str(&format!("Control: {}\n", practice.control_id));
        text.push_str(&format!("Responsible Team: {}\n", practice.responsible_team));
        text.push_str(&format!("Review Frequency: {}\n", practice.review_frequency));
        text.push_str(&format!("Summary: {}\n", practice.practice));
    }

    text
}

fn push_bullets(text: &mut String, items: &[String]) {
    for item in items {
        text.push_str(&format!("- {}\n", item));
    }
}

fn push_numbered(text: &mut String, items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, item));
    }
}
