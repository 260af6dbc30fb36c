//! Core data models for security controls and evidence guidance.

mod control;
mod guidance;

pub use control::{
    canonical_id, family_of, AssessmentInfo, Control, ControlFamily, Impact, ProgramInfo,
};
pub use guidance::{EvidenceGuidance, EvidencePractice};
