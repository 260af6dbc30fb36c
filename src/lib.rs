//! # MCP Compliance
//!
//! A Model Context Protocol (MCP) server exposing FedRAMP / NIST SP 800-53
//! security control catalogs as queryable tools and resources.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Control, ControlFamily, EvidenceGuidance, etc.)
//! - [`catalog`]: Catalog document parsing and the keyword search index
//! - [`programs`]: Compliance programs with extensible trait-based architecture
//! - [`evidence`]: Static evidence guidance and company practices
//! - [`mcp`]: MCP protocol implementation and server
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```no_run
//! use mcp_compliance::{AppContext, Config};
//!
//! let ctx = AppContext::load(Config::default()).unwrap();
//! let high = ctx.registry.get_required("FedRAMP High").unwrap();
//! let control = high.get_control("ac-2").unwrap();
//! assert_eq!(control.family, "AC");
//! ```

pub mod catalog;
pub mod config;
pub mod context;
pub mod evidence;
pub mod mcp;
pub mod models;
pub mod programs;

// Re-export commonly used types
pub use config::Config;
pub use context::AppContext;
pub use models::{Control, ControlFamily, EvidenceGuidance, Impact};
pub use programs::{ComplianceProgram, ProgramError, ProgramRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
