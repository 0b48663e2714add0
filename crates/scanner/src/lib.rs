#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`ScannerError`)
//! - [`config`]: Tool configuration derived from `CxflowConfig` (`ScanToolConfig`)
//! - [`runner`]: Process execution abstraction (`CommandRunner` trait, `ProcessRunner`)
//! - [`auth`]: API key configuration (`ApiKeyConfigurator`)
//! - [`project`]: Project lookup and creation (`ProjectManager`)
//! - [`repo`]: Source checkout (`RepositoryCloner`, `CheckoutOutcome`)
//! - [`scan`]: Scan launch and scan id lookup (`ScanLauncher`, `ScanLocator`)
//! - [`report`]: Result report generation (`ReportFetcher`)
//! - [`tool`]: Facade handing out the components above (`ScanTool`)
//!
//! # Architecture
//!
//! ```text
//! ScanTool ──> ProjectManager / ScanLauncher / ScanLocator / ReportFetcher
//!                   │
//!                   ▼
//!            CommandRunner (trait)
//!                 │      │
//!                 ▼      ▼
//!         ProcessRunner  test runners
//!                 │
//!                 ▼
//!          cx / git processes
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod project;
pub mod repo;
pub mod report;
pub mod runner;
pub mod scan;
pub mod tool;

// --- Public API Re-exports ---

// Configuration
pub use config::ScanToolConfig;

// Error
pub use error::ScannerError;

// Process execution
pub use runner::{CommandRunner, CommandSpec, ProcessRunner};

// Components
pub use auth::ApiKeyConfigurator;
pub use project::ProjectManager;
pub use repo::{CheckoutOutcome, RepositoryCloner};
pub use report::ReportFetcher;
pub use scan::{ScanLauncher, ScanLocator, extract_scan_id};
pub use tool::ScanTool;
