//! Waypoint - Checkpoint Reporting Suite
//!
//! Tracks progress of a task-list document and produces human-readable
//! checkpoint reports plus an updated index summarizing project status.
//!
//! # Architecture
//!
//! The crate is organized as a pipeline of three components:
//!
//! - [`analyzer`] - Parses a checklist document into a structured progress summary
//! - [`report`] - Renders a checkpoint report from the summary, narrative
//!   context, and a placeholder template
//! - [`index`] - Merges the rendered report's metadata into the long-lived
//!   index document
//!
//! plus the supporting modules:
//!
//! - [`config`] - Optional per-project settings
//! - [`error`] - Custom error types and handling
//!
//! # Example
//!
//! ```rust,ignore
//! use waypoint::analyzer::TaskListAnalyzer;
//! use waypoint::report::{CheckpointContext, ReportAssembler};
//! use waypoint::index::{CheckpointFilename, IndexMerger};
//!
//! let summary = TaskListAnalyzer::new().analyze_file("specs/001-demo/tasks.md".as_ref())?;
//! let assembler = ReportAssembler::new(summary, CheckpointContext::empty(), "02", "US1-Complete");
//! let report_path = assembler.write(&template, "specs/001-demo".as_ref())?;
//!
//! let parsed = CheckpointFilename::parse(&assembler.filename())?;
//! IndexMerger::from_filename(&parsed, 53).merge_file(&index_path)?;
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod index;
pub mod report;

// Re-export commonly used types
pub use error::{Result, WaypointError};

// Re-export analyzer types
pub use analyzer::{Phase, PhaseStatus, ProgressSummary, Task, TaskListAnalyzer};

// Re-export config types
pub use config::ProjectSettings;

// Re-export report types
pub use report::{CheckpointContext, LearningEntry, Placeholder, ReportAssembler};

// Re-export index types
pub use index::{CheckpointFilename, IndexMerger, MergeReport, PatchOutcome};
