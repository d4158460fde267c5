//! Task-list analysis.
//!
//! Parses a checklist document into a structured [`ProgressSummary`]:
//! overall task counts, per-phase rollups, the range of completed task
//! identifiers, and the next pending task.
//!
//! The analyzer never fails on malformed input. Lines that don't match the
//! grammar in [`patterns`] are free text and are ignored; a document with no
//! recognizable tasks produces a zero-valued summary, not an error.

pub mod patterns;

use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WaypointError};
use patterns::{LinePatterns, COMPLETE_MARK};

/// Sentinel task range used when no tasks are completed.
pub const EMPTY_TASK_RANGE: &str = "T000-T000";

// ============================================================================
// Phase Status
// ============================================================================

/// Derived completion status of a phase.
///
/// The status is a pure function of `(completed, total)`:
///
/// - `Empty` iff `total == 0`
/// - `Complete` iff `completed == total > 0`
/// - `Partial` iff `0 < completed < total`
/// - `Pending` iff `completed == 0 < total`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseStatus {
    Empty,
    Pending,
    Partial,
    Complete,
}

impl PhaseStatus {
    /// Derive the status from task counts.
    ///
    /// # Example
    ///
    /// ```
    /// use waypoint::analyzer::PhaseStatus;
    ///
    /// assert_eq!(PhaseStatus::derive(0, 0), PhaseStatus::Empty);
    /// assert_eq!(PhaseStatus::derive(0, 3), PhaseStatus::Pending);
    /// assert_eq!(PhaseStatus::derive(2, 3), PhaseStatus::Partial);
    /// assert_eq!(PhaseStatus::derive(3, 3), PhaseStatus::Complete);
    /// ```
    #[must_use]
    pub fn derive(completed: u32, total: u32) -> Self {
        if total == 0 {
            Self::Empty
        } else if completed == total {
            Self::Complete
        } else if completed > 0 {
            Self::Partial
        } else {
            Self::Pending
        }
    }
}

// ============================================================================
// Task
// ============================================================================

/// A single task line parsed from the document.
///
/// Tasks are immutable once parsed and exist only within a single analysis
/// run. The position is the byte offset of the line within the document and
/// is used only for ordering and phase containment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Task identifier (e.g. `T001`)
    pub id: String,
    /// Whether the completion marker reads `[X]`
    pub complete: bool,
    /// Byte offset of the task line within the document
    pub position: usize,
}

// ============================================================================
// Phase
// ============================================================================

/// A named contiguous span of the document grouping related tasks.
///
/// A task belongs to the phase whose span contains its position; there is
/// no explicit task-to-phase reference in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Phase name including the `Phase N:` prefix
    pub name: String,
    /// Total task count within the span
    pub total: u32,
    /// Completed task count within the span
    pub completed: u32,
    /// Derived status
    pub status: PhaseStatus,
    /// Completion percentage rounded to 2 decimal places (0.0 when empty)
    pub percentage: f64,
}

// ============================================================================
// Progress Summary
// ============================================================================

/// Aggregate progress over the whole task-list document.
///
/// This is the machine-readable output of the analyzer: serialized as JSON
/// on the primary output stream so automated callers can consume it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// Feature identifier derived from the containing directory name
    pub feature_id: String,
    /// Total number of detected tasks
    pub total_tasks: u32,
    /// Number of completed tasks
    pub completed_tasks: u32,
    /// Number of pending tasks
    pub pending_tasks: u32,
    /// Overall completion percentage rounded to 2 decimal places
    pub progress_percentage: f64,
    /// Phases in document order
    pub phases: Vec<Phase>,
    /// First and last completed task identifiers in document order,
    /// or `T000-T000` when none are completed
    pub task_range: String,
    /// Identifier of the first pending task, if any
    pub next_task: Option<String>,
    /// First completed task identifier, if any
    pub first_completed_task: Option<String>,
    /// Last completed task identifier, if any
    pub last_completed_task: Option<String>,
}

// ============================================================================
// Percentage Helper
// ============================================================================

/// Completion percentage rounded to 2 decimal places.
///
/// Defined as 0.0 when `total` is 0 to avoid division by zero.
#[must_use]
pub fn percentage(completed: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = f64::from(completed) / f64::from(total) * 100.0;
    (raw * 100.0).round() / 100.0
}

// ============================================================================
// Task List Analyzer
// ============================================================================

/// Parses a checklist document into a [`ProgressSummary`].
///
/// # Example
///
/// ```
/// use waypoint::analyzer::TaskListAnalyzer;
///
/// let doc = "\
/// ## Phase 1: Setup
/// - [X] T001 Create project
/// - [ ] T002 Configure CI
/// ";
/// let summary = TaskListAnalyzer::new().analyze(doc, "001-demo");
/// assert_eq!(summary.total_tasks, 2);
/// assert_eq!(summary.completed_tasks, 1);
/// assert_eq!(summary.next_task.as_deref(), Some("T002"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskListAnalyzer {
    patterns: LinePatterns,
}

impl TaskListAnalyzer {
    /// Create a new analyzer with the standard line grammar.
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: LinePatterns::new(),
        }
    }

    /// Read and analyze a task-list file.
    ///
    /// The feature identifier is derived from the name of the directory
    /// directly containing the file.
    ///
    /// # Errors
    ///
    /// Returns [`WaypointError::MissingFile`] if the file does not exist.
    /// Read failures propagate as IO errors; the analysis itself never fails.
    pub fn analyze_file(&self, path: &Path) -> Result<ProgressSummary> {
        if !path.exists() {
            return Err(WaypointError::missing_file(path));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(self.analyze(&content, feature_id_from_path(path)))
    }

    /// Analyze document text into a progress summary. Infallible.
    #[must_use]
    pub fn analyze(&self, content: &str, feature_id: impl Into<String>) -> ProgressSummary {
        let tasks = self.scan_tasks(content);
        let phases = self.scan_phases(content, &tasks);

        let total_tasks = tasks.len() as u32;
        let completed_tasks = tasks.iter().filter(|t| t.complete).count() as u32;

        let completed_ids: Vec<&str> = tasks
            .iter()
            .filter(|t| t.complete)
            .map(|t| t.id.as_str())
            .collect();
        let first_completed_task = completed_ids.first().map(|id| (*id).to_string());
        let last_completed_task = completed_ids.last().map(|id| (*id).to_string());
        let task_range = match (&first_completed_task, &last_completed_task) {
            (Some(first), Some(last)) => format!("{}-{}", first, last),
            _ => EMPTY_TASK_RANGE.to_string(),
        };

        let next_task = tasks.iter().find(|t| !t.complete).map(|t| t.id.clone());

        ProgressSummary {
            feature_id: feature_id.into(),
            total_tasks,
            completed_tasks,
            pending_tasks: total_tasks - completed_tasks,
            progress_percentage: percentage(completed_tasks, total_tasks),
            phases,
            task_range,
            next_task,
            first_completed_task,
            last_completed_task,
        }
    }

    /// Detect all task lines in document order.
    fn scan_tasks(&self, content: &str) -> Vec<Task> {
        self.patterns
            .task_line
            .captures_iter(content)
            .map(|caps| {
                let m = caps.get(0).expect("capture group 0 always present");
                Task {
                    id: caps[2].to_string(),
                    complete: &caps[1] == COMPLETE_MARK,
                    position: m.start(),
                }
            })
            .collect()
    }

    /// Detect phase headings and roll up the tasks contained in each span.
    ///
    /// Phase headings partition the document into contiguous spans from one
    /// heading (exclusive of the heading line) to the next heading or end of
    /// document.
    fn scan_phases(&self, content: &str, tasks: &[Task]) -> Vec<Phase> {
        let headings: Vec<(String, Range<usize>)> = {
            let matches: Vec<_> = self.patterns.phase_heading.captures_iter(content).collect();
            matches
                .iter()
                .enumerate()
                .map(|(i, caps)| {
                    let name = caps[1].trim().to_string();
                    let start = caps.get(0).expect("capture group 0 always present").end();
                    let end = matches
                        .get(i + 1)
                        .map_or(content.len(), |next| {
                            next.get(0).expect("capture group 0 always present").start()
                        });
                    (name, start..end)
                })
                .collect()
        };

        headings
            .into_iter()
            .map(|(name, span)| {
                let in_span: Vec<&Task> =
                    tasks.iter().filter(|t| span.contains(&t.position)).collect();
                let total = in_span.len() as u32;
                let completed = in_span.iter().filter(|t| t.complete).count() as u32;
                Phase {
                    name,
                    total,
                    completed,
                    status: PhaseStatus::derive(completed, total),
                    percentage: percentage(completed, total),
                }
            })
            .collect()
    }
}

/// Derive the feature identifier from the directory containing a path.
fn feature_id_from_path(path: &Path) -> String {
    path.parent()
        .and_then(|dir| dir.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================
