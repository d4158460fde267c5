//! Checkpoint report assembly.
//!
//! Consumes a [`ProgressSummary`], the operator's [`CheckpointContext`], and
//! a template document, and produces a rendered report file named
//! `CHECKPOINT-<NN>_<description>_<TaskRange>.md`. Rendering is a single
//! pass of literal placeholder substitution (see [`template`]).

pub mod context;
pub mod template;

pub use context::{collect_interactive, CheckpointContext, LearningEntry};
pub use template::Placeholder;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use regex::Regex;
use tracing::info;
use walkdir::WalkDir;

use crate::analyzer::{Phase, PhaseStatus, ProgressSummary};
use crate::error::{Result, WaypointError};

// ============================================================================
// Checkpoint Numbering
// ============================================================================

/// Auto-detect the next checkpoint number from existing report files.
///
/// Scans `output_dir` (non-recursively) for files named `CHECKPOINT-<digits>...`
/// and returns one greater than the maximum found, zero-padded to two digits.
/// Returns `"01"` when the directory is missing, empty, or holds no reports.
///
/// # Example
///
/// ```
/// use waypoint::report::detect_checkpoint_number;
/// use std::path::Path;
///
/// assert_eq!(detect_checkpoint_number(Path::new("/nonexistent")), "01");
/// ```
#[must_use]
pub fn detect_checkpoint_number(output_dir: &Path) -> String {
    let re = Regex::new(r"^CHECKPOINT-(\d+)").unwrap();

    let mut max_seen: Option<u32> = None;
    for entry in WalkDir::new(output_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .flatten()
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(caps) = re.captures(&name) {
            if let Ok(num) = caps[1].parse::<u32>() {
                max_seen = Some(max_seen.map_or(num, |m| m.max(num)));
            }
        }
    }

    match max_seen {
        Some(max) => format!("{:02}", max + 1),
        None => "01".to_string(),
    }
}

// ============================================================================
// Section Rendering
// ============================================================================

/// Status glyph for a phase row in the report table.
fn status_glyph(status: PhaseStatus) -> &'static str {
    match status {
        PhaseStatus::Complete => "✅",
        PhaseStatus::Partial => "⏸️",
        PhaseStatus::Pending => "⏳",
        PhaseStatus::Empty => "➖",
    }
}

/// Render the per-phase progress table.
///
/// One row per phase in document order; percentages are integer-formatted
/// here, unlike the 2-decimal summary values.
#[must_use]
pub fn format_phases_table(phases: &[Phase]) -> String {
    if phases.is_empty() {
        return "No phases found.".to_string();
    }

    let mut lines = Vec::with_capacity(phases.len() + 2);
    lines.push("| Phase | Tasks | Status | Notes |".to_string());
    lines.push("|-------|-------|--------|-------|".to_string());

    for phase in phases {
        let status = format!("{} {:.0}%", status_glyph(phase.status), phase.percentage);
        let notes = match phase.status {
            PhaseStatus::Complete => "Complete".to_string(),
            PhaseStatus::Partial => format!("{}/{} tasks", phase.completed, phase.total),
            _ => "Not started".to_string(),
        };
        lines.push(format!(
            "| **{}** | {}/{} | {} | {} |",
            phase.name, phase.completed, phase.total, status, notes
        ));
    }

    lines.join("\n")
}

/// Render the knowledge-base learning entries section.
#[must_use]
pub fn format_learning_entries(entries: &[LearningEntry]) -> String {
    if entries.is_empty() {
        return "_No knowledge base entries documented for this checkpoint._".to_string();
    }

    let mut lines = Vec::new();
    lines.push(format!(
        "**{} critical learnings documented:**\n",
        entries.len()
    ));

    for (i, entry) in entries.iter().enumerate() {
        lines.push(format!("### {}. {}", i + 1, entry.title));
        lines.push(format!("**Problem**: {}", entry.problem));
        lines.push(format!("**Solution**: {}", entry.solution));
        lines.push(format!("**Saves**: {}\n", entry.time_saved));
    }

    lines.join("\n")
}

// ============================================================================
// Report Assembler
// ============================================================================

/// Assembles a checkpoint report from analysis results and narrative context.
///
/// # Example
///
/// ```
/// use waypoint::analyzer::TaskListAnalyzer;
/// use waypoint::report::{CheckpointContext, ReportAssembler};
///
/// let summary = TaskListAnalyzer::new().analyze("- [X] T001\n", "001-demo");
/// let assembler = ReportAssembler::new(
///     summary,
///     CheckpointContext::empty(),
///     "02",
///     "US1-Complete",
/// );
/// assert_eq!(assembler.filename(), "CHECKPOINT-02_US1-Complete_T001-T001.md");
/// ```
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    summary: ProgressSummary,
    context: CheckpointContext,
    checkpoint_num: String,
    description: String,
    date: NaiveDate,
    resume_command: String,
}

impl ReportAssembler {
    /// Create an assembler. The report date defaults to today and the resume
    /// command to the standard `specs/<feature-id>` form.
    #[must_use]
    pub fn new(
        summary: ProgressSummary,
        context: CheckpointContext,
        checkpoint_num: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let resume_command = format!("/team-lead.implement specs/{} --resume", summary.feature_id);
        Self {
            summary,
            context,
            checkpoint_num: checkpoint_num.into(),
            description: description.into(),
            date: chrono::Local::now().date_naive(),
            resume_command,
        }
    }

    /// Override the report date.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Override the resume command.
    #[must_use]
    pub fn with_resume_command(mut self, command: impl Into<String>) -> Self {
        self.resume_command = command.into();
        self
    }

    /// Get the checkpoint number.
    #[must_use]
    pub fn checkpoint_num(&self) -> &str {
        &self.checkpoint_num
    }

    /// Deterministic report filename:
    /// `CHECKPOINT-<NN>_<description>_<TaskRange>.md`.
    #[must_use]
    pub fn filename(&self) -> String {
        format!(
            "CHECKPOINT-{}_{}_{}.md",
            self.checkpoint_num, self.description, self.summary.task_range
        )
    }

    /// Render the report from a template.
    ///
    /// Every vocabulary token is substituted; tokens the operator has no
    /// input for render a fixed to-be-completed marker so raw placeholder
    /// syntax never reaches the delivered report.
    #[must_use]
    pub fn render(&self, template: &str) -> String {
        template::substitute(template, &self.substitutions())
    }

    /// Render the report and write it into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`WaypointError::ReportExists`] if the computed target path
    /// already exists; a pre-existing report is a conflict to surface, never
    /// something to silently overwrite.
    pub fn write(&self, template: &str, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(self.filename());
        if path.exists() {
            return Err(WaypointError::report_exists(path));
        }
        std::fs::write(&path, self.render(template))?;
        info!("Wrote checkpoint report: {}", path.display());
        Ok(path)
    }

    fn substitutions(&self) -> Vec<(Placeholder, String)> {
        let summary = &self.summary;
        let context = &self.context;

        vec![
            (Placeholder::CheckpointNum, self.checkpoint_num.clone()),
            (Placeholder::PhaseDescription, self.description.clone()),
            (Placeholder::TaskRange, summary.task_range.clone()),
            (Placeholder::Date, self.date.format("%Y-%m-%d").to_string()),
            (Placeholder::FeatureId, summary.feature_id.clone()),
            (Placeholder::TotalTasks, summary.total_tasks.to_string()),
            (
                Placeholder::CompletedTasks,
                summary.completed_tasks.to_string(),
            ),
            (
                Placeholder::ProgressPercentage,
                format!("{:.0}", summary.progress_percentage),
            ),
            (Placeholder::PhasesTable, format_phases_table(&summary.phases)),
            (
                Placeholder::ExecutiveSummary,
                context.executive_summary.clone(),
            ),
            (
                Placeholder::KeyAchievements,
                context.achievements.join("\n"),
            ),
            (Placeholder::FilesCreated, context.files_summary.clone()),
            (
                Placeholder::KbEntries,
                format_learning_entries(&context.learnings),
            ),
            (
                Placeholder::NextTask,
                summary
                    .next_task
                    .clone()
                    .unwrap_or_else(|| "None".to_string()),
            ),
            (Placeholder::ResumeCommand, self.resume_command.clone()),
            (
                Placeholder::WhatWasImplemented,
                "_TODO: Detail what was implemented by phase/user story_".to_string(),
            ),
            (
                Placeholder::ServerStatus,
                "_TODO: Describe server and database status_".to_string(),
            ),
            (
                Placeholder::QualityMetrics,
                "_TODO: List code quality, architecture, and performance metrics_".to_string(),
            ),
            (
                Placeholder::RemainingWork,
                format!(
                    "**Remaining**: {} tasks\n\n_TODO: Detail next waves and estimated duration_",
                    summary.pending_tasks
                ),
            ),
            (
                Placeholder::PauseRationale,
                "_TODO: Explain why pausing at this checkpoint_".to_string(),
            ),
            (
                Placeholder::TestingInstructions,
                "_TODO: Provide testing commands and scenarios_".to_string(),
            ),
            (
                Placeholder::WhatHappensNext,
                "_TODO: Describe what happens when resuming_".to_string(),
            ),
            (
                Placeholder::EstimatedCompletion,
                "_TODO: Provide time estimates for remaining work_".to_string(),
            ),
            (
                Placeholder::Dependencies,
                "_TODO: List runtime dependencies and versions_".to_string(),
            ),
            (
                Placeholder::RiskAssessment,
                "_TODO: Document completed and remaining risks_".to_string(),
            ),
            (
                Placeholder::Recommendations,
                "_TODO: Provide recommendations for next session_".to_string(),
            ),
            (
                Placeholder::SuccessCriteria,
                "_TODO: Status of success criteria from spec_".to_string(),
            ),
            (
                Placeholder::WhatAccomplished,
                format!(
                    "{:.0}% of implementation complete",
                    summary.progress_percentage
                ),
            ),
            (
                Placeholder::WhyGoodStoppingPoint,
                "_TODO: List reasons this is a good checkpoint_".to_string(),
            ),
            (
                Placeholder::WhatsNext,
                format!("Resume with {}", self.resume_command),
            ),
            (
                Placeholder::ImplementationLead,
                "Team Lead Agent".to_string(),
            ),
            (
                Placeholder::NextReview,
                "_TODO: Specify next review milestone_".to_string(),
            ),
        ]
    }
}

// ============================================================================
// Tests
// ============================================================================
