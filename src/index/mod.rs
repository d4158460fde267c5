//! Index document merging.
//!
//! The index document is the long-lived aggregation of all checkpoint
//! reports. Merging a new report into it applies four localized edits to the
//! same text buffer in sequence:
//!
//! 1. **Entry insertion** — a fixed-shape summary block placed before the
//!    `## Future Checkpoints` anchor. A missing anchor is fatal and aborts
//!    before any write.
//! 2. **Progress-table patch** — rewrite the pending row for this checkpoint
//!    number. Best effort; no table or no row is a silent no-op.
//! 3. **Footer patch** — point the "Next Checkpoint Planned" label at
//!    checkpoint number + 1. Best effort.
//! 4. **Timestamp patch** — refresh the "Last Updated" date. Best effort.
//!
//! Which patches applied is aggregated into a [`MergeReport`] so callers can
//! diagnose a partially-eligible index instead of guessing.

use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::error::{Result, WaypointError};

/// Anchor heading the entry block is inserted before.
pub const FUTURE_CHECKPOINTS_ANCHOR: &str = "## Future Checkpoints";

/// Header row identifying the progress-tracking table.
pub const PROGRESS_TABLE_HEADER: &str = "| Checkpoint | Tasks | Progress | Duration | Status |";

/// Status cell content marking a row as still pending.
pub const PENDING_MARKER: &str = "⏳ Pending";

/// Status cell content written for a completed checkpoint.
pub const COMPLETE_MARKER: &str = "✅ COMPLETE";

/// Heading in the report body that introduces the achievements list.
pub const ACHIEVEMENTS_HEADING: &str = "## Key Technical Achievements";

/// Maximum achievements carried into an index entry.
pub const MAX_ACHIEVEMENTS: usize = 4;

// ============================================================================
// Checkpoint Filename
// ============================================================================

/// Components parsed from a checkpoint report filename.
///
/// # Example
///
/// ```
/// use waypoint::index::CheckpointFilename;
///
/// let parsed = CheckpointFilename::parse("CHECKPOINT-02_US1-Complete_T001-T039.md").unwrap();
/// assert_eq!(parsed.number(), "02");
/// assert_eq!(parsed.description(), "US1-Complete");
/// assert_eq!(parsed.task_range(), "T001-T039");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointFilename {
    number: String,
    number_value: u32,
    description: String,
    task_range: String,
    original: String,
}

impl CheckpointFilename {
    /// Parse a filename of the form `CHECKPOINT-<NN>_<Description>_<TaskRange>.md`.
    ///
    /// # Errors
    ///
    /// Returns [`WaypointError::InvalidCheckpointFilename`] when the name
    /// doesn't match the convention.
    pub fn parse(filename: &str) -> Result<Self> {
        let re = Regex::new(r"^CHECKPOINT-(\d+)_([^_]+)_(T\d+-T\d+)\.md$").unwrap();
        let caps = re
            .captures(filename)
            .ok_or_else(|| WaypointError::invalid_checkpoint_filename(filename))?;

        let number = caps[1].to_string();
        let number_value = number
            .parse()
            .map_err(|_| WaypointError::invalid_checkpoint_filename(filename))?;

        Ok(Self {
            number,
            number_value,
            description: caps[2].to_string(),
            task_range: caps[3].to_string(),
            original: filename.to_string(),
        })
    }

    /// Zero-padded checkpoint number as written in the filename.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Checkpoint number as an integer.
    #[must_use]
    pub fn number_value(&self) -> u32 {
        self.number_value
    }

    /// Description label.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Completed task range.
    #[must_use]
    pub fn task_range(&self) -> &str {
        &self.task_range
    }

    /// Original filename text.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }
}

// ============================================================================
// Achievement Extraction
// ============================================================================

/// Collect achievement bullets from a rendered report body.
///
/// Scans for the achievements heading and gathers subsequent bullet lines
/// until the next heading or [`MAX_ACHIEVEMENTS`] bullets, whichever comes
/// first. A report without the section yields an empty list.
#[must_use]
pub fn extract_achievements(report: &str) -> Vec<String> {
    let mut achievements = Vec::new();
    let mut in_section = false;

    for line in report.lines() {
        if line.contains(ACHIEVEMENTS_HEADING) {
            in_section = true;
            continue;
        }
        if in_section && line.starts_with("##") {
            break;
        }
        if in_section {
            let trimmed = line.trim();
            if trimmed.starts_with('-') {
                achievements.push(trimmed.to_string());
            }
        }
        if achievements.len() >= MAX_ACHIEVEMENTS {
            break;
        }
    }

    achievements
}

// ============================================================================
// Patch Outcomes
// ============================================================================

/// Result of one localized patch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The patch found its target and rewrote it.
    Applied,
    /// The target wasn't present; the text is unchanged.
    Skipped,
}

impl PatchOutcome {
    /// Check whether the patch rewrote its target.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Which of the merge edits found their targets.
///
/// Entry insertion is mandatory (a merge that returns at all has applied
/// it); the other three are best-effort, since not every index tracks a
/// progress table or carries the footer labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    pub entry: PatchOutcome,
    pub progress_table: PatchOutcome,
    pub footer: PatchOutcome,
    pub timestamp: PatchOutcome,
}

// ============================================================================
// Index Merger
// ============================================================================

/// Merges one checkpoint's metadata into the index document.
///
/// # Example
///
/// ```
/// use waypoint::index::{CheckpointFilename, IndexMerger};
///
/// let parsed = CheckpointFilename::parse("CHECKPOINT-02_US1-Complete_T001-T039.md").unwrap();
/// let merger = IndexMerger::from_filename(&parsed, 53);
///
/// let index = "# Checkpoints\n\n## Future Checkpoints\n\n- Checkpoint 03\n";
/// let (updated, report) = merger.merge(index).unwrap();
/// assert!(updated.contains("### ✅ Checkpoint 02 - US1-Complete"));
/// assert!(report.entry.is_applied());
/// ```
#[derive(Debug, Clone)]
pub struct IndexMerger {
    checkpoint_num: String,
    checkpoint_file: String,
    description: String,
    task_range: String,
    progress: u32,
    achievements: Vec<String>,
    date: NaiveDate,
}

impl IndexMerger {
    /// Create a merger from explicit metadata. The date defaults to today.
    #[must_use]
    pub fn new(
        checkpoint_num: impl Into<String>,
        checkpoint_file: impl Into<String>,
        description: impl Into<String>,
        task_range: impl Into<String>,
        progress: u32,
    ) -> Self {
        Self {
            checkpoint_num: checkpoint_num.into(),
            checkpoint_file: checkpoint_file.into(),
            description: description.into(),
            task_range: task_range.into(),
            progress,
            achievements: Vec::new(),
            date: chrono::Local::now().date_naive(),
        }
    }

    /// Create a merger from a parsed checkpoint filename.
    #[must_use]
    pub fn from_filename(parsed: &CheckpointFilename, progress: u32) -> Self {
        Self::new(
            parsed.number(),
            parsed.original(),
            parsed.description(),
            parsed.task_range(),
            progress,
        )
    }

    /// Set the achievement bullets for the entry block.
    #[must_use]
    pub fn with_achievements(mut self, achievements: Vec<String>) -> Self {
        self.achievements = achievements;
        self
    }

    /// Override the merge date.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Apply all four edits to the index text.
    ///
    /// # Errors
    ///
    /// Returns [`WaypointError::MissingAnchor`] when the index lacks the
    /// `## Future Checkpoints` heading; no partially-edited text is produced
    /// in that case.
    pub fn merge(&self, content: &str) -> Result<(String, MergeReport)> {
        let content = self.insert_entry(content)?;
        let (content, progress_table) = self.patch_progress_table(&content);
        let (content, footer) = self.patch_footer(&content);
        let (content, timestamp) = self.patch_timestamp(&content);

        Ok((
            content,
            MergeReport {
                entry: PatchOutcome::Applied,
                progress_table,
                footer,
                timestamp,
            },
        ))
    }

    /// Read, merge, and rewrite the index document in place.
    ///
    /// # Errors
    ///
    /// Returns [`WaypointError::MissingFile`] if the index doesn't exist and
    /// [`WaypointError::MissingAnchor`] if the anchor heading is absent; in
    /// both cases the file on disk is untouched.
    pub fn merge_file(&self, index_path: &Path) -> Result<MergeReport> {
        if !index_path.exists() {
            return Err(WaypointError::missing_file(index_path));
        }
        let content = std::fs::read_to_string(index_path)?;
        let (updated, report) = self.merge(&content)?;
        std::fs::write(index_path, updated)?;
        Ok(report)
    }

    // ========================================================================
    // Entry Insertion
    // ========================================================================

    /// Build the fixed-shape entry block for this checkpoint.
    fn build_entry(&self) -> String {
        let mut lines = vec![
            format!(
                "\n### ✅ Checkpoint {} - {}",
                self.checkpoint_num, self.description
            ),
            format!(
                "**File**: [{0}](./{0})",
                self.checkpoint_file
            ),
            format!("**Date**: {}", self.date.format("%Y-%m-%d")),
            "**Status**: ⏸️ PAUSED".to_string(),
            format!("**Progress**: {}%", self.progress),
            format!("**Range**: {}", self.task_range),
            String::new(),
            "**Key Achievements**:".to_string(),
        ];

        if self.achievements.is_empty() {
            lines.push("- See checkpoint file for details".to_string());
        } else {
            lines.extend(self.achievements.iter().cloned());
        }

        lines.push(String::new());
        lines.push("**Next**: Resume implementation from next task".to_string());
        lines.push(String::new());

        lines.join("\n")
    }

    /// Insert the entry block immediately before the anchor heading.
    fn insert_entry(&self, content: &str) -> Result<String> {
        let needle = format!("\n{}", FUTURE_CHECKPOINTS_ANCHOR);
        let pos = content
            .find(&needle)
            .ok_or_else(|| WaypointError::missing_anchor(FUTURE_CHECKPOINTS_ANCHOR))?;

        let mut updated = String::with_capacity(content.len() + 256);
        updated.push_str(&content[..pos]);
        updated.push_str(&self.build_entry());
        updated.push_str("\n---\n");
        updated.push_str(&content[pos..]);
        Ok(updated)
    }

    // ========================================================================
    // Best-Effort Patches
    // ========================================================================

    /// Rewrite the pending progress-table row for this checkpoint number.
    ///
    /// Requires the fixed table header; within the table, the row's first
    /// cell must be the bold checkpoint number and its status cell must read
    /// the pending marker. Anything else leaves the text unchanged.
    fn patch_progress_table(&self, content: &str) -> (String, PatchOutcome) {
        let lines: Vec<&str> = content.split('\n').collect();
        let Some(header_idx) = lines
            .iter()
            .position(|line| line.trim() == PROGRESS_TABLE_HEADER)
        else {
            debug!("Progress table header not found, skipping table patch");
            return (content.to_string(), PatchOutcome::Skipped);
        };

        let row_re = Regex::new(&format!(
            r"^\| \*\*{}\*\* \| (.+?) \| \d+% \| (.+?) \| {} \|\s*$",
            regex::escape(&self.checkpoint_num),
            regex::escape(PENDING_MARKER),
        ))
        .unwrap();

        let mut patched: Vec<String> = lines.iter().map(|line| (*line).to_string()).collect();
        for (i, line) in lines.iter().enumerate().skip(header_idx + 1) {
            if !line.starts_with('|') {
                break;
            }
            if let Some(caps) = row_re.captures(line) {
                patched[i] = format!(
                    "| **{}** | {} | {}% | {} | {} |",
                    self.checkpoint_num, &caps[1], self.progress, &caps[2], COMPLETE_MARKER
                );
                return (patched.join("\n"), PatchOutcome::Applied);
            }
        }

        debug!(
            "No pending row for checkpoint {} in progress table",
            self.checkpoint_num
        );
        (content.to_string(), PatchOutcome::Skipped)
    }

    /// Point the "Next Checkpoint Planned" footer at the next checkpoint.
    ///
    /// Overwrites the referenced number, so re-running with the same
    /// checkpoint number reproduces the same footer.
    fn patch_footer(&self, content: &str) -> (String, PatchOutcome) {
        let Ok(num) = self.checkpoint_num.parse::<u32>() else {
            return (content.to_string(), PatchOutcome::Skipped);
        };

        let re =
            Regex::new(r"\*\*Next Checkpoint Planned\*\*: Checkpoint \d+(?: \([^)\n]*\))?")
                .unwrap();
        if !re.is_match(content) {
            debug!("Next-checkpoint footer not found, skipping footer patch");
            return (content.to_string(), PatchOutcome::Skipped);
        }

        let replacement = format!("**Next Checkpoint Planned**: Checkpoint {:02}", num + 1);
        (
            re.replace_all(content, replacement.as_str()).into_owned(),
            PatchOutcome::Applied,
        )
    }

    /// Refresh the "Last Updated" date.
    fn patch_timestamp(&self, content: &str) -> (String, PatchOutcome) {
        let re = Regex::new(r"\*\*Last Updated\*\*: \d{4}-\d{2}-\d{2}").unwrap();
        if !re.is_match(content) {
            debug!("Last-updated label not found, skipping timestamp patch");
            return (content.to_string(), PatchOutcome::Skipped);
        }

        let replacement = format!("**Last Updated**: {}", self.date.format("%Y-%m-%d"));
        (
            re.replace_all(content, replacement.as_str()).into_owned(),
            PatchOutcome::Applied,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE_INDEX: &str = "\
# Checkpoints

## Active Checkpoints

### ✅ Checkpoint 01 - Foundation
**File**: [CHECKPOINT-01_Foundation_T001-T020.md](./CHECKPOINT-01_Foundation_T001-T020.md)

## Progress

| Checkpoint | Tasks | Progress | Duration | Status |
|-----------|-------|----------|----------|--------|
| **01** | T001-T020 | 100% | 2h | ✅ COMPLETE |
| **02** | T021-T039 | 0% | - | ⏳ Pending |

## Future Checkpoints

- Checkpoint 03: polish pass

---
**Next Checkpoint Planned**: Checkpoint 02 (US1 completion)
**Last Updated**: 2026-01-15
";

    fn merger() -> IndexMerger {
        let parsed =
            CheckpointFilename::parse("CHECKPOINT-02_US1-Complete_T021-T039.md").unwrap();
        IndexMerger::from_filename(&parsed, 53)
            .with_date(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap())
    }

    // ========================================================================
    // Filename Parsing Tests
    // ========================================================================

    #[test]
    fn test_parse_filename() {
        let parsed =
            CheckpointFilename::parse("CHECKPOINT-02_US1-Complete_T001-T039.md").unwrap();
        assert_eq!(parsed.number(), "02");
        assert_eq!(parsed.number_value(), 2);
        assert_eq!(parsed.description(), "US1-Complete");
        assert_eq!(parsed.task_range(), "T001-T039");
        assert_eq!(parsed.original(), "CHECKPOINT-02_US1-Complete_T001-T039.md");
    }

    #[test]
    fn test_parse_filename_missing_task_range() {
        let err = CheckpointFilename::parse("CHECKPOINT-02_US1-Complete.md").unwrap_err();
        assert!(matches!(
            err,
            WaypointError::InvalidCheckpointFilename { .. }
        ));
        assert!(err.to_string().contains("CHECKPOINT-02_US1-Complete.md"));
    }

    #[test]
    fn test_parse_filename_rejects_underscored_description() {
        assert!(CheckpointFilename::parse("CHECKPOINT-02_US1_Complete_T001-T039.md").is_err());
        assert!(CheckpointFilename::parse("notes.md").is_err());
    }

    // ========================================================================
    // Achievement Extraction Tests
    // ========================================================================

    #[test]
    fn test_extract_achievements() {
        let report = "\
# Report

## Key Technical Achievements

- Built the analyzer
- Wired up the CLI

## Next Steps
- Not an achievement
";
        assert_eq!(
            extract_achievements(report),
            vec!["- Built the analyzer", "- Wired up the CLI"]
        );
    }

    #[test]
    fn test_extract_achievements_caps_at_four() {
        let report = "\
## Key Technical Achievements
- one
- two
- three
- four
- five
";
        assert_eq!(extract_achievements(report).len(), MAX_ACHIEVEMENTS);
    }

    #[test]
    fn test_extract_achievements_absent_section() {
        assert!(extract_achievements("# Report\n\nNo achievements here.\n").is_empty());
    }

    // ========================================================================
    // Entry Insertion Tests
    // ========================================================================

    #[test]
    fn test_merge_inserts_entry_before_anchor() {
        let (updated, report) = merger().merge(SAMPLE_INDEX).unwrap();

        assert!(report.entry.is_applied());
        let entry_pos = updated
            .find("### ✅ Checkpoint 02 - US1-Complete")
            .unwrap();
        let anchor_pos = updated.find("## Future Checkpoints").unwrap();
        assert!(entry_pos < anchor_pos);

        assert!(updated.contains(
            "**File**: [CHECKPOINT-02_US1-Complete_T021-T039.md](./CHECKPOINT-02_US1-Complete_T021-T039.md)"
        ));
        assert!(updated.contains("**Date**: 2026-08-06"));
        assert!(updated.contains("**Status**: ⏸️ PAUSED"));
        assert!(updated.contains("**Progress**: 53%"));
        assert!(updated.contains("**Range**: T021-T039"));
        // Without achievements the fallback bullet is used.
        assert!(updated.contains("- See checkpoint file for details"));
    }

    #[test]
    fn test_merge_entry_carries_achievements() {
        let (updated, _) = merger()
            .with_achievements(vec!["- Built the analyzer".to_string()])
            .merge(SAMPLE_INDEX)
            .unwrap();
        assert!(updated.contains("**Key Achievements**:\n- Built the analyzer"));
        assert!(!updated.contains("- See checkpoint file for details"));
    }

    #[test]
    fn test_merge_missing_anchor_is_fatal() {
        let err = merger().merge("# Checkpoints\n\nNo anchor here.\n").unwrap_err();
        assert!(matches!(err, WaypointError::MissingAnchor { .. }));
    }

    // ========================================================================
    // Progress Table Patch Tests
    // ========================================================================

    #[test]
    fn test_merge_patches_pending_row() {
        let (updated, report) = merger().merge(SAMPLE_INDEX).unwrap();

        assert!(report.progress_table.is_applied());
        assert!(updated.contains("| **02** | T021-T039 | 53% | - | ✅ COMPLETE |"));
        // The already-complete row is untouched.
        assert!(updated.contains("| **01** | T001-T020 | 100% | 2h | ✅ COMPLETE |"));
    }

    #[test]
    fn test_merge_without_table_is_non_fatal() {
        let index = "# Checkpoints\n\n## Future Checkpoints\n\nnothing else\n";
        let (updated, report) = merger().merge(index).unwrap();
        assert_eq!(report.progress_table, PatchOutcome::Skipped);
        assert!(updated.contains("### ✅ Checkpoint 02"));
    }

    #[test]
    fn test_merge_without_matching_row_is_non_fatal() {
        let index = "\
| Checkpoint | Tasks | Progress | Duration | Status |
|-----------|-------|----------|----------|--------|
| **01** | T001-T020 | 100% | 2h | ✅ COMPLETE |

## Future Checkpoints
";
        let (updated, report) = merger().merge(index).unwrap();
        assert_eq!(report.progress_table, PatchOutcome::Skipped);
        assert!(updated.contains("| **01** | T001-T020 | 100% | 2h | ✅ COMPLETE |"));
    }

    // ========================================================================
    // Footer and Timestamp Patch Tests
    // ========================================================================

    #[test]
    fn test_merge_patches_footer_and_timestamp() {
        let (updated, report) = merger().merge(SAMPLE_INDEX).unwrap();

        assert!(report.footer.is_applied());
        assert!(report.timestamp.is_applied());
        assert!(updated.contains("**Next Checkpoint Planned**: Checkpoint 03"));
        assert!(!updated.contains("US1 completion)"));
        assert!(updated.contains("**Last Updated**: 2026-08-06"));
    }

    #[test]
    fn test_footer_and_timestamp_patches_are_idempotent() {
        let m = merger();
        let (once, _) = m.patch_footer(SAMPLE_INDEX);
        let (twice, outcome) = m.patch_footer(&once);
        assert_eq!(outcome, PatchOutcome::Applied);
        assert_eq!(once, twice);

        let (once, _) = m.patch_timestamp(SAMPLE_INDEX);
        let (twice, outcome) = m.patch_timestamp(&once);
        assert_eq!(outcome, PatchOutcome::Applied);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_without_footer_is_non_fatal() {
        let index = "# Checkpoints\n\n## Future Checkpoints\n";
        let (_, report) = merger().merge(index).unwrap();
        assert_eq!(report.footer, PatchOutcome::Skipped);
        assert_eq!(report.timestamp, PatchOutcome::Skipped);
    }

    // ========================================================================
    // File Merge Tests
    // ========================================================================

    #[test]
    fn test_merge_file_rewrites_in_place() {
        let temp = TempDir::new().unwrap();
        let index_path = temp.path().join("CHECKPOINTS_README.md");
        std::fs::write(&index_path, SAMPLE_INDEX).unwrap();

        let report = merger().merge_file(&index_path).unwrap();
        assert!(report.entry.is_applied());

        let updated = std::fs::read_to_string(&index_path).unwrap();
        assert!(updated.contains("### ✅ Checkpoint 02 - US1-Complete"));
    }

    #[test]
    fn test_merge_file_missing_anchor_leaves_file_unchanged() {
        let temp = TempDir::new().unwrap();
        let index_path = temp.path().join("CHECKPOINTS_README.md");
        let original = "# Checkpoints\n\nNo anchor.\n";
        std::fs::write(&index_path, original).unwrap();

        let err = merger().merge_file(&index_path).unwrap_err();
        assert!(matches!(err, WaypointError::MissingAnchor { .. }));
        assert_eq!(std::fs::read_to_string(&index_path).unwrap(), original);
    }

    #[test]
    fn test_merge_file_missing_index() {
        let err = merger()
            .merge_file(Path::new("/nonexistent/CHECKPOINTS_README.md"))
            .unwrap_err();
        assert!(matches!(err, WaypointError::MissingFile { .. }));
    }
}
