//! Named line patterns for checklist parsing.
//!
//! All structural detection rules for the task-list document live here so
//! they can be tested in one place. The grammar is deliberately small:
//! a task line and a phase heading. Everything else in the document is
//! free text and is ignored.

use regex::Regex;

/// Completion mark for a finished task. Case-sensitive.
pub const COMPLETE_MARK: &str = "X";

/// Compiled line patterns for the task-list grammar.
///
/// # Example
///
/// ```
/// use waypoint::analyzer::patterns::LinePatterns;
///
/// let patterns = LinePatterns::new();
/// let caps = patterns.task_line.captures("- [X] T001 Setup project").unwrap();
/// assert_eq!(&caps[1], "X");
/// assert_eq!(&caps[2], "T001");
/// ```
#[derive(Debug, Clone)]
pub struct LinePatterns {
    /// A task line: optional indentation, a `- ` list marker, a completion
    /// marker (`[X]` or `[ ]`), and a `T`-prefixed numeric identifier.
    ///
    /// Captures: 1 = completion mark (`X` or space), 2 = task identifier.
    pub task_line: Regex,
    /// A phase heading: `## Phase <digits>:<title>`.
    ///
    /// Captures: 1 = phase name including the `Phase N:` prefix.
    pub phase_heading: Regex,
}

impl LinePatterns {
    /// Compile the grammar. The patterns are literals, so compilation
    /// cannot fail.
    #[must_use]
    pub fn new() -> Self {
        Self {
            task_line: Regex::new(r"(?m)^\s*- \[([X ])\] (T\d+)").unwrap(),
            phase_heading: Regex::new(r"(?m)^## (Phase \d+:[^#\n]+)").unwrap(),
        }
    }
}

impl Default for LinePatterns {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_line_complete() {
        let p = LinePatterns::new();
        let caps = p.task_line.captures("- [X] T001 Setup").unwrap();
        assert_eq!(&caps[1], "X");
        assert_eq!(&caps[2], "T001");
    }

    #[test]
    fn test_task_line_incomplete() {
        let p = LinePatterns::new();
        let caps = p.task_line.captures("  - [ ] T042 Write tests").unwrap();
        assert_eq!(&caps[1], " ");
        assert_eq!(&caps[2], "T042");
    }

    #[test]
    fn test_task_line_rejects_lowercase_mark() {
        // Completion marks are case-sensitive: `[x]` is not a task line at all.
        let p = LinePatterns::new();
        assert!(p.task_line.captures("- [x] T001 Setup").is_none());
    }

    #[test]
    fn test_task_line_rejects_missing_identifier() {
        let p = LinePatterns::new();
        assert!(p.task_line.captures("- [X] Setup project").is_none());
        assert!(p.task_line.captures("- [X] task T001").is_none());
    }

    #[test]
    fn test_task_line_rejects_plain_bullet() {
        let p = LinePatterns::new();
        assert!(p.task_line.captures("- T001 no checkbox here").is_none());
        assert!(p.task_line.captures("* [X] T001 wrong marker").is_none());
    }

    #[test]
    fn test_phase_heading_matches() {
        let p = LinePatterns::new();
        let caps = p.phase_heading.captures("## Phase 1: Setup").unwrap();
        assert_eq!(&caps[1], "Phase 1: Setup");
    }

    #[test]
    fn test_phase_heading_rejects_wrong_level() {
        let p = LinePatterns::new();
        assert!(p.phase_heading.captures("# Phase 1: Setup").is_none());
        assert!(p.phase_heading.captures("### Phase 1: Setup").is_none());
    }

    #[test]
    fn test_phase_heading_rejects_missing_number() {
        let p = LinePatterns::new();
        assert!(p.phase_heading.captures("## Phase: Setup").is_none());
        assert!(p.phase_heading.captures("## Setup").is_none());
    }

    #[test]
    fn test_multiline_matching() {
        let p = LinePatterns::new();
        let doc = "## Phase 1: A\n- [X] T001\n## Phase 2: B\n- [ ] T002\n";
        assert_eq!(p.phase_heading.find_iter(doc).count(), 2);
        assert_eq!(p.task_line.find_iter(doc).count(), 2);
    }
}
