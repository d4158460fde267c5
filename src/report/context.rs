//! Narrative context for a checkpoint report.
//!
//! The free-text sections of a report (executive summary, achievements,
//! files changed, knowledge-base learnings) come from the operator, not the
//! task list. They are collected once into an immutable [`CheckpointContext`]
//! and passed to the assembler as a single argument.

use std::io::{self, BufRead, Write};

/// A documented learning captured at a checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningEntry {
    pub title: String,
    pub problem: String,
    pub solution: String,
    pub time_saved: String,
}

/// Free-text narrative inputs for one checkpoint report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckpointContext {
    /// Two or three sentences on what was completed.
    pub executive_summary: String,
    /// Achievement bullets, each prefixed with `- `.
    pub achievements: Vec<String>,
    /// Brief overview of files created or modified.
    pub files_summary: String,
    /// Knowledge-base learning entries.
    pub learnings: Vec<LearningEntry>,
}

impl CheckpointContext {
    /// An empty context. Narrative placeholders render as empty or
    /// fallback text.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the executive summary.
    #[must_use]
    pub fn with_executive_summary(mut self, summary: impl Into<String>) -> Self {
        self.executive_summary = summary.into();
        self
    }

    /// Set the achievement bullets. A `- ` prefix is added where missing.
    #[must_use]
    pub fn with_achievements(mut self, achievements: Vec<String>) -> Self {
        self.achievements = achievements.into_iter().map(bulleted).collect();
        self
    }

    /// Set the files-changed summary.
    #[must_use]
    pub fn with_files_summary(mut self, summary: impl Into<String>) -> Self {
        self.files_summary = summary.into();
        self
    }

    /// Set the learning entries.
    #[must_use]
    pub fn with_learnings(mut self, learnings: Vec<LearningEntry>) -> Self {
        self.learnings = learnings;
        self
    }
}

fn bulleted(line: String) -> String {
    if line.starts_with('-') {
        line
    } else {
        format!("- {}", line)
    }
}

/// Collect a [`CheckpointContext`] interactively.
///
/// Prompts are written to `out` and answers read line by line from `input`,
/// mirroring a terminal session: one line for the executive summary, one
/// achievement per line terminated by a blank line, one line for the files
/// summary, then a count of learning entries followed by title/problem/
/// solution/time-saved lines for each (a title of `skip` skips that entry).
///
/// # Errors
///
/// Returns an error only when reading or writing the streams fails.
pub fn collect_interactive(
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<CheckpointContext> {
    writeln!(out, "\n{}", "=".repeat(60))?;
    writeln!(out, "Checkpoint Context Collection")?;
    writeln!(out, "{}\n", "=".repeat(60))?;

    writeln!(
        out,
        "Executive Summary (2-3 sentences about what was completed):"
    )?;
    let executive_summary = read_line(input, out)?;

    writeln!(out, "\nKey achievements (one per line, blank line to finish):")?;
    let mut achievements = Vec::new();
    loop {
        let line = read_line(input, out)?;
        if line.is_empty() {
            if achievements.is_empty() {
                continue;
            }
            break;
        }
        achievements.push(bulleted(line));
    }

    writeln!(out, "\nFiles created/modified summary (brief overview):")?;
    let files_summary = read_line(input, out)?;

    writeln!(out, "\nNumber of knowledge base entries captured (0 for none):")?;
    let count_line = read_line(input, out)?;
    let count: usize = count_line.parse().unwrap_or(0);

    let mut learnings = Vec::new();
    for i in 0..count {
        writeln!(out, "\n--- Knowledge Base Entry {}/{} ---", i + 1, count)?;

        writeln!(out, "Title:")?;
        let title = read_line(input, out)?;
        if title.eq_ignore_ascii_case("skip") {
            continue;
        }

        writeln!(out, "Problem (1-2 sentences):")?;
        let problem = read_line(input, out)?;

        writeln!(out, "Solution (2-3 sentences):")?;
        let solution = read_line(input, out)?;

        writeln!(out, "Time saved (e.g. '30 minutes', '2 hours'):")?;
        let time_saved = read_line(input, out)?;

        learnings.push(LearningEntry {
            title,
            problem,
            solution,
            time_saved,
        });
    }

    Ok(CheckpointContext {
        executive_summary,
        achievements,
        files_summary,
        learnings,
    })
}

fn read_line(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<String> {
    write!(out, "> ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input stream closed during context collection",
        ));
    }
    Ok(line.trim().to_string())
}
