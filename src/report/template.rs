//! Report template placeholders and substitution.
//!
//! The template document carries a fixed, closed vocabulary of placeholder
//! tokens. Rendering is literal token replacement: no nested expansion, no
//! escaping rules. Tokens outside the vocabulary pass through unchanged, and
//! every vocabulary token always receives a value (narrative sections the
//! caller didn't fill render a fixed to-be-completed marker), so internal
//! placeholder syntax never leaks into a delivered report.

/// Placeholder tokens recognized in a report template.
///
/// # Example
///
/// ```
/// use waypoint::report::template::Placeholder;
///
/// assert_eq!(Placeholder::CheckpointNum.tag(), "{CHECKPOINT_NUM}");
/// assert_eq!(Placeholder::PhasesTable.tag(), "{PHASES_TABLE}");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// Two-digit checkpoint number.
    CheckpointNum,
    /// Checkpoint description label.
    PhaseDescription,
    /// Completed task range (e.g. `T001-T039`).
    TaskRange,
    /// Report date.
    Date,
    /// Feature identifier.
    FeatureId,
    /// Total task count.
    TotalTasks,
    /// Completed task count.
    CompletedTasks,
    /// Overall progress percentage, integer-formatted.
    ProgressPercentage,
    /// Rendered per-phase progress table.
    PhasesTable,
    /// Executive summary narrative.
    ExecutiveSummary,
    /// Achievement bullet list.
    KeyAchievements,
    /// Files created/modified narrative.
    FilesCreated,
    /// Rendered knowledge-base learning entries.
    KbEntries,
    /// Next pending task identifier.
    NextTask,
    /// Command to resume implementation.
    ResumeCommand,
    /// To-be-filled narrative sections.
    WhatWasImplemented,
    ServerStatus,
    QualityMetrics,
    RemainingWork,
    PauseRationale,
    TestingInstructions,
    WhatHappensNext,
    EstimatedCompletion,
    Dependencies,
    RiskAssessment,
    Recommendations,
    SuccessCriteria,
    WhatAccomplished,
    WhyGoodStoppingPoint,
    WhatsNext,
    ImplementationLead,
    NextReview,
}

impl Placeholder {
    /// Get the template tag string for this placeholder.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Placeholder::CheckpointNum => "{CHECKPOINT_NUM}",
            Placeholder::PhaseDescription => "{PHASE_DESCRIPTION}",
            Placeholder::TaskRange => "{TASK_RANGE}",
            Placeholder::Date => "{DATE}",
            Placeholder::FeatureId => "{FEATURE_ID}",
            Placeholder::TotalTasks => "{TOTAL_TASKS}",
            Placeholder::CompletedTasks => "{COMPLETED_TASKS}",
            Placeholder::ProgressPercentage => "{PROGRESS_PERCENTAGE}",
            Placeholder::PhasesTable => "{PHASES_TABLE}",
            Placeholder::ExecutiveSummary => "{EXECUTIVE_SUMMARY}",
            Placeholder::KeyAchievements => "{KEY_ACHIEVEMENTS}",
            Placeholder::FilesCreated => "{FILES_CREATED}",
            Placeholder::KbEntries => "{KB_ENTRIES}",
            Placeholder::NextTask => "{NEXT_TASK}",
            Placeholder::ResumeCommand => "{RESUME_COMMAND}",
            Placeholder::WhatWasImplemented => "{WHAT_WAS_IMPLEMENTED}",
            Placeholder::ServerStatus => "{SERVER_STATUS}",
            Placeholder::QualityMetrics => "{QUALITY_METRICS}",
            Placeholder::RemainingWork => "{REMAINING_WORK}",
            Placeholder::PauseRationale => "{PAUSE_RATIONALE}",
            Placeholder::TestingInstructions => "{TESTING_INSTRUCTIONS}",
            Placeholder::WhatHappensNext => "{WHAT_HAPPENS_NEXT}",
            Placeholder::EstimatedCompletion => "{ESTIMATED_COMPLETION}",
            Placeholder::Dependencies => "{DEPENDENCIES}",
            Placeholder::RiskAssessment => "{RISK_ASSESSMENT}",
            Placeholder::Recommendations => "{RECOMMENDATIONS}",
            Placeholder::SuccessCriteria => "{SUCCESS_CRITERIA}",
            Placeholder::WhatAccomplished => "{WHAT_ACCOMPLISHED}",
            Placeholder::WhyGoodStoppingPoint => "{WHY_GOOD_STOPPING_POINT}",
            Placeholder::WhatsNext => "{WHATS_NEXT}",
            Placeholder::ImplementationLead => "{IMPLEMENTATION_LEAD}",
            Placeholder::NextReview => "{NEXT_REVIEW}",
        }
    }

    /// Get all placeholders in the vocabulary.
    #[must_use]
    pub fn all() -> &'static [Placeholder] {
        &[
            Placeholder::CheckpointNum,
            Placeholder::PhaseDescription,
            Placeholder::TaskRange,
            Placeholder::Date,
            Placeholder::FeatureId,
            Placeholder::TotalTasks,
            Placeholder::CompletedTasks,
            Placeholder::ProgressPercentage,
            Placeholder::PhasesTable,
            Placeholder::ExecutiveSummary,
            Placeholder::KeyAchievements,
            Placeholder::FilesCreated,
            Placeholder::KbEntries,
            Placeholder::NextTask,
            Placeholder::ResumeCommand,
            Placeholder::WhatWasImplemented,
            Placeholder::ServerStatus,
            Placeholder::QualityMetrics,
            Placeholder::RemainingWork,
            Placeholder::PauseRationale,
            Placeholder::TestingInstructions,
            Placeholder::WhatHappensNext,
            Placeholder::EstimatedCompletion,
            Placeholder::Dependencies,
            Placeholder::RiskAssessment,
            Placeholder::Recommendations,
            Placeholder::SuccessCriteria,
            Placeholder::WhatAccomplished,
            Placeholder::WhyGoodStoppingPoint,
            Placeholder::WhatsNext,
            Placeholder::ImplementationLead,
            Placeholder::NextReview,
        ]
    }
}

/// Substitute placeholder values into a template.
///
/// Each supplied `(placeholder, value)` pair replaces every occurrence of
/// the placeholder's tag. Content that is not a recognized tag is left
/// untouched.
#[must_use]
pub fn substitute(template: &str, values: &[(Placeholder, String)]) -> String {
    let mut content = template.to_string();
    for (placeholder, value) in values {
        content = content.replace(placeholder.tag(), value);
    }
    content
}
