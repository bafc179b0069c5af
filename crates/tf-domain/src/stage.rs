//! Status and stage projections for pipeline projects
//!
//! `Stage` is the presentation bucket a project occupies on the board.
//! It is always derived from the persisted [`ProjectStatus`]; there is no
//! independently stored stage. The mapping fans out for `in_progress`
//! (three display columns, one persisted status) and collapses back on
//! writes, so moving a card between the `in_progress` columns is a
//! same-status move.

use serde::{Deserialize, Serialize};

/// Persisted domain status of a pipeline project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Project created, sourcing not started
    Planning,
    /// Actively being worked
    InProgress,
    /// Awaiting final review
    Review,
    /// Done
    Completed,
    /// Abandoned; hidden from the board
    Canceled,
}

impl ProjectStatus {
    /// Numeric progress displayed for this status (0-100)
    #[inline]
    #[must_use]
    pub fn progress(self) -> u8 {
        match self {
            Self::Planning => 10,
            Self::InProgress => 50,
            Self::Review => 80,
            Self::Completed => 100,
            Self::Canceled => 0,
        }
    }

    /// Stable wire name for the status
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation bucket on the Kanban board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Kickoff column
    ProjectStart,
    /// First `in_progress` column
    CandidatesFound,
    /// Second `in_progress` column
    ContactMade,
    /// Third `in_progress` column
    InterviewsScheduled,
    /// Review column
    FinalReview,
    /// Done column
    Completed,
}

impl Stage {
    /// Canonical stage a status displays as after a fresh load.
    ///
    /// `None` means the item has no column (canceled projects are hidden).
    #[inline]
    #[must_use]
    pub fn of(status: ProjectStatus) -> Option<Self> {
        match status {
            ProjectStatus::Planning => Some(Self::ProjectStart),
            ProjectStatus::InProgress => Some(Self::CandidatesFound),
            ProjectStatus::Review => Some(Self::FinalReview),
            ProjectStatus::Completed => Some(Self::Completed),
            ProjectStatus::Canceled => None,
        }
    }

    /// Every column a status may display as
    #[must_use]
    pub fn all_for(status: ProjectStatus) -> &'static [Self] {
        match status {
            ProjectStatus::Planning => &[Self::ProjectStart],
            ProjectStatus::InProgress => &[
                Self::CandidatesFound,
                Self::ContactMade,
                Self::InterviewsScheduled,
            ],
            ProjectStatus::Review => &[Self::FinalReview],
            ProjectStatus::Completed => &[Self::Completed],
            ProjectStatus::Canceled => &[],
        }
    }

    /// The status persisted when a card is dropped on this column
    #[inline]
    #[must_use]
    pub fn status(self) -> ProjectStatus {
        match self {
            Self::ProjectStart => ProjectStatus::Planning,
            Self::CandidatesFound | Self::ContactMade | Self::InterviewsScheduled => {
                ProjectStatus::InProgress
            }
            Self::FinalReview => ProjectStatus::Review,
            Self::Completed => ProjectStatus::Completed,
        }
    }

    /// Stable wire name for the stage
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProjectStart => "project_start",
            Self::CandidatesFound => "candidates_found",
            Self::ContactMade => "contact_made",
            Self::InterviewsScheduled => "interviews_scheduled",
            Self::FinalReview => "final_review",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
