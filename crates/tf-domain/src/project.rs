//! Pipeline work items and their view projections

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CompanyId, ProjectId};
use crate::stage::{ProjectStatus, Stage};

/// Persisted fields of a pipeline project, as stored by the data service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Opaque id
    pub id: ProjectId,
    /// Owning company
    pub company_id: CompanyId,
    /// Display name
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Persisted status; the only field this core mutates
    pub status: ProjectStatus,
    /// Last mutation time
    pub updated_at: DateTime<Utc>,
}

/// Visibility scope of the current viewer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewerScope {
    /// Unrestricted: every company's projects
    Admin,
    /// Restricted to a single company
    Company(CompanyId),
}

/// A project as shown on the board: the persisted record plus derived
/// presentation state.
///
/// `stage`, `progress` and `recently_updated` are projections of the
/// record. They are recomputed on construction and after every status
/// mutation, and are never written back to the data service.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    record: ProjectRecord,
    company_name: Option<String>,
    stage: Option<Stage>,
    progress: u8,
    recently_updated: bool,
}

impl WorkItem {
    /// Build a work item from a persisted record, projecting board state.
    ///
    /// `company_name` comes from the secondary company lookup performed at
    /// load time; `recency_window` bounds the "has recent update" badge.
    #[must_use]
    pub fn from_record(
        record: ProjectRecord,
        company_name: Option<String>,
        now: DateTime<Utc>,
        recency_window: Duration,
    ) -> Self {
        let stage = Stage::of(record.status);
        let progress = record.status.progress();
        let recently_updated = is_recent(record.updated_at, recency_window, now);
        Self {
            record,
            company_name,
            stage,
            progress,
            recently_updated,
        }
    }

    /// Opaque project id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ProjectId {
        &self.record.id
    }

    /// Owning company id
    #[inline]
    #[must_use]
    pub fn company_id(&self) -> &CompanyId {
        &self.record.company_id
    }

    /// Display name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Free-text description
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.record.description
    }

    /// Owning company's display name, if the lookup resolved it
    #[inline]
    #[must_use]
    pub fn company_name(&self) -> Option<&str> {
        self.company_name.as_deref()
    }

    /// Persisted status
    #[inline]
    #[must_use]
    pub fn status(&self) -> ProjectStatus {
        self.record.status
    }

    /// Column the card currently sits in; `None` hides it
    #[inline]
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    /// Derived progress (0-100)
    #[inline]
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Whether the item changed inside the recency window
    #[inline]
    #[must_use]
    pub fn recently_updated(&self) -> bool {
        self.recently_updated
    }

    /// Last mutation time
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.record.updated_at
    }

    /// The underlying persisted record
    #[inline]
    #[must_use]
    pub fn record(&self) -> &ProjectRecord {
        &self.record
    }

    /// Apply a status change and recompute every derived projection.
    pub fn set_status(&mut self, status: ProjectStatus, now: DateTime<Utc>, window: Duration) {
        self.record.status = status;
        self.record.updated_at = now;
        self.stage = Stage::of(status);
        self.progress = status.progress();
        self.recently_updated = is_recent(self.record.updated_at, window, now);
    }

    /// Move the card to another column of the same status.
    ///
    /// Returns `false` when the column belongs to a different status; such
    /// a move is a status change and must go through [`WorkItem::set_status`].
    pub fn move_display_stage(&mut self, stage: Stage) -> bool {
        if stage.status() == self.record.status {
            self.stage = Some(stage);
            true
        } else {
            false
        }
    }
}

/// Whether `updated_at` falls inside the window ending at `now`
#[inline]
#[must_use]
pub fn is_recent(updated_at: DateTime<Utc>, window: Duration, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(updated_at) < window
}
