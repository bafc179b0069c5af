//! The board itself

use std::sync::Arc;

use chrono::Utc;

use tf_cache::ViewCache;
use tf_domain::{CompanyId, ProjectId, Stage, ViewerScope, WorkItem};
use tf_remote::{CompanyStore, ProjectStore, RemoteStore};

use crate::config::BoardConfig;
use crate::error::BoardError;

/// Outcome of a stage-change intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageChange {
    /// The move crossed statuses and the new status was persisted
    Persisted,
    /// The move stayed within one status; only the displayed column moved
    DisplayOnly,
}

/// State container for the pipeline board
///
/// The in-memory list is mutated only by [`PipelineBoard::load`] and
/// [`PipelineBoard::change_stage`]; the UI serializes intents, so no
/// interior locking is needed.
pub struct PipelineBoard {
    projects: ProjectStore,
    companies: CompanyStore,
    cache: ViewCache,
    config: BoardConfig,
    items: Vec<WorkItem>,
    loaded_scope: Option<ViewerScope>,
}

impl PipelineBoard {
    /// Create a board over the given adapter and cache
    #[must_use]
    pub fn new(store: Arc<dyn RemoteStore>, cache: ViewCache) -> Self {
        Self::with_config(store, cache, BoardConfig::default())
    }

    /// Create a board with explicit configuration
    #[must_use]
    pub fn with_config(store: Arc<dyn RemoteStore>, cache: ViewCache, config: BoardConfig) -> Self {
        Self {
            projects: ProjectStore::new(store.clone()),
            companies: CompanyStore::new(store),
            cache,
            config,
            items: Vec::new(),
            loaded_scope: None,
        }
    }

    /// Load every work item visible to the viewer's scope.
    ///
    /// Served from the view cache when an unexpired entry exists;
    /// otherwise the collection is fetched, company names are attached
    /// via the secondary lookup, board projections are computed, and the
    /// result is cached. On remote failure the in-memory list is left
    /// untouched and the error is surfaced.
    pub async fn load(&mut self, scope: ViewerScope) -> Result<&[WorkItem], BoardError> {
        let key = cache_key(&scope);
        if let Some(items) = self.cache.get::<Vec<WorkItem>>(&key).await {
            tracing::debug!(%key, "pipeline served from cache");
            self.items = items;
            self.loaded_scope = Some(scope);
            return Ok(&self.items);
        }

        let records = self
            .projects
            .fetch_visible(&scope)
            .await
            .map_err(BoardError::Load)?;
        let names = self
            .companies
            .names_by_id()
            .await
            .map_err(BoardError::Load)?;

        let now = Utc::now();
        let items: Vec<WorkItem> = records
            .into_iter()
            .map(|record| {
                let company_name = names.get(&record.company_id).cloned();
                WorkItem::from_record(record, company_name, now, self.config.recency_window)
            })
            .collect();

        tracing::info!(count = items.len(), scope = ?scope, "pipeline loaded");
        self.cache.insert(key, items.clone()).await;
        self.items = items;
        self.loaded_scope = Some(scope);
        Ok(&self.items)
    }

    /// Move a card to another column.
    ///
    /// A move whose target column maps back to the item's current status
    /// is display-only: the card changes column locally and nothing is
    /// persisted. A cross-status move is applied optimistically, then
    /// persisted; on failure the entire pre-change list is restored, not
    /// just the one item, because concurrent optimistic edits are not
    /// tracked per item, and the cached collection is invalidated.
    pub async fn change_stage(
        &mut self,
        id: &ProjectId,
        target: Stage,
    ) -> Result<StageChange, BoardError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| BoardError::UnknownItem(id.clone()))?;
        let target_status = target.status();

        if self.items[index].status() == target_status {
            self.items[index].move_display_stage(target);
            tracing::debug!(project = %id, stage = %target, "same-status move, nothing persisted");
            return Ok(StageChange::DisplayOnly);
        }

        let snapshot = self.items.clone();
        let now = Utc::now();
        {
            let item = &mut self.items[index];
            item.set_status(target_status, now, self.config.recency_window);
            item.move_display_stage(target);
        }

        match self.projects.set_status(id, target_status, now).await {
            Ok(()) => {
                if let Some(key) = self.loaded_key() {
                    self.cache.insert(key, self.items.clone()).await;
                }
                tracing::info!(project = %id, status = %target_status, "stage change persisted");
                Ok(StageChange::Persisted)
            }
            Err(err) => {
                tracing::error!(project = %id, error = %err, "stage change failed, reverting board");
                self.items = snapshot;
                if let Some(key) = self.loaded_key() {
                    self.cache.invalidate(&key).await;
                }
                Err(BoardError::Persist(err))
            }
        }
    }

    /// Client-side view over the loaded list; no network I/O.
    ///
    /// `search` matches case-insensitively against item and company
    /// names, `company` exact-matches the owning company, and canceled
    /// items (no column) are always hidden.
    #[must_use]
    pub fn filter(&self, search: Option<&str>, company: Option<&CompanyId>) -> Vec<&WorkItem> {
        let needle = search.map(str::to_lowercase);
        self.items
            .iter()
            .filter(|item| item.stage().is_some())
            .filter(|item| company.map_or(true, |wanted| item.company_id() == wanted))
            .filter(|item| match &needle {
                None => true,
                Some(needle) => {
                    item.name().to_lowercase().contains(needle)
                        || item
                            .company_name()
                            .map_or(false, |name| name.to_lowercase().contains(needle))
                }
            })
            .collect()
    }

    /// The loaded list, in load order
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    fn loaded_key(&self) -> Option<String> {
        self.loaded_scope.as_ref().map(cache_key)
    }
}

fn cache_key(scope: &ViewerScope) -> String {
    match scope {
        ViewerScope::Admin => "projects:admin".to_string(),
        ViewerScope::Company(company_id) => format!("projects:company:{company_id}"),
    }
}
