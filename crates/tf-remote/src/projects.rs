//! Typed access to the projects collection

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use tf_domain::{ProjectId, ProjectRecord, ProjectStatus, ViewerScope};

use crate::error::RemoteError;
use crate::store::{Filter, RemoteStore};

/// Collection holding pipeline projects
pub const PROJECTS_TABLE: &str = "projects";

/// Privileged listing function used when the row policy recurses
const ADMIN_PROJECTS_FUNCTION: &str = "admin_list_projects";

/// Repository for pipeline project rows
pub struct ProjectStore {
    store: Arc<dyn RemoteStore>,
}

impl ProjectStore {
    /// Create a repository over the given adapter
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Fetch every project visible to the viewer's scope.
    ///
    /// Company-restricted viewers see their own company's rows; admins see
    /// everything. A policy-recursion failure on the primary query is
    /// retried exactly once through the privileged listing function, with
    /// the scope restriction re-applied client-side.
    pub async fn fetch_visible(
        &self,
        scope: &ViewerScope,
    ) -> Result<Vec<ProjectRecord>, RemoteError> {
        let mut filter = Filter::new().order_desc("updated_at");
        if let ViewerScope::Company(company_id) = scope {
            filter = filter.eq("company_id", company_id.as_str());
        }

        let rows = match self.store.select(PROJECTS_TABLE, &filter).await {
            Ok(rows) => rows,
            Err(err) if err.is_policy_recursion() => {
                tracing::warn!(error = %err, "project query blocked by row policy, using listing function");
                let result = self
                    .store
                    .invoke(ADMIN_PROJECTS_FUNCTION, json!({}))
                    .await?;
                let rows: Vec<Value> = serde_json::from_value(result)?;
                match scope {
                    ViewerScope::Admin => rows,
                    ViewerScope::Company(company_id) => rows
                        .into_iter()
                        .filter(|row| {
                            row.get("company_id").and_then(Value::as_str)
                                == Some(company_id.as_str())
                        })
                        .collect(),
                }
            }
            Err(err) => return Err(err),
        };

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(RemoteError::from))
            .collect()
    }

    /// Persist a status change
    pub async fn set_status(
        &self,
        id: &ProjectId,
        status: ProjectStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RemoteError> {
        let patch = json!({
            "status": status,
            "updated_at": updated_at,
        });
        self.store.update(PROJECTS_TABLE, id.as_str(), patch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tf_domain::CompanyId;

    /// Store whose selects always hit the row-policy recursion
    #[derive(Default)]
    struct RecursivePolicyStore {
        selects: AtomicUsize,
        invokes: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl RemoteStore for RecursivePolicyStore {
        async fn select(&self, _table: &str, _filter: &Filter) -> Result<Vec<Value>, RemoteError> {
            self.selects.fetch_add(1, Ordering::SeqCst);
            Err(RemoteError::from_service_message(
                "infinite recursion detected in policy for relation \"projects\"",
            ))
        }

        async fn insert(&self, _table: &str, _record: Value) -> Result<Value, RemoteError> {
            Err(RemoteError::Service("not supported".to_string()))
        }

        async fn update(&self, _table: &str, _id: &str, _patch: Value) -> Result<(), RemoteError> {
            Err(RemoteError::Service("not supported".to_string()))
        }

        async fn invoke(&self, function: &str, _payload: Value) -> Result<Value, RemoteError> {
            self.invokes.fetch_add(1, Ordering::SeqCst);
            assert_eq!(function, ADMIN_PROJECTS_FUNCTION);
            Ok(json!([
                {
                    "id": "p1",
                    "company_id": "c1",
                    "name": "Backend Engineer",
                    "status": "planning",
                    "updated_at": "2026-01-01T00:00:00Z",
                },
                {
                    "id": "p2",
                    "company_id": "c2",
                    "name": "Sales Lead",
                    "status": "in_progress",
                    "updated_at": "2026-01-02T00:00:00Z",
                },
            ]))
        }

        async fn upload(
            &self,
            _bucket: &str,
            _path: &str,
            _bytes: Vec<u8>,
        ) -> Result<String, RemoteError> {
            Err(RemoteError::Upload("not supported".to_string()))
        }
    }

    #[tokio::test]
    async fn policy_recursion_falls_back_to_listing_function() {
        let store = Arc::new(RecursivePolicyStore::default());
        let projects = ProjectStore::new(store.clone());

        let records = projects.fetch_visible(&ViewerScope::Admin).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(store.selects.load(Ordering::SeqCst), 1);
        assert_eq!(store.invokes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fallback_reapplies_the_company_restriction() {
        let store = Arc::new(RecursivePolicyStore::default());
        let projects = ProjectStore::new(store);

        let scope = ViewerScope::Company(CompanyId::from("c2"));
        let records = projects.fetch_visible(&scope).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, tf_domain::ProjectId::from("p2"));
    }

    /// Store whose selects fail with a non-recursion error
    struct BrokenStore;

    #[async_trait::async_trait]
    impl RemoteStore for BrokenStore {
        async fn select(&self, _table: &str, _filter: &Filter) -> Result<Vec<Value>, RemoteError> {
            Err(RemoteError::Transport("connection reset".to_string()))
        }

        async fn insert(&self, _table: &str, _record: Value) -> Result<Value, RemoteError> {
            unimplemented!()
        }

        async fn update(&self, _table: &str, _id: &str, _patch: Value) -> Result<(), RemoteError> {
            unimplemented!()
        }

        async fn invoke(&self, _function: &str, _payload: Value) -> Result<Value, RemoteError> {
            panic!("transport failures must not reach the fallback");
        }

        async fn upload(
            &self,
            _bucket: &str,
            _path: &str,
            _bytes: Vec<u8>,
        ) -> Result<String, RemoteError> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn other_failures_surface_without_fallback() {
        let projects = ProjectStore::new(Arc::new(BrokenStore));
        let err = projects
            .fetch_visible(&ViewerScope::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
    }
}
