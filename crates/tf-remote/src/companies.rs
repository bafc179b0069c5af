//! Typed access to the companies collection

use std::collections::HashMap;
use std::sync::Arc;

use tf_domain::{Company, CompanyId};

use crate::error::RemoteError;
use crate::store::{Filter, RemoteStore};

/// Collection holding companies
pub const COMPANIES_TABLE: &str = "companies";

/// Repository for company rows
pub struct CompanyStore {
    store: Arc<dyn RemoteStore>,
}

impl CompanyStore {
    /// Create a repository over the given adapter
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Display names keyed by company id, for the board's secondary lookup
    pub async fn names_by_id(&self) -> Result<HashMap<CompanyId, String>, RemoteError> {
        let rows = self.store.select(COMPANIES_TABLE, &Filter::new()).await?;
        let companies: Vec<Company> = rows
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(RemoteError::from))
            .collect::<Result<_, _>>()?;
        Ok(companies
            .into_iter()
            .map(|company| (company.id, company.name))
            .collect())
    }
}
