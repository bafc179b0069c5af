//! The abstract operations this core consumes from the data service
//!
//! The wire format is owned by the external client; this trait only fixes
//! the shapes the state containers rely on. Rows travel as JSON values
//! and are decoded into typed records by the repositories.

use serde_json::Value;

use crate::error::RemoteError;

/// Remote data service operations
///
/// Every method is a suspension point. Implementations surface failures
/// as [`RemoteError`] and never retry on their own.
#[async_trait::async_trait]
pub trait RemoteStore: Send + Sync {
    /// Read rows from a collection
    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Value>, RemoteError>;

    /// Insert one record, returning the stored row
    async fn insert(&self, table: &str, record: Value) -> Result<Value, RemoteError>;

    /// Patch the row with the given id; absent patch fields stay untouched
    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), RemoteError>;

    /// Invoke a remote function with a JSON payload
    async fn invoke(&self, function: &str, payload: Value) -> Result<Value, RemoteError>;

    /// Upload a blob, returning the stored path
    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> Result<String, RemoteError>;
}

/// Result ordering for a collection read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column to order on
    pub column: String,
    /// Ascending when true
    pub ascending: bool,
}

/// Conjunctive equality filter with optional ordering
///
/// This mirrors the slice of the data service's query surface the portal
/// actually uses: equality matches ANDed together, one order column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    matches: Vec<(String, Value)>,
    order: Option<OrderBy>,
}

impl Filter {
    /// An unrestricted filter
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `column == value`
    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.matches.push((column.into(), value.into()));
        self
    }

    /// Order ascending on `column`
    #[must_use]
    pub fn order_asc(mut self, column: impl Into<String>) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            ascending: true,
        });
        self
    }

    /// Order descending on `column`
    #[must_use]
    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            ascending: false,
        });
        self
    }

    /// The equality constraints
    #[inline]
    #[must_use]
    pub fn constraints(&self) -> &[(String, Value)] {
        &self.matches
    }

    /// The requested ordering
    #[inline]
    #[must_use]
    pub fn ordering(&self) -> Option<&OrderBy> {
        self.order.as_ref()
    }

    /// Whether a row satisfies every equality constraint
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        self.matches
            .iter()
            .all(|(column, expected)| row.get(column) == Some(expected))
    }

    /// Filter and order rows the way the data service would.
    ///
    /// Shared by in-process backends so filter semantics live in exactly
    /// one place.
    #[must_use]
    pub fn apply(&self, rows: Vec<Value>) -> Vec<Value> {
        let mut rows: Vec<Value> = rows.into_iter().filter(|row| self.matches(row)).collect();
        if let Some(order) = &self.order {
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(&order.column), b.get(&order.column));
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }
        rows
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
