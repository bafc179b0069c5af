//! Testing utilities for the talentflow workspace
//!
//! Shared fixtures: an in-memory stand-in for the remote data service
//! with scripted failures, row builders, and test logging setup.

#![allow(missing_docs)]

use std::collections::{HashMap, VecDeque};
use std::sync::Once;

use parking_lot::Mutex;
use serde_json::{json, Value};

use tf_remote::{Filter, RemoteError, RemoteStore};

/// Adapter operation, for counting and scripted failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Select,
    Insert,
    Update,
    Invoke,
    Upload,
}

#[derive(Default)]
struct Inner {
    tables: HashMap<String, Vec<Value>>,
    uploads: HashMap<String, Vec<u8>>,
    function_results: HashMap<String, VecDeque<Result<Value, String>>>,
    fail_next: HashMap<Op, VecDeque<String>>,
    counts: HashMap<Op, usize>,
    patch_log: Vec<(String, String, Value)>,
    invocations: Vec<(String, Value)>,
}

/// In-memory remote data service.
///
/// Rows live in per-table vectors and are filtered through the same
/// [`Filter`] semantics the adapter exposes. Remote function results are
/// scripted per function name; failures can be queued per operation and
/// fire once each.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a table's rows
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.inner.lock().tables.insert(table.to_string(), rows);
    }

    /// Current rows of a table
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.inner
            .lock()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// One row by id
    pub fn row(&self, table: &str, id: &str) -> Option<Value> {
        self.rows(table)
            .into_iter()
            .find(|row| row.get("id").and_then(Value::as_str) == Some(id))
    }

    /// Queue the next result for a remote function; `Err` strings are
    /// surfaced as service errors
    pub fn script_function(&self, function: &str, result: Result<Value, &str>) {
        self.inner
            .lock()
            .function_results
            .entry(function.to_string())
            .or_default()
            .push_back(result.map_err(str::to_string));
    }

    /// Make the next call of `op` fail with the given service message
    pub fn fail_next(&self, op: Op, message: &str) {
        self.inner
            .lock()
            .fail_next
            .entry(op)
            .or_default()
            .push_back(message.to_string());
    }

    /// How many times `op` was called
    pub fn count(&self, op: Op) -> usize {
        self.inner.lock().counts.get(&op).copied().unwrap_or(0)
    }

    /// Every patch applied to one row, in order
    pub fn patches(&self, table: &str, id: &str) -> Vec<Value> {
        self.inner
            .lock()
            .patch_log
            .iter()
            .filter(|(t, i, _)| t == table && i == id)
            .map(|(_, _, patch)| patch.clone())
            .collect()
    }

    /// Every function invocation, in order
    pub fn invocations(&self) -> Vec<(String, Value)> {
        self.inner.lock().invocations.clone()
    }

    /// Stored blob keys (`bucket/path`), in no particular order
    pub fn uploaded_keys(&self) -> Vec<String> {
        self.inner.lock().uploads.keys().cloned().collect()
    }

    /// Stored blob content
    pub fn uploaded_bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.lock().uploads.get(key).cloned()
    }

    fn enter(&self, op: Op) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        *inner.counts.entry(op).or_default() += 1;
        if let Some(message) = inner
            .fail_next
            .get_mut(&op)
            .and_then(VecDeque::pop_front)
        {
            return Err(RemoteError::from_service_message(message));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RemoteStore for MemoryStore {
    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Value>, RemoteError> {
        self.enter(Op::Select)?;
        let rows = self
            .inner
            .lock()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default();
        Ok(filter.apply(rows))
    }

    async fn insert(&self, table: &str, record: Value) -> Result<Value, RemoteError> {
        self.enter(Op::Insert)?;
        self.inner
            .lock()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), RemoteError> {
        self.enter(Op::Update)?;
        let mut inner = self.inner.lock();
        inner
            .patch_log
            .push((table.to_string(), id.to_string(), patch.clone()));
        let row = inner
            .tables
            .get_mut(table)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|row| row.get("id").and_then(Value::as_str) == Some(id))
            })
            .ok_or_else(|| RemoteError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            })?;
        merge_patch(row, &patch);
        Ok(())
    }

    async fn invoke(&self, function: &str, payload: Value) -> Result<Value, RemoteError> {
        self.enter(Op::Invoke)?;
        let mut inner = self.inner.lock();
        inner.invocations.push((function.to_string(), payload));
        match inner
            .function_results
            .get_mut(function)
            .and_then(VecDeque::pop_front)
        {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(RemoteError::from_service_message(message)),
            None => Err(RemoteError::Service(format!(
                "no scripted result for function {function}"
            ))),
        }
    }

    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> Result<String, RemoteError> {
        self.enter(Op::Upload)?;
        self.inner
            .lock()
            .uploads
            .insert(format!("{bucket}/{path}"), bytes);
        Ok(path.to_string())
    }
}

fn merge_patch(row: &mut Value, patch: &Value) {
    if let (Value::Object(row), Value::Object(patch)) = (row, patch) {
        for (key, value) in patch {
            row.insert(key.clone(), value.clone());
        }
    }
}

/// Project row as the data service stores it
pub fn project_row(id: &str, company_id: &str, name: &str, status: &str, updated_at: &str) -> Value {
    json!({
        "id": id,
        "company_id": company_id,
        "name": name,
        "description": "",
        "status": status,
        "updated_at": updated_at,
    })
}

/// Company row as the data service stores it
pub fn company_row(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name })
}

static INIT_LOGGING: Once = Once::new();

/// Route tracing output through the test harness, once per process
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
