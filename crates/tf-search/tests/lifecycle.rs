//! End-to-end job lifecycles against the in-memory data service

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use tf_cache::ViewCache;
use tf_domain::{JobStatus, SearchKind, UserId};
use tf_remote::SEARCH_JOBS_TABLE;
use tf_search::{JobInput, SearchError, SearchStrings, WriteBack};
use tf_test_utils::{init_test_logging, MemoryStore, Op};

const TEXT_FN: &str = "generate-search-string";
const CRAWLER_FN: &str = "process-search-website";
const PDF_FN: &str = "process-search-pdf";

fn orchestrator() -> (Arc<MemoryStore>, SearchStrings) {
    init_test_logging();
    let store = Arc::new(MemoryStore::new());
    let search = SearchStrings::new(store.clone(), ViewCache::new());
    (store, search)
}

fn owner() -> UserId {
    UserId::from("u1")
}

#[tokio::test]
async fn text_submission_completes_inline() {
    let (store, search) = orchestrator();
    store.script_function(
        TEXT_FN,
        Ok(json!({ "generated_string": "(\"Java\" AND \"Senior\")" })),
    );

    let job = search
        .submit(
            &owner(),
            None,
            SearchKind::Recruiting,
            JobInput::Text("Senior Java Developer with 5 years experience".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
    assert_eq!(
        job.generated_string.as_deref(),
        Some("(\"Java\" AND \"Senior\")")
    );
    assert!(job.is_processed);
    assert!(job.processed_at.is_some());

    // The record went through new -> processing(0) -> completed(100)
    let patches = store.patches(SEARCH_JOBS_TABLE, job.id.as_str());
    assert_eq!(patches[0]["status"], "processing");
    assert_eq!(patches[0]["progress"], 0);
    let last = patches.last().unwrap();
    assert_eq!(last["status"], "completed");
    assert_eq!(last["progress"], 100);

    let row = store.row(SEARCH_JOBS_TABLE, job.id.as_str()).unwrap();
    assert_eq!(row["status"], "completed");
    assert_eq!(row["is_processed"], true);
}

#[tokio::test]
async fn text_failure_is_recorded_and_surfaced() {
    let (store, search) = orchestrator();
    store.script_function(TEXT_FN, Err("quota exceeded"));

    let err = search
        .submit(
            &owner(),
            None,
            SearchKind::Recruiting,
            JobInput::Text("Senior Java Developer".to_string()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Remote(_)));

    // Both the caller and the record were informed
    let rows = store.rows(SEARCH_JOBS_TABLE);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], "failed");
    assert_eq!(rows[0]["progress"], 100);
    assert!(rows[0]["error"]
        .as_str()
        .unwrap()
        .contains("quota exceeded"));
    assert!(rows[0]["generated_string"].is_null());
}

#[tokio::test]
async fn empty_text_is_rejected_before_any_insert() {
    let (store, search) = orchestrator();

    let err = search
        .submit(
            &owner(),
            None,
            SearchKind::Recruiting,
            JobInput::Text("   ".to_string()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::Validation(_)));
    assert!(store.rows(SEARCH_JOBS_TABLE).is_empty());
    assert_eq!(store.count(Op::Insert), 0);
}

#[tokio::test]
async fn missing_owner_is_rejected_before_any_insert() {
    let (store, search) = orchestrator();

    let err = search
        .submit(
            &UserId::from(""),
            None,
            SearchKind::LeadGeneration,
            JobInput::Text("industrial pumps wholesale".to_string()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::Validation(_)));
    assert_eq!(store.count(Op::Insert), 0);
}

#[tokio::test]
async fn website_jobs_return_mid_flight_and_complete_out_of_band() {
    let (store, search) = orchestrator();
    store.script_function(CRAWLER_FN, Ok(json!(null)));

    let job = search
        .submit(
            &owner(),
            None,
            SearchKind::LeadGeneration,
            JobInput::Website("https://example.com/customers".to_string()),
        )
        .await
        .unwrap();

    // The start call went out; the job is parked mid-flight
    assert_eq!(job.status, JobStatus::Processing);
    assert_eq!(job.progress, 20);
    let invocations = store.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].0, CRAWLER_FN);
    assert_eq!(invocations[0].1["url"], "https://example.com/customers");

    // The remote processor finishes later
    let outcome = search
        .record_completion(&job.id, job.attempt, "(\"pumps\" OR \"valves\")")
        .await
        .unwrap();
    assert_eq!(outcome, WriteBack::Applied);

    let job = search.fetch(&job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
    assert_eq!(job.generated_string.as_deref(), Some("(\"pumps\" OR \"valves\")"));
}

#[tokio::test]
async fn pdf_jobs_upload_then_dispatch() {
    let (store, search) = orchestrator();
    store.script_function(PDF_FN, Ok(json!(null)));

    let job = search
        .submit(
            &owner(),
            None,
            SearchKind::Recruiting,
            JobInput::Pdf {
                filename: "role-profile.pdf".to_string(),
                bytes: b"%PDF-1.7 fake".to_vec(),
            },
        )
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Processing);
    assert_eq!(job.progress, 50);

    // Blob stored under a job-derived path, and that path sent onward
    let expected_path = format!("{}/role-profile.pdf", job.id);
    assert_eq!(job.input_pdf_path.as_deref(), Some(expected_path.as_str()));
    assert_eq!(
        store.uploaded_keys(),
        vec![format!("search-strings/{expected_path}")]
    );
    assert_eq!(
        store.uploaded_bytes(&format!("search-strings/{expected_path}")),
        Some(b"%PDF-1.7 fake".to_vec())
    );
    let invocations = store.invocations();
    assert_eq!(invocations[0].0, PDF_FN);
    assert_eq!(invocations[0].1["path"], expected_path.as_str());

    // Progress milestones: 0 on processing, 30 after upload, 50 after dispatch
    let patches = store.patches(SEARCH_JOBS_TABLE, job.id.as_str());
    let milestones: Vec<u64> = patches
        .iter()
        .filter_map(|patch| patch.get("progress").and_then(serde_json::Value::as_u64))
        .collect();
    assert_eq!(milestones, vec![0, 30, 50]);
}

#[tokio::test]
async fn cancel_sticks_against_a_late_write_back() {
    let (store, search) = orchestrator();
    store.script_function(CRAWLER_FN, Ok(json!(null)));

    let job = search
        .submit(
            &owner(),
            None,
            SearchKind::Recruiting,
            JobInput::Website("https://example.com/jobs".to_string()),
        )
        .await
        .unwrap();

    let canceled = search.cancel(&job.id).await.unwrap();
    assert_eq!(canceled.status, JobStatus::Canceled);

    // The crawler finishes anyway; its result is dropped without error
    let outcome = search
        .record_completion(&job.id, job.attempt, "(\"too\" AND \"late\")")
        .await
        .unwrap();
    assert_eq!(outcome, WriteBack::Ignored);

    let row = store.row(SEARCH_JOBS_TABLE, job.id.as_str()).unwrap();
    assert_eq!(row["status"], "canceled");
    assert!(row["generated_string"].is_null());
}

#[tokio::test]
async fn retry_starts_a_fresh_attempt_and_fences_stale_results() {
    let (store, search) = orchestrator();
    store.script_function(CRAWLER_FN, Err("crawler offline"));

    let err = search
        .submit(
            &owner(),
            None,
            SearchKind::Recruiting,
            JobInput::Website("https://example.com/jobs".to_string()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Remote(_)));

    let failed: Vec<_> = store.rows(SEARCH_JOBS_TABLE);
    let id = tf_domain::JobId::from(failed[0]["id"].as_str().unwrap());

    store.script_function(CRAWLER_FN, Ok(json!(null)));
    let job = search.retry(&id).await.unwrap();
    assert_eq!(job.attempt, 2);
    assert_eq!(job.status, JobStatus::Processing);
    assert_eq!(job.progress, 20);
    assert!(job.error.is_none());

    // A write-back from the first attempt arrives late and is dropped
    let stale = search
        .record_failure(&id, 1, "first attempt gave up")
        .await
        .unwrap();
    assert_eq!(stale, WriteBack::Ignored);

    // The current attempt still completes
    let outcome = search
        .record_completion(&id, 2, "(\"engineer\")")
        .await
        .unwrap();
    assert_eq!(outcome, WriteBack::Applied);
    let job = search.fetch(&id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
}

#[tokio::test]
async fn pdf_jobs_cannot_be_retried() {
    let (store, search) = orchestrator();
    store.script_function(PDF_FN, Ok(json!(null)));

    let job = search
        .submit(
            &owner(),
            None,
            SearchKind::Recruiting,
            JobInput::Pdf {
                filename: "cv.pdf".to_string(),
                bytes: vec![1, 2, 3],
            },
        )
        .await
        .unwrap();

    let err = search.retry(&job.id).await.unwrap_err();
    assert!(matches!(
        err,
        SearchError::RetryUnsupported(tf_domain::InputSource::Pdf)
    ));
}

#[tokio::test]
async fn retrying_a_gutted_record_fails_the_job_descriptively() {
    let (store, search) = orchestrator();

    // A website job whose input was blanked out after the fact
    store.seed(
        SEARCH_JOBS_TABLE,
        vec![json!({
            "id": "j-empty",
            "user_id": "u1",
            "kind": "recruiting",
            "source": "website",
            "input_url": "",
            "status": "failed",
            "progress": 100,
            "attempt": 1,
            "error": "crawler offline",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z",
        })],
    );

    let id = tf_domain::JobId::from("j-empty");
    let err = search.retry(&id).await.unwrap_err();
    assert!(matches!(err, SearchError::SourceMismatch(_)));

    let row = store.row(SEARCH_JOBS_TABLE, "j-empty").unwrap();
    assert_eq!(row["status"], "failed");
    assert_eq!(row["progress"], 100);
    assert!(row["error"].as_str().unwrap().contains("payload"));
}

#[tokio::test]
async fn job_lists_are_cached_until_the_next_mutation() {
    let (store, search) = orchestrator();
    store.script_function(TEXT_FN, Ok(json!({ "generated_string": "(\"rust\")" })));

    let user = owner();
    let job = search
        .submit(
            &user,
            None,
            SearchKind::Recruiting,
            JobInput::Text("Rust Engineer".to_string()),
        )
        .await
        .unwrap();

    let first = search.list_for_user(&user).await.unwrap();
    assert_eq!(first.len(), 1);
    let selects = store.count(Op::Select);

    // Second read hits the cache
    let second = search.list_for_user(&user).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(store.count(Op::Select), selects);

    // A mutation invalidates the list
    search.cancel(&job.id).await.unwrap();
    let third = search.list_for_user(&user).await.unwrap();
    assert!(store.count(Op::Select) > selects);
    assert_eq!(third[0].status, JobStatus::Canceled);
}
