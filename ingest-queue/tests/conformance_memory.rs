use std::collections::HashSet;
use std::sync::Arc;

use ingest_queue::{
    backend::{memory::MemoryBackend, QueueBackend},
    Dispatcher, JobCodec, JobDescriptor, JobId, JobRequest, JsonCodec, QueueConfig, QueueEngine,
    QueueError, StatusEndpoint, StatusRecord,
};
use serde_json::json;

const STATUS_MAP: &str = "csv_job_status";

/// Test factory functions
fn create_test_config() -> QueueConfig {
    QueueConfig::default().with_status_map_key(STATUS_MAP)
}

fn create_engine(backend: &MemoryBackend) -> QueueEngine<MemoryBackend> {
    QueueEngine::new(Arc::new(backend.clone()), create_test_config())
}

fn create_test_descriptor() -> JobDescriptor {
    JobDescriptor::new(
        JobId::from("job-1000-abc12"),
        "images/1_data.csv",
        "Q1",
        "64ab0c9e2f1d3a0012345678",
    )
    .unwrap()
}

/// Stand-in for the external worker: writes a status record for a job
async fn worker_writes(backend: &MemoryBackend, job_id: &str, record: StatusRecord) {
    let raw = JsonCodec.encode_status(&record).unwrap();
    backend.hset(STATUS_MAP, job_id, raw).await.unwrap();
}

/// A1. Concurrently generated ids never collide
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_ids_are_unique() {
    let tasks: Vec<_> = (0..16)
        .map(|_| tokio::spawn(async { (0..1_000).map(|_| JobId::generate()).collect::<Vec<_>>() }))
        .collect();

    let mut all = HashSet::new();
    let mut total = 0;
    for task in tasks {
        for id in task.await.unwrap() {
            assert!(id.as_str().starts_with("job-"));
            all.insert(id);
            total += 1;
        }
    }

    assert_eq!(total, 16_000);
    assert_eq!(all.len(), total);
}

/// A2. Ids generated on plain OS threads never collide either
#[test]
fn test_thread_generated_ids_are_unique() {
    let handles: Vec<_> = (0..8)
        .map(|_| std::thread::spawn(|| (0..2_000).map(|_| JobId::generate()).collect::<Vec<_>>()))
        .collect();

    let ids: Vec<JobId> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
    let unique: HashSet<&JobId> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
}

/// B1. Dispatch never pre-seeds a status record
#[tokio::test]
async fn test_dispatch_then_absent() {
    let backend = MemoryBackend::new();
    let engine = create_engine(&backend);

    let submission = engine
        .dispatcher()
        .submit(JobRequest::new("images/2_data.csv", "Q2", "survey-1"))
        .await
        .unwrap();

    let status = engine
        .status_endpoint()
        .store()
        .get_status(submission.job_id.as_str())
        .await
        .unwrap();
    assert_eq!(status, None);
    assert_eq!(backend.hget(STATUS_MAP, submission.job_id.as_str()).await.unwrap(), None);
}

/// B2. A consumer decoding the queue entry sees the same field values
#[tokio::test]
async fn test_queue_entry_round_trip() {
    let backend = MemoryBackend::new();
    let engine = create_engine(&backend);
    let descriptor = create_test_descriptor();

    engine.dispatcher().dispatch(descriptor.clone()).await.unwrap();

    let entry = backend.pop("csv_processing_job").await.unwrap().unwrap();
    let consumed = JsonCodec.decode_descriptor(&entry).unwrap();
    assert_eq!(consumed, descriptor);
    assert_eq!(consumed.job_id().as_str(), "job-1000-abc12");
    assert_eq!(consumed.object_key(), "images/1_data.csv");
    assert_eq!(consumed.table_name(), "Q1");
    assert_eq!(consumed.group_id(), "64ab0c9e2f1d3a0012345678");
}

/// C1. Reads with no intervening write are identical
#[tokio::test]
async fn test_idempotent_reads() {
    let backend = MemoryBackend::new();
    let endpoint = create_engine(&backend).status_endpoint();
    worker_writes(&backend, "job-1", StatusRecord::new("PROCESSING").with_message("halfway")).await;

    let first = endpoint.check("job-1").await.unwrap();
    let second = endpoint.check("job-1").await.unwrap();
    assert_eq!(first, second);

    let unknown_first = endpoint.check("job-none").await.unwrap();
    let unknown_second = endpoint.check("job-none").await.unwrap();
    assert_eq!(unknown_first, unknown_second);
}

/// C2. Unknown ids are null, malformed records are CorruptStatus
#[tokio::test]
async fn test_unknown_vs_corrupt() {
    let backend = MemoryBackend::new();
    let endpoint = create_engine(&backend).status_endpoint();
    backend.put_raw(STATUS_MAP, "job-corrupt", "{\"status\": ");

    let unknown = endpoint.check("job-unknown").await.unwrap();
    assert_eq!(
        serde_json::to_value(&unknown).unwrap(),
        json!({"jobId": "job-unknown", "status": null})
    );

    let corrupt = endpoint.check("job-corrupt").await.unwrap_err();
    assert!(matches!(corrupt, QueueError::CorruptStatus { ref job_id, .. } if job_id == "job-corrupt"));
}

/// D1. A failed push surfaces as QueueUnavailable and queues nothing
#[tokio::test]
async fn test_fatal_dispatch_failure_propagates() {
    let backend = MemoryBackend::new();
    let dispatcher: Dispatcher<MemoryBackend> = create_engine(&backend).dispatcher();
    backend.set_available(false);

    let result = dispatcher.submit(JobRequest::new("images/3.csv", "Q3", "s")).await;
    assert!(matches!(result, Err(QueueError::QueueUnavailable { .. })));

    backend.set_available(true);
    assert_eq!(backend.len("csv_processing_job").await.unwrap(), 0);
}

/// D2. Status reads during an outage are retryable, not "absent"
#[tokio::test]
async fn test_store_outage_is_distinct_from_absent() {
    let backend = MemoryBackend::new();
    let endpoint: StatusEndpoint<MemoryBackend> = create_engine(&backend).status_endpoint();
    backend.set_available(false);

    let err = endpoint.check("job-1").await.unwrap_err();
    assert!(matches!(err, QueueError::StoreUnavailable(_)));
    assert!(err.is_retryable());
}

/// E1. Submit, consume, complete, check
#[tokio::test]
async fn test_end_to_end_scenario() {
    let backend = MemoryBackend::new();
    let engine = create_engine(&backend);
    let descriptor = create_test_descriptor();

    engine.dispatcher().dispatch(descriptor.clone()).await.unwrap();

    let entries = backend.peek_all("csv_processing_job").await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(JsonCodec.decode_descriptor(&entries[0]).unwrap(), descriptor);

    let pending = engine.status_endpoint().check("job-1000-abc12").await.unwrap();
    assert_eq!(pending.status, None);

    worker_writes(&backend, "job-1000-abc12", StatusRecord::new("COMPLETED")).await;

    let done = engine.status_endpoint().check("job-1000-abc12").await.unwrap();
    assert_eq!(
        serde_json::to_value(&done).unwrap(),
        json!({"jobId": "job-1000-abc12", "status": {"status": "COMPLETED"}})
    );
    assert!(done.state().is_terminal());
}

/// E2. Several dispatchers sharing one store all land in the same FIFO list
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_dispatchers_share_the_queue() {
    let backend = MemoryBackend::new();
    let engine = create_engine(&backend);

    let tasks: Vec<_> = (0..4)
        .map(|n| {
            let dispatcher = engine.dispatcher();
            tokio::spawn(async move {
                for i in 0..25 {
                    dispatcher
                        .submit(JobRequest::new(format!("k-{n}-{i}"), "T", "s"))
                        .await
                        .unwrap();
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let entries = backend.peek_all("csv_processing_job").await.unwrap();
    assert_eq!(entries.len(), 100);

    let ids: HashSet<String> = entries
        .iter()
        .map(|e| JsonCodec.decode_descriptor(e).unwrap().job_id().to_string())
        .collect();
    assert_eq!(ids.len(), 100);

    // Per producer, entries appear in submission order
    for n in 0..4 {
        let prefix = format!("k-{n}-");
        let seq: Vec<usize> = entries
            .iter()
            .map(|e| JsonCodec.decode_descriptor(e).unwrap())
            .filter_map(|d| d.object_key().strip_prefix(&prefix).map(|i| i.parse().unwrap()))
            .collect();
        assert_eq!(seq, (0..25).collect::<Vec<_>>());
    }
}
