// Parallel sample collection. Each worker owns one connection on a blocking
// thread and pulls the next interface index from the pool when it is idle.
// Any worker failure aborts the whole collection.

use crate::counter_source::{CounterSource, SourceConnection};
use crate::error::{CheckError, Result};
use crate::models::{Sample, SampleCollection};
use crate::sample_store::now_secs;
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::instrument;

enum Request {
    Fetch(u32),
    Stop,
}

enum Reply {
    /// Connected and idle; asking for the first index.
    Ready,
    Sample(Sample),
    Failed(CheckError),
}

struct Response {
    worker: usize,
    reply: Reply,
}

struct WorkerHandle {
    tx: mpsc::Sender<Request>,
    join: JoinHandle<()>,
}

/// Interface indexes the device reports, via one short-lived connection.
#[instrument(skip(source), fields(pool = "collect", operation = "list_indexes"))]
pub async fn list_indexes<S: CounterSource>(source: Arc<S>) -> Result<Vec<u32>> {
    tokio::task::spawn_blocking(move || {
        let mut conn = source.connect()?;
        let indexes = conn.interface_indexes();
        conn.close();
        indexes
    })
    .await
    .map_err(|e| CheckError::connection(format!("index listing task: {}", e)))?
}

/// Collects one sample per index. `parallelism <= 1` runs on a single connection.
#[instrument(skip(source, indexes), fields(pool = "collect", operation = "collect", indexes_count = indexes.len()))]
pub async fn collect<S: CounterSource>(
    source: Arc<S>,
    indexes: &[u32],
    parallelism: usize,
) -> Result<SampleCollection> {
    let unique: BTreeSet<u32> = indexes.iter().copied().collect();
    if unique.is_empty() {
        return Ok(SampleCollection::new());
    }
    let workers = parallelism.min(unique.len());
    if workers <= 1 {
        collect_sequential(source, unique.into_iter().collect()).await
    } else {
        collect_parallel(source, unique.into_iter().collect(), workers).await
    }
}

async fn collect_sequential<S: CounterSource>(
    source: Arc<S>,
    indexes: Vec<u32>,
) -> Result<SampleCollection> {
    tokio::task::spawn_blocking(move || {
        let mut conn = source.connect()?;
        let mut out = SampleCollection::new();
        for index in indexes {
            let fields = conn.fetch(index)?;
            out.insert(index, Sample::new(index, now_secs(), fields));
        }
        conn.close();
        Ok(out)
    })
    .await
    .map_err(|e| CheckError::connection(format!("collector task: {}", e)))?
}

async fn collect_parallel<S: CounterSource>(
    source: Arc<S>,
    indexes: Vec<u32>,
    workers: usize,
) -> Result<SampleCollection> {
    let expected = indexes.len();
    let mut pending: VecDeque<u32> = indexes.into();
    let (resp_tx, mut resp_rx) = mpsc::channel::<Response>(workers);

    let mut handles: Vec<WorkerHandle> = (0..workers)
        .map(|id| spawn_worker(id, source.clone(), resp_tx.clone()))
        .collect();
    // Only workers hold senders now; recv() yields None once all of them are gone.
    drop(resp_tx);

    let mut out = SampleCollection::new();
    let mut running = workers;
    let mut failure: Option<CheckError> = None;

    while running > 0 {
        let Some(Response { worker, reply }) = resp_rx.recv().await else {
            failure = Some(CheckError::connection("worker channel closed unexpectedly"));
            break;
        };
        match reply {
            Reply::Ready => {}
            Reply::Sample(sample) => {
                if out.insert(sample.index, sample).is_some() {
                    failure = Some(CheckError::connection("duplicate sample from workers"));
                    break;
                }
            }
            Reply::Failed(e) => {
                tracing::warn!(worker, error = %e, "collector worker failed");
                failure = Some(e);
                break;
            }
        }
        let next = match pending.pop_front() {
            Some(index) => Request::Fetch(index),
            None => {
                running -= 1;
                Request::Stop
            }
        };
        if handles[worker].tx.send(next).await.is_err() {
            failure = Some(CheckError::connection(format!(
                "worker {} stopped accepting requests",
                worker
            )));
            break;
        }
    }

    // Dropping the request senders stops any worker still waiting for work.
    let joins: Vec<JoinHandle<()>> = handles.drain(..).map(|h| h.join).collect();
    drop(resp_rx);
    for join in joins {
        if let Err(e) = join.await
            && failure.is_none()
        {
            failure = Some(CheckError::connection(format!("collector worker: {}", e)));
        }
    }

    if let Some(e) = failure {
        return Err(e);
    }
    if out.len() != expected {
        return Err(CheckError::connection(format!(
            "collected {} of {} interfaces",
            out.len(),
            expected
        )));
    }
    tracing::debug!(samples_count = out.len(), workers, "collection complete");
    Ok(out)
}

fn spawn_worker<S: CounterSource>(
    id: usize,
    source: Arc<S>,
    resp_tx: mpsc::Sender<Response>,
) -> WorkerHandle {
    let (tx, mut rx) = mpsc::channel::<Request>(1);
    let join = tokio::task::spawn_blocking(move || {
        let send = |reply: Reply| resp_tx.blocking_send(Response { worker: id, reply }).is_ok();

        let mut conn = match source.connect() {
            Ok(c) => c,
            Err(e) => {
                send(Reply::Failed(e));
                return;
            }
        };
        if !send(Reply::Ready) {
            conn.close();
            return;
        }
        while let Some(Request::Fetch(index)) = rx.blocking_recv() {
            let outcome = match conn.fetch(index) {
                Ok(fields) => Reply::Sample(Sample::new(index, now_secs(), fields)),
                Err(e) => Reply::Failed(e),
            };
            let failed = matches!(outcome, Reply::Failed(_));
            if !send(outcome) || failed {
                break;
            }
        }
        conn.close();
        tracing::trace!(worker = id, "collector worker stopped");
    });
    WorkerHandle { tx, join }
}
