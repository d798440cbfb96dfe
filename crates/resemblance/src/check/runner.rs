use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::{Mutex, mpsc};
use tracing::{Instrument, debug, info_span, warn};

use resemblance::{Comparison, Diagnostics, Pipeline};

use super::SnapshotStatus;
use super::job::CheckJob;
use crate::store::Store;

/// Per-id outcome, with diagnostic images when the comparison failed.
pub struct CheckResult {
    pub status: SnapshotStatus,
    pub diagnostics: Option<Diagnostics>,
    pub elapsed: Duration,
}

impl CheckResult {
    fn error(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            status: SnapshotStatus::Error {
                message: message.into(),
            },
            diagnostics: None,
            elapsed,
        }
    }

    fn from_comparison(comparison: Comparison, elapsed: Duration) -> Self {
        match comparison {
            Comparison::DimensionMismatch { left, right } => Self {
                status: SnapshotStatus::Resized {
                    reference: left,
                    current: right,
                },
                diagnostics: None,
                elapsed,
            },
            Comparison::Analysed(analysis) => {
                let status = if analysis.is_equivalent() {
                    SnapshotStatus::Pass {
                        percentage: analysis.mismatch_percentage,
                    }
                } else {
                    SnapshotStatus::Fail {
                        mismatch_count: analysis.mismatch_count,
                        percentage: analysis.mismatch_percentage,
                    }
                };
                Self {
                    status,
                    diagnostics: analysis.diagnostics,
                    elapsed,
                }
            }
        }
    }
}

/// Check a single id. Decoding and comparison run on the blocking pool.
async fn check_one(job: &CheckJob, store: &Store, pipeline: Pipeline) -> CheckResult {
    let start = Instant::now();
    let Some(reference) = store.read_reference(&job.id) else {
        return CheckResult {
            status: SnapshotStatus::New,
            diagnostics: None,
            elapsed: start.elapsed(),
        };
    };
    let Some(current) = store.read_current(&job.id) else {
        return CheckResult::error("current image could not be read", start.elapsed());
    };

    let scale = job.scale();
    let outcome = tokio::task::spawn_blocking(move || {
        pipeline.run_encoded(&reference, scale, &current, scale)
    })
    .await;

    match outcome {
        Ok(Ok(comparison)) => CheckResult::from_comparison(comparison, start.elapsed()),
        Ok(Err(e)) => {
            warn!(error = %e, "comparison failed");
            CheckResult::error(e.to_string(), start.elapsed())
        }
        Err(e) => {
            warn!(error = %e, "comparison task panicked");
            CheckResult::error("comparison task panicked", start.elapsed())
        }
    }
}

/// Check a list of jobs with `parallel` workers pulling from a shared queue.
///
/// Individual failures are reported per id rather than aborting the run.
///
/// Returns a `Receiver` immediately; results stream in as comparisons finish.
pub fn check_all(
    mut jobs: Vec<CheckJob>,
    store: Store,
    pipeline: Pipeline,
    parallel: usize,
) -> Result<mpsc::Receiver<(CheckJob, CheckResult)>> {
    let (tx, rx) = mpsc::channel(parallel.max(1) * 2);
    if jobs.is_empty() {
        return Ok(rx);
    }

    // Workers pop from the back; reverse so ids start in sorted order.
    jobs.reverse();
    let worker_count = jobs.len().min(parallel.max(1));
    debug!(jobs = jobs.len(), workers = worker_count, "starting check run");

    let queue = Arc::new(Mutex::new(jobs));
    let store = Arc::new(store);

    for idx in 0..worker_count {
        let queue = queue.clone();
        let tx = tx.clone();
        let store = store.clone();
        let span = info_span!("worker", id = idx);
        tokio::spawn(
            async move {
                loop {
                    let (job, remaining) = {
                        let mut q = queue.lock().await;
                        match q.pop() {
                            Some(j) => {
                                let remaining = q.len();
                                (j, remaining)
                            }
                            None => break,
                        }
                    };
                    debug!(job = %job.id, remaining, "picked job");

                    let result = check_one(&job, &store, pipeline).await;
                    if tx.send((job, result)).await.is_err() {
                        warn!("receiver dropped, stopping");
                        break;
                    }
                }
                debug!("queue empty, exiting");
            }
            .instrument(span),
        );
    }

    Ok(rx)
}
