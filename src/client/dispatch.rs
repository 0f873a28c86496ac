use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::client::api::{Backend, MissReport, ResultReport};

pub enum Job {
    RecordMiss(MissReport),
    PostResult(ResultReport),
}

/// Fire-and-forget delivery of reports. The quiz never waits on a job;
/// failures are logged and dropped.
pub struct Dispatcher {
    tx: Option<mpsc::Sender<Job>>,
    done: mpsc::Receiver<()>,
}

impl Dispatcher {
    pub fn spawn(backend: Arc<dyn Backend>) -> Self {
        let (tx, rx) = mpsc::channel::<Job>();
        let (done_tx, done) = mpsc::channel();

        thread::spawn(move || {
            for job in rx {
                match job {
                    Job::RecordMiss(report) => {
                        if let Err(e) = backend.record_error(&report) {
                            tracing::warn!(error = %e, question = %report.question, "miss not recorded");
                        }
                    }
                    Job::PostResult(report) => match backend.post_result(&report) {
                        Ok(()) => tracing::info!(
                            score = report.score,
                            total = report.total,
                            mode = %report.exercise_type,
                            "result posted"
                        ),
                        Err(e) => tracing::warn!(error = %e, "result not posted"),
                    },
                }
            }
            let _ = done_tx.send(());
        });

        Self { tx: Some(tx), done }
    }

    pub fn send(&self, job: Job) {
        if let Some(tx) = &self.tx {
            if tx.send(job).is_err() {
                tracing::warn!("dispatch worker is gone; job dropped");
            }
        }
    }

    /// Stop accepting jobs and give the queue up to `grace` to drain.
    /// Returns whether every queued job was handled in time.
    pub fn shutdown(mut self, grace: Duration) -> bool {
        self.tx = None;
        let drained = self.done.recv_timeout(grace).is_ok();
        if !drained {
            tracing::warn!(grace_ms = grace.as_millis() as u64, "pending reports abandoned");
        }
        drained
    }
}
