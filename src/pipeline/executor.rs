use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info, warn};
use serde::Serialize;

use crate::bounds::TreewidthHeuristics;
use crate::config::AnalysisConfig;
use crate::lp::instance_name;
use crate::pipeline::cancel::{CancellationToken, Interrupt};
use crate::pipeline::workflow::{InstanceReport, StructuralWorkflow};

/// Final state of one instance in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InstanceOutcome {
    Completed(InstanceReport),
    Cancelled { instance: String },
    Failed { instance: String, reason: String },
}

impl InstanceOutcome {
    pub fn instance(&self) -> &str {
        match self {
            Self::Completed(report) => &report.instance,
            Self::Cancelled { instance } | Self::Failed { instance, .. } => instance,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

type JobResult = Result<InstanceReport, Interrupt>;

/// Runs one instance on a worker thread under a wall-clock budget.
///
/// When the budget expires the token is cancelled and the worker gets `grace` to notice.
/// A worker that still has not returned is detached; the outcome is `Cancelled` either way.
#[derive(Debug, Clone, Copy)]
pub struct InstanceExecutor {
    pub timeout: Duration,
    pub grace: Duration,
}

impl InstanceExecutor {
    pub fn new(timeout: Duration, grace: Duration) -> Self {
        Self { timeout, grace }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.timeout(), config.grace())
    }

    pub fn run<F>(&self, instance: &str, job: F) -> InstanceOutcome
    where
        F: FnOnce(&CancellationToken) -> JobResult + Send + 'static,
    {
        let token = CancellationToken::with_deadline(Instant::now() + self.timeout);
        let worker_token = token.clone();
        let (tx, rx) = mpsc::channel::<JobResult>();

        let spawned = thread::Builder::new()
            .name(format!("instance-{instance}"))
            .spawn(move || {
                // The receiver is gone once the executor gave up on this worker.
                let _ = tx.send(job(&worker_token));
            });
        let handle = match spawned {
            Ok(handle) => handle,
            Err(err) => {
                return InstanceOutcome::Failed {
                    instance: instance.to_string(),
                    reason: format!("spawn worker: {err}"),
                }
            }
        };

        match rx.recv_timeout(self.timeout) {
            Ok(result) => {
                let _ = handle.join();
                outcome_from(instance, result)
            }
            Err(RecvTimeoutError::Timeout) => {
                token.cancel();
                warn!("{instance}: time budget of {:?} exhausted, cancelling", self.timeout);
                match rx.recv_timeout(self.grace) {
                    Ok(_) | Err(RecvTimeoutError::Disconnected) => {
                        let _ = handle.join();
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        warn!(
                            "{instance}: worker ignored cancellation for {:?}, detaching",
                            self.grace
                        );
                    }
                }
                InstanceOutcome::Cancelled {
                    instance: instance.to_string(),
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                let reason = match handle.join() {
                    Err(payload) => format!("worker panicked: {}", panic_message(payload.as_ref())),
                    Ok(()) => "worker exited without a result".to_string(),
                };
                InstanceOutcome::Failed {
                    instance: instance.to_string(),
                    reason,
                }
            }
        }
    }
}

fn outcome_from(instance: &str, result: JobResult) -> InstanceOutcome {
    match result {
        Ok(report) => InstanceOutcome::Completed(report),
        Err(Interrupt::Cancelled) => InstanceOutcome::Cancelled {
            instance: instance.to_string(),
        },
        Err(Interrupt::Failed(err)) => InstanceOutcome::Failed {
            instance: instance.to_string(),
            reason: err.to_string(),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Processes instances strictly one after another, in input order.
pub struct BatchRunner<H> {
    workflow: Arc<StructuralWorkflow<H>>,
    executor: InstanceExecutor,
}

impl<H> BatchRunner<H>
where
    H: TreewidthHeuristics + Send + Sync + 'static,
{
    pub fn new(config: AnalysisConfig, heuristics: H) -> Self {
        let executor = InstanceExecutor::from_config(&config);
        Self {
            workflow: Arc::new(StructuralWorkflow::new(config, heuristics)),
            executor,
        }
    }

    pub fn with_executor(mut self, executor: InstanceExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn process_instance(&self, path: &Path) -> InstanceOutcome {
        self.process_with(path, |workflow, path, cancel| workflow.process_path(path, cancel))
    }

    pub fn run(&self, paths: &[PathBuf]) -> Vec<InstanceOutcome> {
        self.run_with(paths, |workflow, path, cancel| workflow.process_path(path, cancel))
    }

    /// Like [`BatchRunner::run`] with a custom per-instance job.
    pub fn run_with<F>(&self, paths: &[PathBuf], job: F) -> Vec<InstanceOutcome>
    where
        F: Fn(&StructuralWorkflow<H>, &Path, &CancellationToken) -> JobResult
            + Clone
            + Send
            + 'static,
    {
        let mut outcomes = Vec::with_capacity(paths.len());
        for (position, path) in paths.iter().enumerate() {
            info!("[{}/{}] {}", position + 1, paths.len(), path.display());
            outcomes.push(self.process_with(path, job.clone()));
        }
        outcomes
    }

    fn process_with<F>(&self, path: &Path, job: F) -> InstanceOutcome
    where
        F: FnOnce(&StructuralWorkflow<H>, &Path, &CancellationToken) -> JobResult + Send + 'static,
    {
        let instance = instance_name(path);
        let workflow = Arc::clone(&self.workflow);
        let owned = path.to_path_buf();
        let outcome = self
            .executor
            .run(&instance, move |cancel| job(workflow.as_ref(), &owned, cancel));
        match &outcome {
            InstanceOutcome::Completed(report) => {
                info!("{instance}: completed in {:.3}s", report.elapsed_secs)
            }
            InstanceOutcome::Cancelled { .. } => warn!("{instance}: no result within the time budget"),
            InstanceOutcome::Failed { reason, .. } => error!("{instance}: failed: {reason}"),
        }
        outcome
    }
}

/// Runs a single instance with the heuristics named in `config`.
pub fn process_instance(path: &Path, config: &AnalysisConfig) -> InstanceOutcome {
    BatchRunner::new(config.clone(), config.heuristics()).process_instance(path)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::error::StructError;
    use crate::lp::LpStatistics;

    fn quick() -> InstanceExecutor {
        InstanceExecutor::new(Duration::from_millis(50), Duration::from_millis(200))
    }

    fn empty_report(instance: &str) -> InstanceReport {
        InstanceReport {
            instance: instance.to_string(),
            lp: LpStatistics::default(),
            primal: None,
            incidence: None,
            dual: None,
            elapsed_secs: 0.0,
        }
    }

    #[test]
    fn finished_job_completes() {
        let outcome = quick().run("fast", |_| Ok(empty_report("fast")));
        assert!(outcome.is_completed());
        assert_eq!(outcome.instance(), "fast");
    }

    #[test]
    fn cooperative_job_is_cancelled() {
        let observed = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&observed);
        let outcome = quick().run("slow", move |cancel| loop {
            if cancel.is_cancelled() {
                seen.store(true, Ordering::SeqCst);
                return Err(Interrupt::Cancelled);
            }
            thread::sleep(Duration::from_millis(5));
        });
        assert_eq!(
            outcome,
            InstanceOutcome::Cancelled {
                instance: "slow".into()
            }
        );
        assert!(observed.load(Ordering::SeqCst));
    }

    #[test]
    fn stubborn_job_is_detached() {
        let executor = InstanceExecutor::new(Duration::from_millis(20), Duration::from_millis(20));
        let start = Instant::now();
        let outcome = executor.run("stuck", |_| {
            thread::sleep(Duration::from_millis(500));
            Ok(empty_report("stuck"))
        });
        assert!(matches!(outcome, InstanceOutcome::Cancelled { .. }));
        assert!(start.elapsed() < Duration::from_millis(400));
    }

    #[test]
    fn errors_and_panics_are_failures() {
        let outcome = quick().run("bad", |_| {
            Err(StructError::parse("bad.mps", 3, "unexpected token").into())
        });
        match outcome {
            InstanceOutcome::Failed { instance, reason } => {
                assert_eq!(instance, "bad");
                assert!(reason.contains("line 3"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        let outcome = quick().run("boom", |_| panic!("exploded"));
        match outcome {
            InstanceOutcome::Failed { reason, .. } => assert!(reason.contains("exploded")),
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}
