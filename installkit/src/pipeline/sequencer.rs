//! Ordered step execution with a single terminal finalizer.

use std::future::Future;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::InstallError;
use crate::host::BoxFuture;

/// One named unit of work.
pub struct Step<'a> {
    name: &'static str,
    run: Box<dyn FnOnce() -> BoxFuture<'a, Result<(), InstallError>> + Send + 'a>,
}

impl<'a> Step<'a> {
    pub fn new<F, Fut>(name: &'static str, f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<(), InstallError>> + Send + 'a,
    {
        Self {
            name,
            run: Box::new(move || -> BoxFuture<'a, Result<(), InstallError>> { Box::pin(f()) }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Debug for Step<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}

/// Observable state of a sequencer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    /// Step `index` is executing.
    Running { index: usize, step: &'static str },
    /// Step `index` failed and the failure finalizer has run.
    Failed { index: usize },
    /// Every step completed and the success finalizer has run.
    Succeeded,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::Succeeded)
    }
}

/// The first failing step of a run, carrying its error unchanged.
#[derive(Debug, Error)]
#[error("step '{step}' failed: {error}")]
pub struct StepFailure {
    pub step: &'static str,
    pub index: usize,
    #[source]
    pub error: InstallError,
}

impl StepFailure {
    pub fn into_error(self) -> InstallError {
        self.error
    }
}

/// Terminal callbacks of a pipeline. Exactly one runs per sequencer run.
pub trait Finalizer: Sync {
    fn on_success(&self) -> BoxFuture<'_, ()>;

    fn on_failure<'a>(&'a self, failure: &'a StepFailure) -> BoxFuture<'a, ()>;
}

/// Runs steps strictly in order.
///
/// Step N+1 starts only after step N's future resolved `Ok`. The first
/// error stops the run; later steps are dropped without executing.
pub struct Sequencer<'a> {
    steps: Vec<Step<'a>>,
    state: watch::Sender<PipelineState>,
}

impl<'a> Sequencer<'a> {
    pub fn new(steps: Vec<Step<'a>>) -> Self {
        let (state, _) = watch::channel(PipelineState::Idle);
        Self { steps, state }
    }

    /// Watch state transitions of this run.
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step, then exactly one finalizer callback.
    pub async fn run<F>(self, finalizer: &F) -> Result<(), StepFailure>
    where
        F: Finalizer + ?Sized,
    {
        let Self { steps, state } = self;

        for (index, step) in steps.into_iter().enumerate() {
            let Step { name, run } = step;
            state.send_replace(PipelineState::Running { index, step: name });
            debug!(step = name, index, "Step started");

            if let Err(error) = run().await {
                warn!(step = name, index, error = %error, "Step failed");
                let failure = StepFailure {
                    step: name,
                    index,
                    error,
                };
                finalizer.on_failure(&failure).await;
                state.send_replace(PipelineState::Failed { index });
                return Err(failure);
            }
        }

        finalizer.on_success().await;
        state.send_replace(PipelineState::Succeeded);
        Ok(())
    }
}
