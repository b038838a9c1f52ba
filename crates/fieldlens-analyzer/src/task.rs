//! A single analysis run on its own thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use tracing::{debug, error, info, warn};

use fieldlens_client::RetryingTransport;
use fieldlens_core::{
    CoreError, FailureReason, PromptBuilder, RequestDescriptor, TaskId, TaskStatus, TaskSummary,
    TerminalOutcome,
};

use crate::error::AnalyzerError;
use crate::observer::AnalysisObserver;

/// Everything the worker thread takes ownership of on start.
struct Launch {
    descriptor: RequestDescriptor,
    observer: Option<Arc<dyn AnalysisObserver>>,
}

struct TaskState {
    summary: TaskSummary,
    outcome: Option<TerminalOutcome>,
}

/// State visible to both the host and the worker thread.
struct Shared {
    /// Set by the host, read by the worker. Never reset.
    cancelled: AtomicBool,
    state: Mutex<TaskState>,
}

impl Shared {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn state(&self) -> MutexGuard<'_, TaskState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the terminal outcome.
    ///
    /// The cancellation flag is read under the state lock, so a `stop()` that
    /// lands before the outcome is recorded turns it into `Cancelled`.
    /// Returns true only if `outcome` itself was recorded and should be
    /// delivered.
    fn finish(&self, outcome: TerminalOutcome) -> bool {
        let mut state = self.state();
        let outcome = if self.is_cancelled() {
            TerminalOutcome::Cancelled
        } else {
            outcome
        };
        let deliver = outcome != TerminalOutcome::Cancelled;

        match state.summary.finish(&outcome) {
            Ok(()) => {
                state.outcome = Some(outcome);
                deliver
            }
            Err(e) => {
                warn!(task_id = %state.summary.task_id, error = %e, "Dropping second outcome");
                false
            }
        }
    }

    /// Record a failure raised outside the transport.
    fn fail(&self, detail: impl Into<String>) -> bool {
        let reason = FailureReason::TransportError(detail.into());
        self.finish(TerminalOutcome::Failure(reason))
    }
}

/// One end-to-end analysis with best-effort cancellation.
///
/// `start()` moves the request onto a dedicated thread running a
/// current-thread tokio runtime. `stop()` only raises a flag: a request
/// already on the wire is not aborted, but its result is discarded and the
/// observer hears nothing.
pub struct AnalysisTask {
    id: TaskId,
    transport: RetryingTransport,
    launch: Mutex<Option<Launch>>,
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl AnalysisTask {
    /// Create an idle task for `descriptor`.
    pub fn new(descriptor: RequestDescriptor, transport: RetryingTransport) -> Self {
        let id = TaskId::generate();
        Self {
            shared: Arc::new(Shared {
                cancelled: AtomicBool::new(false),
                state: Mutex::new(TaskState {
                    summary: TaskSummary::new(id.clone()),
                    outcome: None,
                }),
            }),
            id,
            transport,
            launch: Mutex::new(Some(Launch {
                descriptor,
                observer: None,
            })),
            worker: Mutex::new(None),
        }
    }

    /// Register the observer that receives the terminal event.
    ///
    /// Replaces any previously registered observer.
    pub fn with_observer(mut self, observer: Arc<dyn AnalysisObserver>) -> Self {
        let launch = self
            .launch
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(launch) = launch {
            launch.observer = Some(observer);
        }
        self
    }

    /// Task identifier.
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// Start the analysis on a new thread.
    ///
    /// Fails if the task was already started.
    pub fn start(&self) -> Result<(), AnalyzerError> {
        let launch = {
            let mut state = self.shared.state();
            state.summary.start()?;
            lock(&self.launch).take()
        };
        let launch = launch.ok_or_else(|| CoreError::InvalidStateTransition {
            from: TaskStatus::Running.to_string(),
            to: TaskStatus::Running.to_string(),
        })?;

        info!(
            task_id = %self.id,
            mode = %launch.descriptor.mode(),
            url = %launch.descriptor.endpoint().analyze_url(),
            "Starting analysis"
        );

        let shared = Arc::clone(&self.shared);
        let transport = self.transport.clone();
        let task_id = self.id.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("analysis-{}", self.id))
            .spawn(move || run_analysis(task_id, shared, transport, launch));

        match spawned {
            Ok(handle) => {
                *lock(&self.worker) = Some(handle);
                Ok(())
            }
            Err(e) => {
                error!(task_id = %self.id, error = %e, "Failed to spawn analysis thread");
                let detail = format!("failed to spawn analysis thread: {}", e);
                self.shared.fail(detail);
                Err(AnalyzerError::SpawnError(e))
            }
        }
    }

    /// Request cancellation.
    ///
    /// Does not interrupt a call in flight; the task ends as `Cancelled` and
    /// nothing is delivered unless the outcome was already reported.
    pub fn stop(&self) {
        if !self.shared.cancelled.swap(true, Ordering::AcqRel) {
            info!(task_id = %self.id, "Cancellation requested");
        }
    }

    /// Returns true once `stop()` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.shared.is_cancelled()
    }

    /// Current status.
    pub fn status(&self) -> TaskStatus {
        self.shared.state().summary.status
    }

    /// Lifecycle snapshot.
    pub fn summary(&self) -> TaskSummary {
        self.shared.state().summary.clone()
    }

    /// Terminal outcome, once the task has finished.
    pub fn outcome(&self) -> Option<TerminalOutcome> {
        self.shared.state().outcome.clone()
    }

    /// Block until the worker thread exits and return the final status.
    ///
    /// Returns immediately if the task was never started.
    pub fn join(&self) -> TaskStatus {
        let handle = lock(&self.worker).take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!(task_id = %self.id, "Analysis thread panicked");
                self.shared.fail("analysis thread panicked");
            }
        }
        self.status()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Worker thread body.
fn run_analysis(
    task_id: TaskId,
    shared: Arc<Shared>,
    transport: RetryingTransport,
    launch: Launch,
) {
    let Launch {
        descriptor,
        observer,
    } = launch;

    if shared.is_cancelled() {
        info!(task_id = %task_id, "Cancelled before the request was sent");
        shared.finish(TerminalOutcome::Cancelled);
        return;
    }

    let result = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => {
            let prompt = PromptBuilder::build(descriptor.payload(), descriptor.mode());
            debug!(task_id = %task_id, prompt_len = prompt.len(), "Prompt built");
            runtime.block_on(transport.send(&descriptor, &prompt))
        }
        Err(e) => {
            error!(task_id = %task_id, error = %e, "Failed to build runtime");
            Err(FailureReason::TransportError(format!(
                "failed to start runtime: {}",
                e
            )))
        }
    };

    if shared.is_cancelled() {
        info!(task_id = %task_id, "Cancelled while in flight, discarding result");
        shared.finish(TerminalOutcome::Cancelled);
        return;
    }

    let outcome = TerminalOutcome::from(result);
    if !shared.finish(outcome.clone()) {
        info!(task_id = %task_id, "Outcome suppressed");
        return;
    }

    match &outcome {
        TerminalOutcome::Success(_) => info!(task_id = %task_id, "Analysis completed"),
        TerminalOutcome::Failure(reason) => {
            warn!(task_id = %task_id, reason = %reason, "Analysis failed")
        }
        TerminalOutcome::Cancelled => {}
    }

    let Some(observer) = observer else {
        debug!(task_id = %task_id, "No observer registered");
        return;
    };
    match outcome {
        TerminalOutcome::Success(text) => observer.on_success(text),
        failure @ TerminalOutcome::Failure(_) => {
            if let Some(message) = failure.user_message() {
                observer.on_error(message);
            }
        }
        TerminalOutcome::Cancelled => {}
    }
}
