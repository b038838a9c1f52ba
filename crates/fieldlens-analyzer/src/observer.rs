//! Terminal-event observers.

use tokio::sync::mpsc;
use tracing::trace;

/// Receives the single terminal event of an analysis task.
///
/// Called from the task's worker thread, at most once per task.
pub trait AnalysisObserver: Send + Sync {
    /// The service returned an analysis.
    fn on_success(&self, analysis: String);

    /// The request failed; `message` is ready to show to the user.
    fn on_error(&self, message: String);
}

/// Event forwarded by [`ChannelObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    Success(String),
    Error(String),
}

/// Observer that forwards the event into a channel.
///
/// The receiver yields `None` once the task is dropped without delivering,
/// which is what a cancelled task looks like from the host side.
pub struct ChannelObserver {
    event_tx: mpsc::UnboundedSender<TaskEvent>,
}

impl ChannelObserver {
    /// Create an observer and the receiver for its events.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TaskEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { event_tx: tx }, rx)
    }
}

impl AnalysisObserver for ChannelObserver {
    fn on_success(&self, analysis: String) {
        trace!(len = analysis.len(), "Forwarding analysis");
        // Receiver might be gone if the host stopped listening.
        self.event_tx.send(TaskEvent::Success(analysis)).ok();
    }

    fn on_error(&self, message: String) {
        trace!(message = %message, "Forwarding error");
        self.event_tx.send(TaskEvent::Error(message)).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_observer_forwards() {
        let (observer, mut rx) = ChannelObserver::new();
        observer.on_success("Schwarzschild".to_string());
        observer.on_error("Analysis failed: boom".to_string());

        assert_eq!(
            rx.try_recv().unwrap(),
            TaskEvent::Success("Schwarzschild".into())
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            TaskEvent::Error("Analysis failed: boom".into())
        );
    }

    #[test]
    fn test_channel_observer_tolerates_dropped_receiver() {
        let (observer, rx) = ChannelObserver::new();
        drop(rx);
        observer.on_success("ignored".to_string());
    }
}
