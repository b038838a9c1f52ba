//! Background analysis tasks for FieldLens
//!
//! An [`AnalysisTask`] runs one analysis request on its own thread with a
//! private tokio runtime, so hosts with a blocking event loop never wait on
//! the network. The host registers an [`AnalysisObserver`] and receives
//! exactly one event, or none at all if it cancelled the task.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fieldlens_analyzer::{AnalysisTask, ChannelObserver, TaskEvent};
//! use fieldlens_client::{HttpEndpoint, RetryingTransport};
//! use fieldlens_core::{EndpointConfig, MetricPayload, RequestDescriptor};
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let payload = MetricPayload::from_coordinate_text(
//!         vec![vec!["-1".into(), "".into()], vec!["".into(), "1".into()]],
//!         "t, x",
//!     )?;
//!     let descriptor = RequestDescriptor::new(payload, "interpret", EndpointConfig::default());
//!     let transport = RetryingTransport::new(Arc::new(HttpEndpoint::new()));
//!
//!     let (observer, mut events) = ChannelObserver::new();
//!     let task = AnalysisTask::new(descriptor, transport).with_observer(Arc::new(observer));
//!     task.start()?;
//!
//!     match events.blocking_recv() {
//!         Some(TaskEvent::Success(text)) => println!("{}", text),
//!         Some(TaskEvent::Error(message)) => eprintln!("{}", message),
//!         None => println!("cancelled"),
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod observer;
mod task;

pub use error::AnalyzerError;
pub use observer::{AnalysisObserver, ChannelObserver, TaskEvent};
pub use task::AnalysisTask;
