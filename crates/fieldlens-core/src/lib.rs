//! FieldLens Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Async runtimes
//! - Symbolic math engines
//!
//! Everything needed to describe an analysis request, compose its prompt and
//! classify its outcome lives here, so hosts and transports share one model.

pub mod config;
pub mod error;
pub mod ids;
pub mod mode;
pub mod outcome;
pub mod payload;
pub mod prompt;
pub mod report;
pub mod request;
pub mod solver;
pub mod status;
pub mod task;

// Re-export commonly used types
pub use config::{EndpointConfig, API_KEY_ENV};
pub use error::CoreError;
pub use ids::TaskId;
pub use mode::AnalysisMode;
pub use outcome::{FailureReason, TerminalOutcome, MISSING_ANALYSIS_PLACEHOLDER};
pub use payload::{parse_coordinates, MetricPayload, ZERO_EXPRESSION};
pub use prompt::PromptBuilder;
pub use report::{Aspect, ResultsReport};
pub use request::{AnalyzeRequest, RequestDescriptor};
pub use solver::{DerivedTensors, TensorSolver};
pub use status::TaskStatus;
pub use task::TaskSummary;
