//! Interface to the symbolic tensor engine.
//!
//! FieldLens does not do tensor algebra itself. Hosts plug in an engine that
//! turns the metric's component expressions into derived tensors; the results
//! are carried around as already-rendered expressions.

use serde::Serialize;

use crate::error::CoreError;
use crate::payload::MetricPayload;

/// Tensors derived from a metric, rendered as text by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedTensors {
    pub metric: String,
    pub einstein_tensor: String,
    pub ricci_scalar: String,
    pub christoffel_symbols: String,
}

impl DerivedTensors {
    /// Sectioned text for display.
    pub fn render(&self) -> String {
        format!(
            "=== Calculation Results ===\n\n\
             Metric Tensor:\n{}\n\n\
             Einstein Tensor:\n{}\n\n\
             Ricci Scalar:\n{}\n\n\
             Christoffel Symbols:\n{}",
            self.metric, self.einstein_tensor, self.ricci_scalar, self.christoffel_symbols
        )
    }
}

/// A symbolic engine that computes derived tensors.
pub trait TensorSolver {
    /// Compute Einstein tensor, Ricci scalar and Christoffel symbols.
    fn compute_derived_tensors(
        &self,
        components: &[Vec<String>],
        coordinates: &[String],
    ) -> Result<DerivedTensors, CoreError>;

    /// Convenience wrapper taking a validated payload.
    fn solve(&self, payload: &MetricPayload) -> Result<DerivedTensors, CoreError> {
        self.compute_derived_tensors(payload.components(), payload.coordinates())
    }
}
