//! Local, text-level inspection of a metric.
//!
//! These checks work on the component expressions as written; they do not
//! evaluate them symbolically. Each aspect may fail on its own and a failure
//! only affects its own section of the report.

use crate::error::CoreError;
use crate::payload::{MetricPayload, ZERO_EXPRESSION};

/// One independently evaluated section of the report.
pub trait Aspect: Send + Sync {
    /// Section heading, e.g. "Signature Analysis".
    fn title(&self) -> &str;

    /// Analyze the metric.
    fn analyze(&self, payload: &MetricPayload) -> Result<String, CoreError>;
}

/// Metric signature, for diagonal metrics.
pub struct SignatureAspect;

impl Aspect for SignatureAspect {
    fn title(&self) -> &str {
        "Signature Analysis"
    }

    fn analyze(&self, payload: &MetricPayload) -> Result<String, CoreError> {
        if !off_diagonal(payload).all(|(_, _, expr)| is_zero(expr)) {
            return Ok(
                "Metric is not diagonal; signature not determined without diagonalization"
                    .to_string(),
            );
        }

        let mut signs = Vec::with_capacity(payload.dimension());
        for index in 0..payload.dimension() {
            let expr = payload.component(index, index).unwrap_or(ZERO_EXPRESSION);
            if is_zero(expr) {
                return Err(CoreError::InvalidInput(format!(
                    "degenerate metric: g_{{{0}{0}}} is zero",
                    index
                )));
            }
            let sign = if expr.trim_start().starts_with('-') {
                "-"
            } else {
                "+"
            };
            signs.push(sign);
        }

        let negatives = signs.iter().filter(|s| **s == "-").count();
        let kind = match negatives {
            0 => "Riemannian",
            1 => "Lorentzian",
            n if n == signs.len() => "negative definite",
            n if n == signs.len() - 1 => "Lorentzian",
            _ => "indefinite",
        };
        Ok(format!("Signature ({}), {}", signs.join(", "), kind))
    }
}

/// Symmetry `g_ij = g_ji`, compared textually.
pub struct SymmetryAspect;

impl Aspect for SymmetryAspect {
    fn title(&self) -> &str {
        "Symmetry Analysis"
    }

    fn analyze(&self, payload: &MetricPayload) -> Result<String, CoreError> {
        let mut mismatches = Vec::new();
        for (row, col, expr) in off_diagonal(payload).filter(|(row, col, _)| row < col) {
            let mirror = payload.component(col, row).ok_or_else(|| {
                CoreError::InvalidInput(format!("missing component g_{{{}{}}}", col, row))
            })?;
            if squash(expr) != squash(mirror) {
                mismatches.push(format!(
                    "g_{{{r}{c}}} = {} but g_{{{c}{r}}} = {}",
                    expr,
                    mirror,
                    r = row,
                    c = col
                ));
            }
        }

        if mismatches.is_empty() {
            Ok("Metric is symmetric".to_string())
        } else {
            Ok(format!("Metric is not symmetric: {}", mismatches.join("; ")))
        }
    }
}

/// Components that may diverge.
pub struct SingularityAspect;

impl Aspect for SingularityAspect {
    fn title(&self) -> &str {
        "Singularity Analysis"
    }

    fn analyze(&self, payload: &MetricPayload) -> Result<String, CoreError> {
        let suspects: Vec<String> = payload
            .components()
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| cells.iter().enumerate().map(move |(col, e)| (row, col, e)))
            .filter(|(_, _, expr)| expr.contains('/') || expr.contains("\\frac"))
            .map(|(row, col, expr)| format!("g_{{{}{}}} = {}", row, col, expr))
            .collect();

        if suspects.is_empty() {
            Ok("No explicit singularities in the component expressions".to_string())
        } else {
            Ok(format!(
                "Possible singularities where a denominator vanishes: {}",
                suspects.join("; ")
            ))
        }
    }
}

/// Concatenates the per-aspect analyses of a metric.
pub struct ResultsReport {
    aspects: Vec<Box<dyn Aspect>>,
}

impl ResultsReport {
    /// Report with the signature, symmetry and singularity aspects.
    pub fn new() -> Self {
        Self {
            aspects: vec![
                Box::new(SignatureAspect),
                Box::new(SymmetryAspect),
                Box::new(SingularityAspect),
            ],
        }
    }

    /// Report with a custom set of aspects.
    pub fn with_aspects(aspects: Vec<Box<dyn Aspect>>) -> Self {
        Self { aspects }
    }

    /// Full report. Never fails; a failing aspect contributes an inline error.
    pub fn full_report(&self, payload: &MetricPayload) -> String {
        self.aspects
            .iter()
            .map(|aspect| {
                let content = aspect
                    .analyze(payload)
                    .unwrap_or_else(|err| format!("{} failed: {}", aspect.title(), err));
                format!("{}:\n{}", aspect.title(), content)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for ResultsReport {
    fn default() -> Self {
        Self::new()
    }
}

fn off_diagonal(payload: &MetricPayload) -> impl Iterator<Item = (usize, usize, &str)> {
    payload
        .components()
        .iter()
        .enumerate()
        .flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(move |(col, _)| *col != row)
                .map(move |(col, expr)| (row, col, expr.as_str()))
        })
}

fn squash(expr: &str) -> String {
    expr.chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_zero(expr: &str) -> bool {
    squash(expr) == ZERO_EXPRESSION
}
