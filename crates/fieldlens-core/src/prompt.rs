//! Prompt composition for the analysis service.

use crate::mode::AnalysisMode;
use crate::payload::MetricPayload;

struct Instructions {
    heading: &'static str,
    points: [&'static str; 5],
    closing: &'static str,
}

const VALIDATE: Instructions = Instructions {
    heading: "Please analyze for:",
    points: [
        "Signature consistency",
        "Symmetry requirements",
        "Physical meaningfulness",
        "Common errors or issues",
        "Potential simplifications",
    ],
    closing: "Provide your analysis in a clear, structured format.",
};

const INTERPRET: Instructions = Instructions {
    heading: "Please interpret this metric tensor and explain:",
    points: [
        "What type of spacetime it represents",
        "Its physical significance",
        "Any special properties or symmetries",
        "Known solutions it might be related to",
        "Potential physical applications",
    ],
    closing: "Provide your interpretation in clear, physics-focused language.",
};

const SUGGEST: Instructions = Instructions {
    heading: "Please suggest:",
    points: [
        "Possible modifications to explore",
        "Additional terms to consider",
        "Alternative coordinate systems",
        "Related metrics to compare with",
        "Potential physical scenarios to study",
    ],
    closing: "Provide practical, physics-based suggestions.",
};

/// Builds the textual prompt sent alongside the metric.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Compose the prompt for `payload` in `mode`.
    ///
    /// Pure and infallible. Modes without instructions get the base
    /// description only.
    pub fn build(payload: &MetricPayload, mode: &AnalysisMode) -> String {
        let mut prompt = Self::base_description(payload);
        if let Some(instructions) = instructions_for(mode) {
            prompt.push('\n');
            prompt.push_str(instructions.heading);
            prompt.push('\n');
            for (index, point) in instructions.points.iter().enumerate() {
                prompt.push_str(&format!("{}. {}\n", index + 1, point));
            }
            prompt.push('\n');
            prompt.push_str(instructions.closing);
            prompt.push('\n');
        }
        prompt
    }

    /// Description of the metric shared by every mode.
    pub fn base_description(payload: &MetricPayload) -> String {
        // A grid of strings always serializes.
        let components = serde_json::to_string_pretty(payload.components())
            .unwrap_or_else(|_| format!("{:?}", payload.components()));
        format!(
            "You are a physics expert specialized in general relativity.\n\
             Analyzing this metric tensor:\n\
             {}\n\
             Coordinates: {}\n",
            components,
            payload.coordinates().join(", ")
        )
    }
}

fn instructions_for(mode: &AnalysisMode) -> Option<&'static Instructions> {
    match mode {
        AnalysisMode::Validate => Some(&VALIDATE),
        AnalysisMode::Interpret => Some(&INTERPRET),
        AnalysisMode::Suggest => Some(&SUGGEST),
        AnalysisMode::Other(_) => None,
    }
}
