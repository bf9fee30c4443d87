//! Per-model token usage and approximate cost.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::GeminiModel;

/// Accumulated tokens for one model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    /// Prompt tokens.
    pub input: u64,
    /// Generated tokens.
    pub output: u64,
}

/// Records `(input, output)` tokens per model across a run.
#[derive(Debug, Clone, Default)]
pub struct UsageTracker {
    usage: BTreeMap<String, TokenUsage>,
}

impl UsageTracker {
    /// Empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one call's tokens for `model`.
    pub fn track(&mut self, model: &str, input_tokens: usize, output_tokens: usize) {
        let entry = self.usage.entry(model.to_string()).or_default();
        entry.input += input_tokens as u64;
        entry.output += output_tokens as u64;
    }

    /// Totals keyed by model name.
    #[must_use]
    pub fn summary(&self) -> &BTreeMap<String, TokenUsage> {
        &self.usage
    }

    /// Totals over every model.
    #[must_use]
    pub fn total(&self) -> TokenUsage {
        self.usage.values().fold(TokenUsage::default(), |acc, u| TokenUsage {
            input: acc.input + u.input,
            output: acc.output + u.output,
        })
    }

    /// Forget everything recorded so far.
    pub fn reset(&mut self) {
        self.usage.clear();
    }

    /// Fold another tracker's usage into this one.
    pub fn merge(&mut self, other: &UsageTracker) -> &mut Self {
        for (model, usage) in &other.usage {
            let entry = self.usage.entry(model.clone()).or_default();
            entry.input += usage.input;
            entry.output += usage.output;
        }
        self
    }

    /// Approximate cost in USD.
    ///
    /// Models missing from the registry contribute nothing.
    #[must_use]
    pub fn approximate_cost(&self) -> f64 {
        self.usage
            .iter()
            .filter_map(|(name, usage)| match GeminiModel::from_code_name(name) {
                Some(model) => Some(model.pricing().cost(usage.input, usage.output)),
                None => {
                    tracing::warn!(model = %name, "no pricing for model; cost not counted");
                    None
                }
            })
            .sum()
    }
}
