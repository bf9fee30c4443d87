//! Token pricing, in USD per million tokens.

use serde::Serialize;

const PER_MILLION: f64 = 1_000_000.0;

/// Price list of one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ModelPricing {
    /// One rate per direction.
    Flat {
        /// Input price per 1M tokens.
        input: f64,
        /// Output price per 1M tokens.
        output: f64,
    },
    /// Rates that step up once the prompt size crosses a threshold.
    ///
    /// The tier for both directions is chosen by input tokens.
    Tiered {
        /// Input tokens at which the higher tier starts (exclusive).
        threshold_tokens: u64,
        /// Input price at or below the threshold.
        input_below: f64,
        /// Input price above the threshold.
        input_above: f64,
        /// Output price at or below the threshold.
        output_below: f64,
        /// Output price above the threshold.
        output_above: f64,
    },
}

impl ModelPricing {
    /// Cost of `input`/`output` tokens.
    ///
    /// For tiered pricing the tier is picked from `input` as a whole, so
    /// accumulated usage is an approximation of per-request billing.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cost(&self, input: u64, output: u64) -> f64 {
        let (input_rate, output_rate) = match *self {
            Self::Flat { input, output } => (input, output),
            Self::Tiered {
                threshold_tokens,
                input_below,
                input_above,
                output_below,
                output_above,
            } => {
                if input <= threshold_tokens {
                    (input_below, output_below)
                } else {
                    (input_above, output_above)
                }
            }
        };
        (input as f64 / PER_MILLION) * input_rate + (output as f64 / PER_MILLION) * output_rate
    }
}
