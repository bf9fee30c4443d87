//! Model registry and the completion seam.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::LlmError;
use crate::pricing::ModelPricing;

/// Token window of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelLimits {
    /// Maximum prompt tokens.
    pub input_tokens: usize,
    /// Maximum generated tokens per call.
    pub output_tokens: usize,
}

/// Something that turns a prompt into text.
///
/// Calls block until the model answers. Timeouts and cancellation belong to
/// the implementation (the HTTP client), not to callers.
pub trait LanguageModel {
    /// Identifier used for logging and usage tracking.
    fn name(&self) -> &str;

    /// Token window of the model.
    fn limits(&self) -> ModelLimits;

    /// Generate a completion for `prompt`.
    ///
    /// # Errors
    /// Any transport or API failure; callers decide whether it is fatal.
    fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Token count of `text` as seen by this model.
    fn count_tokens(&self, text: &str) -> usize {
        refit_tokenizer::count_tokens(text)
    }
}

impl<M: LanguageModel + ?Sized> LanguageModel for &M {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn limits(&self) -> ModelLimits {
        (**self).limits()
    }

    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).complete(prompt)
    }

    fn count_tokens(&self, text: &str) -> usize {
        (**self).count_tokens(text)
    }
}

/// Supported Gemini models and their static metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum GeminiModel {
    /// gemini-2.5-pro-preview-03-25
    #[default]
    Gemini25Pro,
    /// gemini-2.0-flash
    Gemini20Flash,
    /// gemini-2.0-flash-lite
    Gemini20FlashLite,
}

impl GeminiModel {
    const ALL: [Self; 3] = [Self::Gemini25Pro, Self::Gemini20Flash, Self::Gemini20FlashLite];

    /// Every registered model.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &Self::ALL
    }

    /// API name of the model.
    #[must_use]
    pub fn code_name(self) -> &'static str {
        match self {
            Self::Gemini25Pro => "gemini-2.5-pro-preview-03-25",
            Self::Gemini20Flash => "gemini-2.0-flash",
            Self::Gemini20FlashLite => "gemini-2.0-flash-lite",
        }
    }

    /// Release family, e.g. "2.5".
    #[must_use]
    pub fn version_family(self) -> &'static str {
        match self {
            Self::Gemini25Pro => "2.5",
            Self::Gemini20Flash | Self::Gemini20FlashLite => "2.0",
        }
    }

    /// Input/output token limits.
    #[must_use]
    pub fn limits(self) -> ModelLimits {
        match self {
            Self::Gemini25Pro => ModelLimits {
                input_tokens: 1_000_000,
                output_tokens: 64_000,
            },
            Self::Gemini20Flash => ModelLimits {
                input_tokens: 1_048_576,
                output_tokens: 65_536,
            },
            Self::Gemini20FlashLite => ModelLimits {
                input_tokens: 1_000_000,
                output_tokens: 8_192,
            },
        }
    }

    /// Published price per million tokens.
    #[must_use]
    pub fn pricing(self) -> ModelPricing {
        match self {
            Self::Gemini25Pro => ModelPricing::Tiered {
                threshold_tokens: 200_000,
                input_below: 1.25,
                input_above: 2.50,
                output_below: 10.00,
                output_above: 15.00,
            },
            Self::Gemini20Flash => ModelPricing::Flat {
                input: 0.1,
                output: 0.5,
            },
            Self::Gemini20FlashLite => ModelPricing::Flat {
                input: 0.075,
                output: 0.3,
            },
        }
    }

    /// Look a model up by its API name.
    #[must_use]
    pub fn from_code_name(code_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.code_name() == code_name)
    }
}

impl fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code_name())
    }
}

impl FromStr for GeminiModel {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code_name(s).ok_or_else(|| LlmError::UnknownModel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_code_name() {
        for model in GeminiModel::all() {
            assert_eq!(GeminiModel::from_code_name(model.code_name()), Some(*model));
        }
        assert_eq!(GeminiModel::from_code_name("gpt-4"), None);
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "claude-x".parse::<GeminiModel>().unwrap_err();
        assert!(matches!(err, LlmError::UnknownModel(name) if name == "claude-x"));
    }

    #[test]
    fn test_flash_lite_has_small_output_window() {
        assert_eq!(GeminiModel::Gemini20FlashLite.limits().output_tokens, 8_192);
        assert_eq!(GeminiModel::default().to_string(), "gemini-2.5-pro-preview-03-25");
    }
}
