//! Deterministic in-process model.
//!
//! Replies are served from a queue; once it is empty an optional responder
//! closure answers instead. Every prompt is recorded so tests can assert on
//! what was sent and how many calls were made.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::LlmError;
use crate::model::{LanguageModel, ModelLimits};

type Responder = Box<dyn Fn(&str) -> Result<String, LlmError>>;

/// A [`LanguageModel`] that answers from a script.
pub struct ScriptedModel {
    name: String,
    limits: ModelLimits,
    replies: RefCell<VecDeque<Result<String, LlmError>>>,
    responder: Option<Responder>,
    prompts: RefCell<Vec<String>>,
    token_counter: fn(&str) -> usize,
}

impl ScriptedModel {
    /// Model with the given name and limits and an empty script.
    #[must_use]
    pub fn new(name: impl Into<String>, limits: ModelLimits) -> Self {
        Self {
            name: name.into(),
            limits,
            replies: RefCell::new(VecDeque::new()),
            responder: None,
            prompts: RefCell::new(Vec::new()),
            token_counter: refit_tokenizer::count_tokens,
        }
    }

    /// Queue a successful reply.
    #[must_use]
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.replies.borrow_mut().push_back(Ok(reply.into()));
        self
    }

    /// Queue a failed call.
    #[must_use]
    pub fn with_failure(self, error: LlmError) -> Self {
        self.replies.borrow_mut().push_back(Err(error));
        self
    }

    /// Answer with `responder` once the queue is empty.
    #[must_use]
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, LlmError> + 'static,
    {
        self.responder = Some(Box::new(responder));
        self
    }

    /// Replace the token counter (defaults to cl100k_base).
    #[must_use]
    pub fn with_token_counter(mut self, counter: fn(&str) -> usize) -> Self {
        self.token_counter = counter;
        self
    }

    /// Prompts received so far, in call order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    /// Number of `complete` calls so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.borrow().len()
    }
}

impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn limits(&self) -> ModelLimits {
        self.limits
    }

    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        if let Some(reply) = self.replies.borrow_mut().pop_front() {
            return reply;
        }
        match &self.responder {
            Some(responder) => responder(prompt),
            None => Err(LlmError::Exhausted),
        }
    }

    fn count_tokens(&self, text: &str) -> usize {
        (self.token_counter)(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> ModelLimits {
        ModelLimits {
            input_tokens: 1000,
            output_tokens: 100,
        }
    }

    #[test]
    fn test_queue_then_responder_then_exhausted() {
        let model = ScriptedModel::new("scripted", limits())
            .with_reply("first")
            .with_failure(LlmError::EmptyResponse);

        assert_eq!(model.complete("a").unwrap(), "first");
        assert!(matches!(model.complete("b"), Err(LlmError::EmptyResponse)));
        assert!(matches!(model.complete("c"), Err(LlmError::Exhausted)));
        assert_eq!(model.prompts(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_responder_echoes() {
        let model = ScriptedModel::new("echo", limits()).with_responder(|p| Ok(p.to_uppercase()));
        assert_eq!(model.complete("abc").unwrap(), "ABC");
        assert_eq!(model.call_count(), 1);
    }

    #[test]
    fn test_custom_token_counter() {
        let model = ScriptedModel::new("bytes", limits()).with_token_counter(str::len);
        assert_eq!(model.count_tokens("12345"), 5);
    }
}
