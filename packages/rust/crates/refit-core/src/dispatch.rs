//! Token-budgeted batching of blocks into model calls.
//!
//! Blocks are packed greedily in input order. Before a block joins the
//! current batch, the batch is sent when either
//!
//! - it already holds `max_blocks_per_call` blocks, or
//! - it is non-empty and `(batch_tokens + block_tokens) * output_expansion_factor`
//!   exceeds the model's output limit.
//!
//! A block larger than the budget therefore still goes out, alone.

use refit_llm::{LanguageModel, UsageTracker};

use crate::block::CodeBlock;
use crate::edited::EditedBlock;
use crate::parse::{is_error_reply, parse_model_output};
use crate::prompt::{EditPrompt, render_block_fragment};
use crate::types::DispatchConfig;

/// A block waiting in the current batch, with its rendered fragment.
struct PendingBlock<'a> {
    block: &'a CodeBlock,
    fragment: String,
}

/// What a dispatch run produced.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    /// Edited blocks from every batch, in input order.
    pub edited_blocks: Vec<EditedBlock>,
    /// Model calls made.
    pub calls: usize,
    /// Batches that ended as no-ops because the model failed or refused.
    pub failed_batches: usize,
}

/// Sends blocks to a model in budgeted batches.
pub struct BatchDispatcher<'a> {
    model: &'a dyn LanguageModel,
    prompt: &'a EditPrompt,
    config: DispatchConfig,
}

impl<'a> BatchDispatcher<'a> {
    /// Dispatcher for `model` with the shared `prompt`.
    #[must_use]
    pub fn new(model: &'a dyn LanguageModel, prompt: &'a EditPrompt, config: DispatchConfig) -> Self {
        Self {
            model,
            prompt,
            config,
        }
    }

    /// Rewrite `blocks`, recording per-call token usage in `usage`.
    ///
    /// Model failures never abort the run: the affected batch becomes
    /// no-op edits and dispatch continues with the next batch.
    pub fn dispatch(
        &self,
        blocks: &[CodeBlock],
        mut usage: Option<&mut UsageTracker>,
    ) -> DispatchOutcome {
        let max_blocks = self.config.max_blocks_per_call.max(1);
        let factor = self.config.output_expansion_factor;
        let output_limit = self.model.limits().output_tokens;

        let mut outcome = DispatchOutcome::default();
        let mut batch: Vec<PendingBlock<'_>> = Vec::new();
        let mut batch_tokens = 0usize;

        for block in blocks {
            let fragment = render_block_fragment(block);
            let block_tokens = self.model.count_tokens(&fragment);

            let full = batch.len() >= max_blocks;
            let over_budget = !batch.is_empty()
                && (batch_tokens + block_tokens).saturating_mul(factor) > output_limit;
            if full || over_budget {
                self.flush(&batch, usage.as_deref_mut(), &mut outcome);
                batch.clear();
                batch_tokens = 0;
            }

            batch.push(PendingBlock { block, fragment });
            batch_tokens += block_tokens;
        }
        if !batch.is_empty() {
            self.flush(&batch, usage.as_deref_mut(), &mut outcome);
        }

        tracing::info!(
            model = self.model.name(),
            blocks = blocks.len(),
            edited = outcome.edited_blocks.len(),
            calls = outcome.calls,
            failed_batches = outcome.failed_batches,
            "dispatch finished"
        );
        outcome
    }

    fn flush(
        &self,
        batch: &[PendingBlock<'_>],
        usage: Option<&mut UsageTracker>,
        outcome: &mut DispatchOutcome,
    ) {
        let originals: Vec<&CodeBlock> = batch.iter().map(|p| p.block).collect();
        let fragments: Vec<&str> = batch.iter().map(|p| p.fragment.as_str()).collect();
        let prompt = self.prompt.render(&fragments);
        let prompt_tokens = self.model.count_tokens(&prompt);

        let input_limit = self.model.limits().input_tokens;
        if prompt_tokens > input_limit {
            tracing::warn!(
                blocks = batch.len(),
                prompt_tokens,
                input_limit,
                "batch prompt exceeds model input limit; keeping originals"
            );
            outcome.failed_batches += 1;
            outcome.edited_blocks.extend(no_ops(&originals));
            return;
        }

        tracing::debug!(blocks = batch.len(), prompt_tokens, "sending batch");
        outcome.calls += 1;
        match self.model.complete(&prompt) {
            Ok(reply) => {
                if let Some(tracker) = usage {
                    tracker.track(self.model.name(), prompt_tokens, self.model.count_tokens(&reply));
                }
                if is_error_reply(&reply) {
                    outcome.failed_batches += 1;
                }
                outcome.edited_blocks.extend(parse_model_output(&reply, &originals));
            }
            Err(error) => {
                if let Some(tracker) = usage {
                    tracker.track(self.model.name(), prompt_tokens, 0);
                }
                tracing::warn!(blocks = batch.len(), error = %error, "model call failed; keeping originals");
                outcome.failed_batches += 1;
                outcome.edited_blocks.extend(no_ops(&originals));
            }
        }
    }
}

fn no_ops(originals: &[&CodeBlock]) -> impl Iterator<Item = EditedBlock> {
    originals.iter().map(|b| EditedBlock::no_op((*b).clone()))
}
