//! Tract-based local question answering engine.
//!
//! Pure-Rust path: loads the ONNX model with tract-onnx, tokenizes with the
//! tokenizers crate, extracts the best answer span from the model's start/end
//! logits. No ONNX Runtime or system deps.

use anyhow::{anyhow, bail, Result};
use tokenizers::{Encoding, Tokenizer, TruncationParams, TruncationStrategy};
use tract_onnx::prelude::*;

use crate::config::Config;
use crate::hub;
use crate::models::Answer;
use crate::pipeline::{best_span, masked_softmax, QaEngine};

type RunnableOnnx = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

/// Question answering engine running entirely in-process.
///
/// Long contexts are evaluated window by window: the tokenizer truncates the
/// context sequence to `max_seq_len` with a `doc_stride` token overlap and
/// the best-scoring span across all windows wins.
pub struct TractQaEngine {
    model_name: String,
    model: RunnableOnnx,
    tokenizer: Tokenizer,
    max_answer_len: usize,
}

impl TractQaEngine {
    pub fn load(config: &Config) -> Result<Self> {
        let spec = hub::resolve(&config.model.name)?;
        let cache = hub::cache_root(config)?;
        let files = hub::ensure_cached(spec, &cache)?;

        let mut tokenizer =
            Tokenizer::from_file(&files.tokenizer).map_err(|e| anyhow!("Load tokenizer: {}", e))?;
        // Truncate only the context (second sequence); overflow windows carry
        // the full question plus the next context slice.
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.model.max_seq_len,
                strategy: TruncationStrategy::OnlySecond,
                stride: config.model.doc_stride,
                ..Default::default()
            }))
            .map_err(|e| anyhow!("Configure truncation: {}", e))?;

        let model = tract_onnx::onnx()
            .model_for_path(&files.onnx)
            .map_err(|e| anyhow!("Load ONNX: {}", e))?
            .into_optimized()
            .map_err(|e| anyhow!("Optimize: {}", e))?
            .into_runnable()
            .map_err(|e| anyhow!("Build tract runnable: {}", e))?;

        Ok(Self {
            model_name: spec.name.to_string(),
            model,
            tokenizer,
            max_answer_len: config.model.max_answer_len,
        })
    }

    fn answer_window(&self, enc: &Encoding, context: &str) -> Result<Option<Answer>> {
        let ids = enc.get_ids();
        let seq_len = ids.len();
        if seq_len == 0 {
            return Ok(None);
        }

        let input_ids: Vec<i64> = ids.iter().map(|&id| id as i64).collect();
        let attention: Vec<i64> = enc.get_attention_mask().iter().map(|&m| m as i64).collect();

        let input_ids_tensor = ndarray::Array2::from_shape_vec((1, seq_len), input_ids)
            .map_err(|e| anyhow!("Input ids shape: {}", e))?;
        let attention_tensor = ndarray::Array2::from_shape_vec((1, seq_len), attention)
            .map_err(|e| anyhow!("Attention mask shape: {}", e))?;

        let input_ids_t: Tensor = input_ids_tensor.into();
        let attention_t: Tensor = attention_tensor.into();
        let result = self.model.run(tvec!(input_ids_t.into(), attention_t.into()))?;
        if result.len() < 2 {
            bail!(
                "Model returned {} outputs, expected start and end logits",
                result.len()
            );
        }

        let start_logits = logits_row(&result[0])?;
        let end_logits = logits_row(&result[1])?;
        if start_logits.len() != seq_len || end_logits.len() != seq_len {
            bail!(
                "Logit length {}/{} does not match sequence length {}",
                start_logits.len(),
                end_logits.len(),
                seq_len
            );
        }

        let valid = context_mask(&enc.get_sequence_ids(), enc.get_attention_mask());
        let start_probs = masked_softmax(&start_logits, &valid);
        let end_probs = masked_softmax(&end_logits, &valid);

        let (s, e, score) = match best_span(&start_probs, &end_probs, &valid, self.max_answer_len)
        {
            Some(span) => span,
            None => return Ok(None),
        };

        // Offsets are byte positions within the context string.
        let offsets = enc.get_offsets();
        let (char_start, _) = offsets[s];
        let (_, char_end) = offsets[e];
        let text = context
            .get(char_start..char_end)
            .ok_or_else(|| anyhow!("Answer span does not align with the context text"))?;

        Ok(Some(Answer {
            text: text.to_string(),
            score: score.clamp(0.0, 1.0),
            start: char_start,
            end: char_end,
        }))
    }
}

impl QaEngine for TractQaEngine {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn answer(&self, question: &str, context: &str) -> Result<Answer> {
        if context.trim().is_empty() {
            bail!("Context is empty");
        }

        let encoding = self
            .tokenizer
            .encode((question, context), true)
            .map_err(|e| anyhow!("Tokenize: {}", e))?;

        let mut best: Option<Answer> = None;
        for window in std::iter::once(&encoding).chain(encoding.get_overflowing().iter()) {
            if let Some(candidate) = self.answer_window(window, context)? {
                if best.as_ref().map_or(true, |b| candidate.score > b.score) {
                    best = Some(candidate);
                }
            }
        }

        best.ok_or_else(|| anyhow!("The model did not produce an answer span for this question"))
    }
}

fn logits_row(output: &TValue) -> Result<Vec<f32>> {
    let view = output
        .to_array_view::<f32>()
        .map_err(|e| anyhow!("Output to array: {}", e))?;
    Ok(view.iter().copied().collect())
}

/// Positions eligible as answer endpoints: context tokens (second sequence of
/// the pair) that are attended. Specials and question tokens are excluded.
fn context_mask(sequence_ids: &[Option<usize>], attention_mask: &[u32]) -> Vec<bool> {
    sequence_ids
        .iter()
        .zip(attention_mask)
        .map(|(seq, &att)| *seq == Some(1) && att == 1)
        .collect()
}
