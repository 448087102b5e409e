//! Question answering engine abstraction and span scoring.
//!
//! Defines the [`QaEngine`] trait and the [`create_engine`] constructor that
//! dispatches on the configured backend. The single concrete implementation,
//! [`local_tract::TractQaEngine`], runs the model locally with tract-onnx and
//! the tokenizers crate; no network calls after the model download.
//!
//! The span math lives here so both the engine and its tests share it:
//! [`masked_softmax`] turns raw start/end logits into probabilities over the
//! context positions, and [`best_span`] scans for the highest-probability
//! valid answer span.

pub mod local_tract;

use anyhow::{bail, Result};

use crate::config::Config;
use crate::models::Answer;

/// Trait for question answering engines.
///
/// The engine is an opaque handle bound to one model for the lifetime of a
/// session. Callers only ever query it; construction failures surface from
/// [`create_engine`], per-question failures from [`QaEngine::answer`].
pub trait QaEngine {
    /// Returns the model identifier (e.g. `"distilbert-base-cased-distilled-squad"`).
    fn model_name(&self) -> &str;

    /// Answer `question` against `context`. Returns the best answer span and
    /// its probability, or an error describing why this question could not
    /// be answered. An error here never invalidates the engine.
    fn answer(&self, question: &str, context: &str) -> Result<Answer>;
}

/// Construct the engine for the configured backend and model.
///
/// Any failure (unknown model name, download error, unreadable tokenizer,
/// ONNX load error) is returned as `Err` with a human-readable message.
/// Callers must treat `Err` as fatal: there is no retry and no degraded mode.
pub fn create_engine(config: &Config) -> Result<Box<dyn QaEngine>> {
    match config.model.backend.as_str() {
        "tract" => {
            let engine = local_tract::TractQaEngine::load(config)?;
            Ok(Box::new(engine))
        }
        other => bail!("Unknown inference backend: '{}'. Must be tract.", other),
    }
}

/// Softmax over `logits`, restricted to positions where `valid` is true.
/// Invalid positions get probability 0. Returns all zeros when nothing is
/// valid.
pub(crate) fn masked_softmax(logits: &[f32], valid: &[bool]) -> Vec<f32> {
    let max = logits
        .iter()
        .zip(valid)
        .filter(|(_, &v)| v)
        .map(|(&x, _)| x)
        .fold(f32::NEG_INFINITY, f32::max);
    if max == f32::NEG_INFINITY {
        return vec![0.0; logits.len()];
    }

    let exps: Vec<f32> = logits
        .iter()
        .zip(valid)
        .map(|(&x, &v)| if v { (x - max).exp() } else { 0.0 })
        .collect();
    let sum: f32 = exps.iter().sum();
    if sum <= 0.0 {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|x| x / sum).collect()
}

/// Find the best-scoring span `(start, end, score)` with `end >= start`,
/// span length at most `max_answer_len` tokens, and both endpoints valid.
/// Score is `P(start) * P(end)`.
pub(crate) fn best_span(
    start_probs: &[f32],
    end_probs: &[f32],
    valid: &[bool],
    max_answer_len: usize,
) -> Option<(usize, usize, f32)> {
    let len = start_probs.len().min(end_probs.len()).min(valid.len());
    let mut best: Option<(usize, usize, f32)> = None;

    for s in 0..len {
        if !valid[s] {
            continue;
        }
        let end_limit = (s + max_answer_len).min(len);
        for e in s..end_limit {
            if !valid[e] {
                continue;
            }
            let score = start_probs[s] * end_probs[e];
            if best.map_or(true, |(_, _, b)| score > b) {
                best = Some((s, e, score));
            }
        }
    }

    best
}
