//! One-shot question answering.
//!
//! `qa ask` resolves a context (flag, file, or the built-in default passage),
//! loads the engine, answers a single question, and exits. Unlike the chat
//! loop, an inference failure here is fatal for the command.

use anyhow::{bail, Context as _, Result};
use serde::Serialize;
use std::path::Path;

use crate::config::Config;
use crate::context::{self, DEFAULT_CONTEXT};
use crate::models::{percent, Confidence};
use crate::pipeline;

/// JSON response shape for `qa ask --json`.
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub model: String,
    pub question: String,
    pub answer: String,
    pub score: f32,
    pub confidence: Confidence,
    pub start: usize,
    pub end: usize,
}

pub fn run_ask(
    config: &Config,
    question: &str,
    inline: Option<&str>,
    file: Option<&Path>,
    json: bool,
) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        bail!("Question is empty");
    }

    let context =
        context::from_sources(inline, file)?.unwrap_or_else(|| DEFAULT_CONTEXT.to_string());

    let engine = pipeline::create_engine(config)
        .context("Failed to initialize the question answering model")?;
    let answer = engine.answer(question, &context)?;

    if json {
        let response = AskResponse {
            model: engine.model_name().to_string(),
            question: question.to_string(),
            answer: answer.text,
            score: answer.score,
            confidence: Confidence::from_score(answer.score),
            start: answer.start,
            end: answer.end,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        let band = Confidence::from_score(answer.score);
        println!("Answer: {}", answer.text);
        println!("Confidence: {} ({})", percent(answer.score), band.feedback());
    }

    Ok(())
}
