//! Core data models used throughout QA Harness.
//!
//! These types represent the answers and confidence feedback that flow from
//! the inference pipeline to the terminal.

use serde::Serialize;

/// An extracted answer returned by a [`QaEngine`](crate::pipeline::QaEngine).
///
/// `text` is a verbatim substring of the session context; `start` and `end`
/// are its byte offsets within that context. `score` is the model's
/// probability for the span, always in `[0, 1]`.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub score: f32,
    pub start: usize,
    pub end: usize,
}

/// Confidence band derived from an answer score.
///
/// Bands are non-overlapping and evaluated high-to-low: a score above 0.8 is
/// [`Confidence::High`], above 0.5 is [`Confidence::Moderate`], anything else
/// is [`Confidence::Low`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Moderate,
    Low,
}

impl Confidence {
    pub fn from_score(score: f32) -> Self {
        if score > 0.8 {
            Confidence::High
        } else if score > 0.5 {
            Confidence::Moderate
        } else {
            Confidence::Low
        }
    }

    /// Feedback line shown to the user under an answer.
    pub fn feedback(self) -> &'static str {
        match self {
            Confidence::High => "high confidence",
            Confidence::Moderate => "moderate confidence",
            Confidence::Low => "low confidence, answer may be inaccurate",
        }
    }
}

/// Render a score in `[0, 1]` as a percentage with two decimals: `0.87` -> `87.00%`.
pub fn percent(score: f32) -> String {
    format!("{:.2}%", score * 100.0)
}
