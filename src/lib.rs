//! # QA Harness
//!
//! A local-first extractive question answering assistant for the terminal.
//!
//! QA Harness downloads a pre-trained extractive QA model (DistilBERT
//! fine-tuned on SQuAD) on first use, caches it under `~/.cache/qa-harness`,
//! and answers questions about a passage of your choosing. Inference runs
//! entirely in-process: the tokenizers crate encodes the question/context
//! pair, tract-onnx runs the forward pass, and the best answer span is
//! recovered from the start/end logits.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌─────────────┐
//! │   Hub    │──▶│   Pipeline     │──▶│  Terminal   │
//! │ download │   │ tokenize+infer │   │ chat / ask  │
//! └──────────┘   └───────────────┘   └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! qa fetch                       # download model weights
//! qa chat                        # interactive session
//! qa ask "Who created Python?"   # one-shot answer
//! qa models                      # list supported models
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`hub`] | Model manifest and Hugging Face Hub cache |
//! | [`pipeline`] | QA engine abstraction and tract backend |
//! | [`context`] | Session context resolution |
//! | [`chat`] | Interactive question loop |
//! | [`ask`] | One-shot answering |

pub mod ask;
pub mod chat;
pub mod config;
pub mod context;
pub mod fetch;
pub mod hub;
pub mod models;
pub mod models_cmd;
pub mod pipeline;
