//! Interactive question answering session.
//!
//! `qa chat` runs the full session: load the engine, resolve the context,
//! then a blocking read-eval-print loop until an exit command or EOF. The
//! loop itself is written against [`BufRead`]/[`Write`] and a
//! [`QaEngine`] reference so it can be driven by scripted input in tests.

use anyhow::{Context as _, Result};
use std::io::{BufRead, Write};
use std::path::Path;

use crate::config::Config;
use crate::context;
use crate::hub;
use crate::models::{percent, Confidence};
use crate::pipeline::{self, QaEngine};

/// One line of user input, classified.
///
/// Exit commands and `context` are case-insensitive exact matches; anything
/// else that survives trimming is a question.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Exit,
    ShowContext,
    Empty,
    Question(String),
}

fn classify(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    match trimmed.to_lowercase().as_str() {
        "quit" | "exit" | "bye" | "q" => Input::Exit,
        "context" => Input::ShowContext,
        _ => Input::Question(trimmed.to_string()),
    }
}

/// Run an interactive session on stdin/stdout.
///
/// The engine is constructed before the context is resolved: a model that
/// fails to load aborts the whole session without prompting for anything.
pub fn run_chat(config: &Config, inline: Option<&str>, file: Option<&Path>) -> Result<()> {
    let interactive = atty::is(atty::Stream::Stdin);
    if interactive {
        println!("qa-harness: local extractive question answering");
        if let (Ok(spec), Ok(root)) = (hub::resolve(&config.model.name), hub::cache_root(config)) {
            if !hub::is_cached(spec, &root) {
                println!("Model files are not cached yet; downloading from the Hugging Face Hub.");
            }
        }
        println!("Loading model '{}'...", config.model.name);
    }

    let engine = pipeline::create_engine(config)
        .context("Failed to initialize the question answering model")?;
    if interactive {
        println!("Model '{}' ready.", engine.model_name());
    }

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let context = match context::from_sources(inline, file)? {
        Some(context) => context,
        None => context::prompt_context(&mut input, &mut out)?,
    };

    run_loop(engine.as_ref(), &context, &mut input, &mut out)
}

/// The read-eval-print cycle. Returns only on an exit command or EOF; a
/// failed inference never terminates the session.
fn run_loop<R: BufRead, W: Write>(
    engine: &dyn QaEngine,
    context: &str,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Ask questions about the passage. Type 'quit', 'exit', 'bye', or 'q' to leave; \
         'context' redisplays the passage."
    )?;

    loop {
        write!(out, "\nquestion> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF: closed pipe or Ctrl-D
            writeln!(out)?;
            writeln!(out, "Goodbye.")?;
            return Ok(());
        }

        match classify(&line) {
            Input::Exit => {
                writeln!(out, "Goodbye.")?;
                return Ok(());
            }
            Input::ShowContext => {
                writeln!(out, "\nCurrent context:")?;
                writeln!(out, "{}", context)?;
            }
            Input::Empty => {
                writeln!(out, "Please enter a question.")?;
            }
            Input::Question(question) => match engine.answer(&question, context) {
                Ok(answer) => {
                    let band = Confidence::from_score(answer.score);
                    writeln!(out, "Answer: {}", answer.text)?;
                    writeln!(
                        out,
                        "Confidence: {} ({})",
                        percent(answer.score),
                        band.feedback()
                    )?;
                }
                Err(e) => {
                    writeln!(out, "Could not answer that question: {:#}", e)?;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Answer;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io::Cursor;

    struct MockEngine {
        calls: RefCell<Vec<(String, String)>>,
        results: RefCell<VecDeque<Result<Answer>>>,
    }

    impl MockEngine {
        fn new(results: Vec<Result<Answer>>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                results: RefCell::new(results.into()),
            }
        }

        fn answering(text: &str, score: f32) -> Self {
            Self::new(vec![Ok(Answer {
                text: text.to_string(),
                score,
                start: 0,
                end: text.len(),
            })])
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl QaEngine for MockEngine {
        fn model_name(&self) -> &str {
            "mock"
        }

        fn answer(&self, question: &str, context: &str) -> Result<Answer> {
            self.calls
                .borrow_mut()
                .push((question.to_string(), context.to_string()));
            self.results
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow!("no scripted result")))
        }
    }

    fn drive(engine: &MockEngine, context: &str, script: &str) -> String {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        run_loop(engine, context, &mut input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_classify_commands() {
        assert_eq!(classify("quit\n"), Input::Exit);
        assert_eq!(classify("EXIT"), Input::Exit);
        assert_eq!(classify("  Bye  "), Input::Exit);
        assert_eq!(classify("Q"), Input::Exit);
        assert_eq!(classify("Context"), Input::ShowContext);
        assert_eq!(classify("   \t"), Input::Empty);
        assert_eq!(
            classify(" What is Rust? \n"),
            Input::Question("What is Rust?".to_string())
        );
        // Only exact matches are commands
        assert_eq!(
            classify("quitting time?"),
            Input::Question("quitting time?".to_string())
        );
    }

    #[test]
    fn test_exit_commands_terminate_without_inference() {
        for command in ["quit", "exit", "bye", "q", "QUIT", "Bye"] {
            let engine = MockEngine::new(vec![]);
            let out = drive(&engine, "ctx", &format!("{}\n", command));
            assert_eq!(engine.call_count(), 0, "command {:?}", command);
            assert!(out.contains("Goodbye."), "command {:?}", command);
        }
    }

    #[test]
    fn test_context_command_prints_context_without_inference() {
        let engine = MockEngine::new(vec![]);
        let out = drive(&engine, "The sky is blue.", "context\nquit\n");
        assert_eq!(engine.call_count(), 0);
        assert!(out.contains("The sky is blue."));
    }

    #[test]
    fn test_empty_input_warns_and_continues() {
        let engine = MockEngine::new(vec![]);
        let out = drive(&engine, "ctx", "   \nquit\n");
        assert_eq!(engine.call_count(), 0);
        assert!(out.contains("Please enter a question."));
        assert!(out.contains("Goodbye."));
    }

    #[test]
    fn test_question_reaches_engine_verbatim() {
        let engine = MockEngine::answering("blue", 0.87);
        let out = drive(
            &engine,
            "The sky is blue.",
            "What color is the sky?\nquit\n",
        );
        assert_eq!(
            *engine.calls.borrow(),
            vec![(
                "What color is the sky?".to_string(),
                "The sky is blue.".to_string()
            )]
        );
        assert!(out.contains("Answer: blue"));
        assert!(out.contains("Confidence: 87.00% (high confidence)"));
    }

    #[test]
    fn test_confidence_bands_in_output() {
        let engine = MockEngine::answering("a", 0.65);
        let out = drive(&engine, "ctx", "why?\nquit\n");
        assert!(out.contains("(moderate confidence)"));

        let engine = MockEngine::answering("a", 0.3);
        let out = drive(&engine, "ctx", "why?\nquit\n");
        assert!(out.contains("(low confidence, answer may be inaccurate)"));
    }

    #[test]
    fn test_inference_error_is_recoverable() {
        let engine = MockEngine::new(vec![
            Err(anyhow!("window overflow")),
            Ok(Answer {
                text: "blue".to_string(),
                score: 0.9,
                start: 0,
                end: 4,
            }),
        ]);
        let out = drive(&engine, "ctx", "bad question\ngood question\nquit\n");
        assert_eq!(engine.call_count(), 2);
        assert!(out.contains("Could not answer that question"));
        assert!(out.contains("Answer: blue"));
        assert!(out.contains("Goodbye."));
    }

    #[test]
    fn test_eof_terminates_cleanly() {
        let engine = MockEngine::new(vec![]);
        let out = drive(&engine, "ctx", "");
        assert_eq!(engine.call_count(), 0);
        assert!(out.contains("Goodbye."));
    }
}
