//! Session context resolution.
//!
//! The context is the passage every question of a session is answered
//! against. It is resolved once at startup (from a CLI flag, a file, or an
//! interactive prompt) and never mutated afterwards. An empty submission is
//! not an error: it selects the built-in default passage.

use anyhow::{Context as _, Result};
use std::io::{BufRead, Write};
use std::path::Path;

/// Default passage used when the user supplies no context of their own.
pub const DEFAULT_CONTEXT: &str = "Python is a high-level, interpreted programming language \
    with dynamic semantics. It was created by Guido van Rossum and first released in 1991. \
    Python's design philosophy emphasizes code readability with its notable use of significant \
    whitespace. Its language constructs and object-oriented approach aim to help programmers \
    write clear, logical code for small and large-scale projects. Python is dynamically-typed \
    and garbage-collected. It supports multiple programming paradigms, including structured, \
    object-oriented and functional programming. Python is often described as a \"batteries \
    included\" language due to its comprehensive standard library. It is used for web \
    development, data science, artificial intelligence, automation, and many other applications.";

/// Resolve a context from non-interactive sources, `--context` taking
/// precedence over `--context-file`. Returns `None` when neither was given
/// (the caller then prompts interactively or uses the default). A source
/// that turns out blank after trimming selects the default passage, same as
/// an empty interactive submission.
pub fn from_sources(inline: Option<&str>, file: Option<&Path>) -> Result<Option<String>> {
    if let Some(text) = inline {
        return Ok(Some(or_default(text)));
    }
    if let Some(path) = file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read context file: {}", path.display()))?;
        return Ok(Some(or_default(&text)));
    }
    Ok(None)
}

/// Prompt for a single line of free-form context. An empty (post-trim) line,
/// or EOF, selects the default passage. Never fails on user input.
pub fn prompt_context<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<String> {
    writeln!(out)?;
    writeln!(
        out,
        "Provide the passage the assistant should answer questions about."
    )?;
    writeln!(out, "Press Enter to use the default passage about Python.")?;
    write!(out, "\ncontext> ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let context = or_default(&line);
    if line.trim().is_empty() {
        writeln!(out, "Using the default passage about Python.")?;
    }
    Ok(context)
}

fn or_default(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        DEFAULT_CONTEXT.to_string()
    } else {
        trimmed.to_string()
    }
}
