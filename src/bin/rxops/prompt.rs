//! Line-based input: prompting and turning answers into sources.

use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rxops::prelude::*;

pub struct Prompt {
  editor: DefaultEditor,
}

impl Prompt {
  pub fn new() -> Result<Self> {
    let editor = DefaultEditor::new().context("failed to open the terminal for input")?;
    Ok(Self { editor })
  }

  /// Asks one question and returns the answer line.
  pub fn ask(&mut self, question: &str) -> Result<String> {
    self
      .editor
      .readline(question)
      .with_context(|| format!("no answer to {:?}", question.trim()))
  }
}

/// Emits each comma separated entry of `input` as a number.
///
/// Entries are trimmed first. A malformed entry ends the stream with
/// [`RxError::Producer`] when it is reached.
pub fn numbers(input: &str) -> Observable<f64> {
  Observable::from_iter(entries(input)).try_map(|entry| parse_number(&entry))
}

/// Emits each comma separated entry of `input`, trimmed.
pub fn letters(input: &str) -> Observable<String> { Observable::from_iter(entries(input)) }

pub fn parse_number(entry: &str) -> Result<f64, RxError> {
  entry
    .parse()
    .map_err(|_| RxError::producer(format!("malformed number {entry:?}")))
}

fn entries(input: &str) -> Vec<String> { input.split(',').map(|s| s.trim().to_string()).collect() }
