//! `rxops <operator>`: runs one interactive reactive-operator demo.

mod demo;
mod prompt;

use std::{
  cell::Cell,
  process::ExitCode,
  rc::Rc,
};

use anyhow::Result;
use clap::Parser;
use rxops::prelude::*;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use crate::{
  demo::{Operator, OPERATOR_NAMES},
  prompt::Prompt,
};

#[derive(Parser, Debug)]
#[command(name = "rxops")]
#[command(about = "Interactive demos of reactive stream operators", long_about = None)]
struct Args {
  /// Operator to demonstrate (case-insensitive)
  operator: Option<String>,

  /// Log filter, overrides RUST_LOG (e.g. `rxops=trace`)
  #[arg(long)]
  log_level: Option<String>,
}

fn usage() {
  println!("Please provide an operator name.");
  println!("Usage: rxops <{}>", OPERATOR_NAMES.replace(", ", "|"));
}

fn init_tracing(log_level: Option<&str>) {
  let filter = log_level
    .map(EnvFilter::new)
    .or_else(|| EnvFilter::try_from_default_env().ok())
    .unwrap_or_else(|| EnvFilter::new("warn"));
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(filter)
    .with_target(false)
    .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
  let args = match Args::try_parse() {
    Ok(args) => args,
    Err(e) if !e.use_stderr() => e.exit(),
    Err(_) => {
      usage();
      return ExitCode::FAILURE;
    }
  };
  init_tracing(args.log_level.as_deref());

  let Some(name) = args.operator else {
    usage();
    return ExitCode::FAILURE;
  };
  let operator = match name.parse::<Operator>() {
    Ok(operator) => operator,
    Err(e) => {
      println!("{e}");
      return ExitCode::FAILURE;
    }
  };

  match run(operator).await {
    Ok(true) => ExitCode::SUCCESS,
    Ok(false) => ExitCode::FAILURE,
    Err(e) => {
      error!(error = %e, "demo aborted");
      eprintln!("Error: {e:#}");
      ExitCode::FAILURE
    }
  }
}

/// Runs the demo to the end. `Ok(false)` means the stream ended in error.
async fn run(operator: Operator) -> Result<bool> {
  println!("Running example for: {}", operator.label());
  println!("---------------------------------\n");
  println!("Example: {}\n", operator.description());

  let scheduler = LocalScheduler::new();
  let mut prompt = Prompt::new()?;
  let pipeline = demo::build(operator, &mut prompt, &scheduler)?;

  let failed = Rc::new(Cell::new(false));
  let c_failed = failed.clone();
  let label = operator.label();
  pipeline.subscribe_all(
    move |v| println!("{label} -> {v}"),
    move |e: RxError| {
      warn!(kind = e.kind(), operator = label, "stream ended in error");
      eprintln!("{label} failed: {e}");
      c_failed.set(true);
    },
    move || println!("{}", operator.completion_message()),
  );

  scheduler.run().await;
  debug!(failed = failed.get(), "demo finished");
  Ok(!failed.get())
}
