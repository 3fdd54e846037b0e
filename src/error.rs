//! Error taxonomy carried on the error channel of an [`Observable`].
//!
//! [`Observable`]: crate::observable::Observable

use thiserror::Error;

/// Errors that can terminate a stream.
///
/// Any variant reaching an observer is terminal: the chain that produced it
/// is disposed and no further notification is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RxError {
  /// A source failed to produce a value, e.g. malformed input handed to
  /// `from_iter` after parsing.
  #[error("producer error: {0}")]
  Producer(String),

  /// A user supplied function inside an operator failed.
  #[error("transform error: {0}")]
  Transform(String),

  /// The scheduler could not run. Not expected in normal operation.
  #[error("scheduler error: {0}")]
  Scheduler(String),
}

impl RxError {
  pub fn producer(msg: impl Into<String>) -> Self { Self::Producer(msg.into()) }

  pub fn transform(msg: impl Into<String>) -> Self { Self::Transform(msg.into()) }

  pub fn scheduler(msg: impl Into<String>) -> Self { Self::Scheduler(msg.into()) }

  /// Short name of the variant, used in log fields.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Producer(_) => "producer",
      Self::Transform(_) => "transform",
      Self::Scheduler(_) => "scheduler",
    }
  }
}
