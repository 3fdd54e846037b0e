//! IntoStream Operator
//!
//! Converts an [`Observable`] into a `futures::Stream`, so emissions can be
//! consumed with the usual async patterns like `while let` loops.
//!
//! # Example
//!
//! ```rust
//! use futures::StreamExt;
//! use rxops::prelude::*;
//!
//! # futures::executor::block_on(async {
//! let mut stream = Observable::of(1).into_stream();
//!
//! if let Some(Ok(value)) = stream.next().await {
//!   println!("Received: {}", value);
//! }
//! # });
//! ```

use std::{
  pin::Pin,
  task::{Context, Poll},
};

use futures::{
  channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender},
  Stream,
};
use pin_project_lite::pin_project;

use crate::{
  observable::Observable,
  observer::Observer,
  subscription::{LocalSubscription, Subscription, SubscriptionGuard},
};

pin_project! {
  /// A `Stream` that yields values emitted by an `Observable`.
  ///
  /// - `Ok(T)`: emitted for each `next` value from the observable.
  /// - `Err(E)`: emitted when the observable signals an `error`.
  /// - `None`: end of stream, after `complete` or after the error.
  ///
  /// Dropping the stream disposes the subscription.
  pub struct IntoStream<Item, Err> {
    #[pin]
    receiver: UnboundedReceiver<Result<Item, Err>>,
    subscription: SubscriptionGuard<LocalSubscription>,
  }
}

impl<Item, Err> Stream for IntoStream<Item, Err> {
  type Item = Result<Item, Err>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    self.project().receiver.poll_next(cx)
  }
}

/// Forwards every notification into the channel. Dropping the sender on a
/// terminal notification ends the stream.
struct IntoStreamObserver<Item, Err> {
  sender: UnboundedSender<Result<Item, Err>>,
}

impl<Item, Err> Observer<Item, Err> for IntoStreamObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    // a failed send means the stream is gone and its guard is disposing us
    let _ = self.sender.unbounded_send(Ok(value));
  }

  fn error(self, err: Err) { let _ = self.sender.unbounded_send(Err(err)); }

  fn complete(self) {}

  fn is_closed(&self) -> bool { self.sender.is_closed() }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Subscribes now and returns a stream of everything this observable
  /// emits.
  ///
  /// Values are buffered without bound until polled.
  pub fn into_stream(&self) -> IntoStream<Item, Err> {
    let (sender, receiver) = unbounded();
    let subscription = self.subscribe(IntoStreamObserver { sender });
    IntoStream { receiver, subscription: subscription.unsubscribe_when_dropped() }
  }
}
