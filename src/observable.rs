//! The cold [`Observable`] and its sources.
//!
//! An `Observable` is nothing but a shared producer closure. Subscribing
//! creates a fresh subscription node and a [`Subscriber`] and calls the
//! producer with it, so two subscriptions never share state.

use std::rc::Rc;

use tracing::trace;

use crate::{
  error::RxError,
  observer::{FnObserver, Observer},
  subscriber::Subscriber,
  subscription::{BoxedSubscription, LocalSubscription, Subscription},
};

mod from_iter;
mod interval;
mod timer;
mod trivial;

pub use from_iter::*;
pub use interval::*;
pub use timer::*;
pub use trivial::*;

type Producer<Item, Err> = dyn Fn(Subscriber<Item, Err>) -> BoxedSubscription;

/// A representation of any set of values over any amount of time.
///
/// Cloning is cheap and yields the same description; each `subscribe` call
/// runs the producer again from scratch.
///
/// ```rust
/// use rxops::prelude::*;
///
/// let doubled = Observable::from_iter(1..=3).map(|v| v * 2);
/// let mut seen = vec![];
/// doubled.subscribe_next(move |v| seen.push(v));
/// ```
pub struct Observable<Item, Err = RxError> {
  producer: Rc<Producer<Item, Err>>,
}

impl<Item, Err> Clone for Observable<Item, Err> {
  fn clone(&self) -> Self { Self { producer: self.producer.clone() } }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// param `producer`: the function that is called every time the Observable
  /// is subscribed to. It is given a [`Subscriber`] to which new values can
  /// be `next`ed, or `error`/`complete` can be called, and returns whatever
  /// must be disposed when the subscription ends.
  pub fn new<F, U>(producer: F) -> Self
  where
    F: Fn(Subscriber<Item, Err>) -> U + 'static,
    U: Subscription + 'static,
  {
    Self {
      producer: Rc::new(move |subscriber: Subscriber<Item, Err>| {
        BoxedSubscription::new(producer(subscriber))
      }),
    }
  }

  /// Runs the producer for `observer` and returns the root of the new
  /// subscription tree.
  ///
  /// Synchronous sources have already finished when this returns, and the
  /// returned subscription is closed.
  pub fn subscribe<O>(&self, observer: O) -> LocalSubscription
  where
    O: Observer<Item, Err> + 'static,
  {
    let subscription = LocalSubscription::default();
    let subscriber = Subscriber::new(observer, subscription.clone());
    trace!("subscribe");
    let teardown = (self.producer)(subscriber);
    subscription.add(teardown);
    subscription
  }

  pub fn subscribe_next(&self, next: impl FnMut(Item) + 'static) -> LocalSubscription {
    self.subscribe(FnObserver::new().on_next(next))
  }

  pub fn subscribe_all(
    &self,
    next: impl FnMut(Item) + 'static,
    error: impl FnOnce(Err) + 'static,
    complete: impl FnOnce() + 'static,
  ) -> LocalSubscription {
    self.subscribe(
      FnObserver::new()
        .on_next(next)
        .on_error(error)
        .on_complete(complete),
    )
  }
}

impl<Item: 'static> Observable<Item> {
  /// Builds an observable from a producer closure, with [`RxError`] as the
  /// error type.
  pub fn create<F, U>(producer: F) -> Self
  where
    F: Fn(Subscriber<Item, RxError>) -> U + 'static,
    U: Subscription + 'static,
  {
    Self::new(producer)
  }
}
