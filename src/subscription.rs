//! Cancellation handles.
//!
//! A [`LocalSubscription`] is a node of the ownership tree described by the
//! subscribe calls of a pipeline. Each operator attaches what it owns (the
//! upstream node, scheduled tasks, inner subscriptions, teardown closures) as
//! children of the node its downstream handed it, so disposing the node the
//! caller holds tears down the whole chain, top-down, before returning.

use std::any::Any;

use smallvec::SmallVec;
use tracing::trace;

use crate::rc::MutRc;

mod boxed;
mod dynamic;

pub use boxed::*;
pub use dynamic::*;

/// A handle that can cancel some pending work.
pub trait Subscription {
  /// Stops the work behind this handle. Calling it on a handle that is
  /// already closed does nothing.
  fn unsubscribe(self);

  fn is_closed(&self) -> bool;

  /// Activates RAII behavior: the returned guard unsubscribes when dropped.
  ///
  /// **Attention:** binding the guard to `_` drops it immediately.
  fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self>
  where
    Self: Sized,
  {
    SubscriptionGuard::new(self)
  }
}

impl Subscription for () {
  #[inline]
  fn unsubscribe(self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

impl<S: Subscription> Subscription for Option<S> {
  fn unsubscribe(self) {
    if let Some(s) = self {
      s.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().is_none_or(Subscription::is_closed) }
}

/// A teardown closure run once on unsubscribe.
pub struct Teardown<F: FnOnce()>(F);

impl<F: FnOnce()> Teardown<F> {
  pub fn new(f: F) -> Self { Self(f) }
}

impl<F: FnOnce()> Subscription for Teardown<F> {
  fn unsubscribe(self) { (self.0)() }

  fn is_closed(&self) -> bool { false }
}

#[derive(Default)]
struct SubscriptionNode {
  closed: bool,
  teardown: SmallVec<[BoxedSubscription; 1]>,
}

/// A node of the subscription tree.
///
/// Cloning yields another handle to the same node.
#[derive(Clone, Default)]
pub struct LocalSubscription(MutRc<SubscriptionNode>);

impl LocalSubscription {
  pub fn new() -> Self { Self::default() }

  /// Attaches `subscription` as a child. If this node is already closed the
  /// child is disposed right away.
  pub fn add<S: Subscription + 'static>(&self, subscription: S) {
    if self.is_same(&subscription) {
      return;
    }
    let mut node = self.0.rc_deref_mut();
    if node.closed {
      drop(node);
      subscription.unsubscribe();
    } else {
      node.teardown.retain(|s| !s.is_closed());
      node.teardown.push(BoxedSubscription::new(subscription));
    }
  }

  /// Attaches a closure to run when this node is disposed.
  pub fn add_teardown(&self, f: impl FnOnce() + 'static) { self.add(Teardown::new(f)); }

  /// Number of live children.
  pub fn teardown_size(&self) -> usize { self.0.rc_deref().teardown.len() }

  fn is_same(&self, other: &dyn Any) -> bool {
    other.downcast_ref::<Self>().is_some_and(|other| self.0.ptr_eq(&other.0))
  }
}

impl Subscription for LocalSubscription {
  fn unsubscribe(self) {
    let teardown = {
      let mut node = self.0.rc_deref_mut();
      if node.closed {
        return;
      }
      node.closed = true;
      std::mem::take(&mut node.teardown)
    };
    trace!(children = teardown.len(), "dispose subscription");
    for child in teardown {
      child.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.rc_deref().closed }
}

impl std::fmt::Debug for LocalSubscription {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LocalSubscription")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(Option<T>);

impl<T: Subscription> SubscriptionGuard<T> {
  pub fn new(subscription: T) -> Self { Self(Some(subscription)) }

  /// Gives the subscription back without unsubscribing it.
  pub fn into_inner(mut self) -> Option<T> { self.0.take() }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  fn drop(&mut self) {
    if let Some(subscription) = self.0.take() {
      subscription.unsubscribe();
    }
  }
}
