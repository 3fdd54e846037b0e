use std::collections::VecDeque;

use crate::{
  observer::{BoxedObserver, Observer},
  rc::MutRc,
  subscription::{LocalSubscription, Subscription},
};

enum Notification<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

/// The observer handed to a producer.
///
/// Wraps the downstream observer together with the subscription node of one
/// subscribe call. It enforces the observer contract for every producer:
///
/// - after `error` or `complete` nothing else is delivered;
/// - once the node is disposed nothing is delivered;
/// - a terminal notification disposes the node (and with it every upstream
///   subscription and scheduled task attached to it).
///
/// Clones share the same downstream observer, so a producer can hand copies
/// to timers or inner streams. A notification sent through a clone while the
/// downstream observer is still handling the previous one is queued and
/// delivered right after it returns.
pub struct Subscriber<Item, Err> {
  observer: MutRc<Option<BoxedObserver<Item, Err>>>,
  backlog: MutRc<VecDeque<Notification<Item, Err>>>,
  subscription: LocalSubscription,
}

impl<Item, Err> Clone for Subscriber<Item, Err> {
  fn clone(&self) -> Self {
    Self {
      observer: self.observer.clone(),
      backlog: self.backlog.clone(),
      subscription: self.subscription.clone(),
    }
  }
}

impl<Item: 'static, Err: 'static> Subscriber<Item, Err> {
  pub fn new<O>(observer: O, subscription: LocalSubscription) -> Self
  where
    O: Observer<Item, Err> + 'static,
  {
    let observer: BoxedObserver<Item, Err> = Box::new(observer);
    Self {
      observer: MutRc::own(Some(observer)),
      backlog: MutRc::own(VecDeque::new()),
      subscription,
    }
  }
}

impl<Item, Err> Subscriber<Item, Err> {
  /// The subscription node this subscriber feeds.
  #[inline]
  pub fn subscription(&self) -> &LocalSubscription { &self.subscription }

  /// Ties `teardown` to this subscriber: it is disposed when the stream
  /// terminates or the caller unsubscribes.
  #[inline]
  pub fn add<S: Subscription + 'static>(&self, teardown: S) { self.subscription.add(teardown) }

  fn dispatch(&self, notification: Notification<Item, Err>) {
    if self.subscription.is_closed() {
      return;
    }
    if !self.deliver(notification) {
      return;
    }
    loop {
      let queued = self.backlog.rc_deref_mut().pop_front();
      let Some(notification) = queued else {
        break;
      };
      if self.subscription.is_closed() {
        self.backlog.rc_deref_mut().clear();
        break;
      }
      self.deliver(notification);
    }
  }

  /// Hands `notification` to the downstream observer, or queues it when that
  /// observer is busy further up the stack. Returns `false` if queued.
  fn deliver(&self, notification: Notification<Item, Err>) -> bool {
    let Some(mut slot) = self.observer.try_rc_deref_mut() else {
      self.backlog.rc_deref_mut().push_back(notification);
      return false;
    };
    match notification {
      Notification::Next(value) => {
        if let Some(observer) = slot.as_mut() {
          observer.next(value);
        }
      }
      Notification::Error(err) => {
        let observer = slot.take();
        drop(slot);
        if let Some(observer) = observer {
          observer.error(err);
        }
        self.subscription.clone().unsubscribe();
      }
      Notification::Complete => {
        let observer = slot.take();
        drop(slot);
        if let Some(observer) = observer {
          observer.complete();
        }
        self.subscription.clone().unsubscribe();
      }
    }
    true
  }
}

impl<Item, Err> Observer<Item, Err> for Subscriber<Item, Err> {
  fn next(&mut self, value: Item) { self.dispatch(Notification::Next(value)) }

  fn error(self, err: Err) { self.dispatch(Notification::Error(err)) }

  fn complete(self) { self.dispatch(Notification::Complete) }

  fn is_closed(&self) -> bool {
    if self.subscription.is_closed() {
      return true;
    }
    // a slot borrowed further up the stack is busy delivering, so still open
    self.observer.try_rc_deref().is_some_and(|slot| match &*slot {
      Some(observer) => observer.is_closed(),
      None => true,
    })
  }
}
