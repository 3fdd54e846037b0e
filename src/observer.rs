//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

use tracing::warn;

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// an Observable.
pub trait Observer<Item, Err> {
  /// Receive the next value from the observable
  fn next(&mut self, value: Item);

  /// Handle an error from the observable
  ///
  /// This consumes the observer, as no more values can be emitted after an
  /// error
  fn error(self, err: Err);

  /// Handle completion of the observable
  ///
  /// This consumes the observer, as no more values can be emitted after
  /// completion
  fn complete(self);

  /// Returns `true` if the observer will not accept more values.
  ///
  /// Synchronous sources poll this between emissions to stop early.
  fn is_closed(&self) -> bool;
}

/// Helper trait to enable object-safe Observers (Box<dyn Observer>)
///
/// Standard Observer trait is not object-safe because the terminal methods
/// take `self` by value. DynObserver mirrors the interface but adapts it for
/// vtables.
pub trait DynObserver<Item, Err> {
  fn box_next(&mut self, value: Item);
  fn box_error(self: Box<Self>, err: Err);
  fn box_complete(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T, Item, Err> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  fn box_next(&mut self, value: Item) { self.next(value); }
  fn box_error(self: Box<Self>, err: Err) { (*self).error(err); }
  fn box_complete(self: Box<Self>) { (*self).complete(); }
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// Boxed observer, the downstream end every producer talks to.
pub type BoxedObserver<Item, Err> = Box<dyn DynObserver<Item, Err>>;

impl<Item, Err> Observer<Item, Err> for BoxedObserver<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).box_next(value) }

  #[inline]
  fn error(self, err: Err) { self.box_error(err) }

  #[inline]
  fn complete(self) { self.box_complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).box_is_closed() }
}

/// Option observer - None ignores all events, Some delegates to inner
impl<O, Item, Err> Observer<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(inner) = self {
      inner.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(inner) = self {
      inner.error(err);
    }
  }

  fn complete(self) {
    if let Some(inner) = self {
      inner.complete();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().is_none_or(Observer::is_closed) }
}

type NextFn<Item> = Box<dyn FnMut(Item)>;
type ErrorFn<Err> = Box<dyn FnOnce(Err)>;
type CompleteFn = Box<dyn FnOnce()>;

/// An observer assembled from three optional callbacks.
///
/// ```rust
/// use rxops::prelude::*;
///
/// let observer = FnObserver::new()
///   .on_next(|v: i32| println!("value {v}"))
///   .on_error(|e: RxError| eprintln!("{e}"))
///   .on_complete(|| println!("done"));
/// Observable::from_iter([1, 2]).subscribe(observer);
/// ```
pub struct FnObserver<Item, Err> {
  next: Option<NextFn<Item>>,
  error: Option<ErrorFn<Err>>,
  complete: Option<CompleteFn>,
}

impl<Item, Err> Default for FnObserver<Item, Err> {
  fn default() -> Self { Self { next: None, error: None, complete: None } }
}

impl<Item, Err> FnObserver<Item, Err> {
  pub fn new() -> Self { Self::default() }

  pub fn on_next(mut self, f: impl FnMut(Item) + 'static) -> Self {
    self.next = Some(Box::new(f));
    self
  }

  pub fn on_error(mut self, f: impl FnOnce(Err) + 'static) -> Self {
    self.error = Some(Box::new(f));
    self
  }

  pub fn on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
    self.complete = Some(Box::new(f));
    self
  }
}

impl<Item, Err> Observer<Item, Err> for FnObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    if let Some(next) = self.next.as_mut() {
      next(value);
    }
  }

  fn error(self, err: Err) {
    match self.error {
      Some(error) => error(err),
      None => warn!("stream error reached an observer without an error callback"),
    }
  }

  fn complete(self) {
    if let Some(complete) = self.complete {
      complete();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;

  struct TestObserver {
    values: Vec<i32>,
  }

  impl Observer<i32, ()> for TestObserver {
    fn next(&mut self, value: i32) { self.values.push(value); }

    fn error(self, _: ()) {}

    fn complete(self) {}

    fn is_closed(&self) -> bool { false }
  }

  #[test]
  fn observer_trait() {
    let mut obs = TestObserver { values: vec![] };
    obs.next(1);
    obs.next(2);
    assert_eq!(obs.values, vec![1, 2]);
    assert!(!obs.is_closed());
  }

  #[test]
  fn boxed_observer_forwards() {
    let log = Rc::new(RefCell::new(vec![]));
    let (c_next, c_complete) = (log.clone(), log.clone());
    let mut boxed: BoxedObserver<i32, ()> = Box::new(
      FnObserver::new()
        .on_next(move |v: i32| c_next.borrow_mut().push(v))
        .on_complete(move || c_complete.borrow_mut().push(-1)),
    );
    boxed.next(7);
    boxed.complete();
    assert_eq!(*log.borrow(), vec![7, -1]);
  }

  #[test]
  fn missing_callbacks_are_ignored() {
    let mut observer = FnObserver::<i32, &str>::new();
    observer.next(1);
    observer.error("ignored");
  }

  #[test]
  fn none_observer_is_closed() {
    let observer: Option<TestObserver> = None;
    assert!(observer.is_closed());
  }
}
