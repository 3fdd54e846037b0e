use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

pub struct MapObserver<B, Err, F> {
  observer: Subscriber<B, Err>,
  map: Rc<F>,
}

impl<Item, B, Err, F> Observer<Item, Err> for MapObserver<B, Err, F>
where
  F: Fn(Item) -> B,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next((self.map)(value)) }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

/// Like [`MapObserver`], for a transform that may fail. A failure is sent
/// downstream as the error and ends the stream.
pub struct TryMapObserver<B, Err, F> {
  observer: Subscriber<B, Err>,
  map: Rc<F>,
}

impl<Item, B, Err, F> Observer<Item, Err> for TryMapObserver<B, Err, F>
where
  F: Fn(Item) -> Result<B, Err>,
{
  fn next(&mut self, value: Item) {
    match (self.map)(value) {
      Ok(v) => self.observer.next(v),
      Err(e) => self.observer.clone().error(e),
    }
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  pub fn map<B, F>(&self, f: F) -> Observable<B, Err>
  where
    B: 'static,
    F: Fn(Item) -> B + 'static,
  {
    let source = self.clone();
    let map = Rc::new(f);
    Observable::new(move |observer: Subscriber<B, Err>| {
      source.subscribe(MapObserver { observer, map: map.clone() })
    })
  }

  /// Fallible [`map`](Self::map): an `Err` returned by `f` terminates the
  /// stream with that error instead of forwarding a value.
  pub fn try_map<B, F>(&self, f: F) -> Observable<B, Err>
  where
    B: 'static,
    F: Fn(Item) -> Result<B, Err> + 'static,
  {
    let source = self.clone();
    let map = Rc::new(f);
    Observable::new(move |observer: Subscriber<B, Err>| {
      source.subscribe(TryMapObserver { observer, map: map.clone() })
    })
  }
}
