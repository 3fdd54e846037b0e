use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

pub struct FilterObserver<Item, Err, F> {
  observer: Subscriber<Item, Err>,
  filter: Rc<F>,
}

impl<Item, Err, F> Observer<Item, Err> for FilterObserver<Item, Err, F>
where
  F: Fn(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if (self.filter)(&value) {
      self.observer.next(value)
    }
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

pub struct TryFilterObserver<Item, Err, F> {
  observer: Subscriber<Item, Err>,
  filter: Rc<F>,
}

impl<Item, Err, F> Observer<Item, Err> for TryFilterObserver<Item, Err, F>
where
  F: Fn(&Item) -> Result<bool, Err>,
{
  fn next(&mut self, value: Item) {
    match (self.filter)(&value) {
      Ok(true) => self.observer.next(value),
      Ok(false) => {}
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

pub struct FilterMapObserver<B, Err, F> {
  observer: Subscriber<B, Err>,
  f: Rc<F>,
}

impl<Item, B, Err, F> Observer<Item, Err> for FilterMapObserver<B, Err, F>
where
  F: Fn(Item) -> Option<B>,
{
  fn next(&mut self, value: Item) {
    if let Some(v) = (self.f)(value) {
      self.observer.next(v)
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
  /// Emit only those items from an observable that pass a predicate.
  pub fn filter<F>(&self, filter: F) -> Self
  where
    F: Fn(&Item) -> bool + 'static,
  {
    let source = self.clone();
    let filter = Rc::new(filter);
    Observable::new(move |observer: Subscriber<Item, Err>| {
      source.subscribe(FilterObserver { observer, filter: filter.clone() })
    })
  }

  /// Fallible [`filter`](Self::filter): an `Err` from the predicate
  /// terminates the stream and the value is dropped.
  pub fn try_filter<F>(&self, filter: F) -> Self
  where
    F: Fn(&Item) -> Result<bool, Err> + 'static,
  {
    let source = self.clone();
    let filter = Rc::new(filter);
    Observable::new(move |observer: Subscriber<Item, Err>| {
      source.subscribe(TryFilterObserver { observer, filter: filter.clone() })
    })
  }

  /// Maps and filters in one step: `None` results are skipped.
  pub fn filter_map<B, F>(&self, f: F) -> Observable<B, Err>
  where
    B: 'static,
    F: Fn(Item) -> Option<B> + 'static,
  {
    let source = self.clone();
    let f = Rc::new(f);
    Observable::new(move |observer: Subscriber<B, Err>| {
      source.subscribe(FilterMapObserver { observer, f: f.clone() })
    })
  }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  fn collect<T: 'static>(o: &Observable<T>) -> Rc<RefCell<Vec<T>>> {
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    o.subscribe_next(move |v| c_seen.borrow_mut().push(v));
    seen
  }

  #[test]
  fn keeps_matching_in_order() {
    let seen = collect(&Observable::from_iter([5.0, 12.0, 3.0, 20.0]).filter(|v| *v > 4.0));
    assert_eq!(*seen.borrow(), vec![5.0, 12.0, 20.0]);
  }

  #[test]
  fn completes_even_when_nothing_passes() {
    let completed = Rc::new(RefCell::new(false));
    let c_completed = completed.clone();
    Observable::from_iter(0..10)
      .filter(|_| false)
      .subscribe_all(|_| panic!("filtered out"), |_| {}, move || *c_completed.borrow_mut() = true);
    assert!(*completed.borrow());
  }

  #[test]
  fn try_filter_error_stops_stream() {
    let log = Rc::new(RefCell::new(vec![]));
    let (c_next, c_error, c_complete) = (log.clone(), log.clone(), log.clone());
    Observable::from_iter(1..10)
      .try_filter(|v| match v {
        4 => Err(RxError::transform("four")),
        v => Ok(v % 2 == 1),
      })
      .subscribe_all(
        move |v| c_next.borrow_mut().push(v.to_string()),
        move |e| c_error.borrow_mut().push(e.to_string()),
        move || c_complete.borrow_mut().push("complete".into()),
      );
    assert_eq!(*log.borrow(), vec!["1", "3", "transform error: four"]);
  }

  #[test]
  fn filter_map_skips_none() {
    let seen = collect(&Observable::from_iter(["1", "x", "3"]).filter_map(|s| s.parse::<i32>().ok()));
    assert_eq!(*seen.borrow(), vec![1, 3]);
  }
}
