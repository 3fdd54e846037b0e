use crate::{error::RxError, observable::Observable, observer::Observer, subscriber::Subscriber};

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted. Never emits an error. The
/// error type is left to the caller so the source can feed any pipeline; see
/// [`Observable::from_iter`] for the [`RxError`] flavour.
///
/// The iterator is cloned on every subscribe, so each subscription sees the
/// whole sequence. Emission stops early once the subscriber is disposed.
pub fn from_iter<Iter, Err>(iter: Iter) -> Observable<Iter::Item, Err>
where
  Iter: IntoIterator + Clone + 'static,
  Iter::Item: 'static,
  Err: 'static,
{
  Observable::new(move |mut subscriber: Subscriber<Iter::Item, Err>| {
    for v in iter.clone() {
      if subscriber.is_closed() {
        return;
      }
      subscriber.next(v);
    }
    subscriber.complete();
  })
}

/// Creates an observable producing same value repeated N times.
pub fn repeat<Item, Err>(v: Item, n: usize) -> Observable<Item, Err>
where
  Item: Clone + 'static,
  Err: 'static,
{
  from_iter(std::iter::repeat(v).take(n))
}

impl<Item: 'static> Observable<Item> {
  /// Creates an observable that emits every element of `iter`, then
  /// completes.
  ///
  /// ```
  /// use rxops::prelude::*;
  ///
  /// Observable::from_iter(vec![0, 1, 2, 3]).subscribe_next(|v| println!("{v},"));
  /// ```
  pub fn from_iter<Iter>(iter: Iter) -> Self
  where
    Iter: IntoIterator<Item = Item> + Clone + 'static,
  {
    from_iter::<_, RxError>(iter)
  }

  /// Creates an observable that emits `v` once, then completes.
  pub fn of(v: Item) -> Self
  where
    Item: Clone,
  {
    from_iter::<_, RxError>([v])
  }

  /// Creates an observable that emits `v` `n` times, then completes.
  pub fn repeat(v: Item, n: usize) -> Self
  where
    Item: Clone,
  {
    repeat::<_, RxError>(v, n)
  }
}

/// Creates an observable emitting the listed values in order, then
/// completing.
///
/// ```
/// use rxops::{of, prelude::*};
///
/// of!["A", "B", "C"].subscribe_next(|v| println!("{v}"));
/// ```
#[macro_export]
macro_rules! of {
  ($($v:expr),* $(,)?) => {
    $crate::observable::Observable::from_iter([$($v),*])
  };
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[test]
  fn from_range() {
    let hit_count = Rc::new(RefCell::new(0));
    let completed = Rc::new(RefCell::new(false));
    let (c_hit, c_completed) = (hit_count.clone(), completed.clone());
    Observable::from_iter(0..100).subscribe_all(
      move |_| *c_hit.borrow_mut() += 1,
      |_| {},
      move || *c_completed.borrow_mut() = true,
    );

    assert_eq!(*hit_count.borrow(), 100);
    assert!(*completed.borrow());
  }

  #[test]
  fn from_vec_keeps_order() {
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    Observable::from_iter(vec!["A", "B", "C"]).subscribe_next(move |v| c_seen.borrow_mut().push(v));
    assert_eq!(*seen.borrow(), vec!["A", "B", "C"]);
  }

  #[test]
  fn empty_iter_completes() {
    let completed = Rc::new(RefCell::new(false));
    let c_completed = completed.clone();
    Observable::from_iter(Vec::<i32>::new()).subscribe_all(
      |_| panic!("no value expected"),
      |_| {},
      move || *c_completed.borrow_mut() = true,
    );
    assert!(*completed.borrow());
  }

  #[test]
  fn repeat_three_times() {
    let sum = Rc::new(RefCell::new(0));
    let c_sum = sum.clone();
    Observable::repeat(123, 3).subscribe_next(move |v| *c_sum.borrow_mut() += v);
    assert_eq!(*sum.borrow(), 369);
  }

  #[test]
  fn of_macro_and_single_value() {
    let seen = Rc::new(RefCell::new(vec![]));
    let (c1, c2) = (seen.clone(), seen.clone());
    crate::of![1, 2, 3].subscribe_next(move |v| c1.borrow_mut().push(v));
    Observable::of(4).subscribe_next(move |v| c2.borrow_mut().push(v));
    assert_eq!(*seen.borrow(), vec![1, 2, 3, 4]);
  }

  #[test]
  fn resubscribe_replays_everything() {
    let seen = Rc::new(RefCell::new(vec![]));
    let source = Observable::from_iter(1..=2);
    for _ in 0..2 {
      let c_seen = seen.clone();
      source.subscribe_next(move |v| c_seen.borrow_mut().push(v));
    }
    assert_eq!(*seen.borrow(), vec![1, 2, 1, 2]);
  }
}
