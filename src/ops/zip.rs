//! Zip operator implementation
//!
//! Zip combines items from several observables index-wise, emitting a row
//! once every source has a value buffered.

use std::collections::VecDeque;

use crate::{
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  subscriber::Subscriber,
};

// ==================== Shared State ====================

/// One FIFO buffer and a completion flag per source.
struct ZipState<Item> {
  buffers: Vec<VecDeque<Item>>,
  completed: Vec<bool>,
}

impl<Item> ZipState<Item> {
  fn new(sources: usize) -> Self {
    Self {
      buffers: (0..sources).map(|_| VecDeque::new()).collect(),
      completed: vec![false; sources],
    }
  }

  /// Pops the next row if every buffer has a value.
  fn take_row(&mut self) -> Option<Vec<Item>> {
    if self.buffers.iter().any(VecDeque::is_empty) {
      return None;
    }
    self.buffers.iter_mut().map(VecDeque::pop_front).collect()
  }

  /// A completed source with nothing left to pair ends the zip.
  fn is_exhausted(&self) -> bool {
    self
      .completed
      .iter()
      .zip(&self.buffers)
      .any(|(completed, buffer)| *completed && buffer.is_empty())
  }
}

// ==================== Observer ====================

struct ZipObserver<Item, Err> {
  downstream: Subscriber<Vec<Item>, Err>,
  state: MutRc<ZipState<Item>>,
  index: usize,
}

impl<Item, Err> Observer<Item, Err> for ZipObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    let (row, exhausted) = {
      let mut state = self.state.rc_deref_mut();
      state.buffers[self.index].push_back(value);
      match state.take_row() {
        Some(row) => (Some(row), state.is_exhausted()),
        None => (None, false),
      }
    };
    if let Some(row) = row {
      self.downstream.next(row);
    }
    if exhausted {
      self.downstream.clone().complete();
    }
  }

  fn error(self, err: Err) { self.downstream.error(err) }

  fn complete(self) {
    let exhausted = {
      let mut state = self.state.rc_deref_mut();
      state.completed[self.index] = true;
      state.buffers[self.index].is_empty()
    };
    if exhausted {
      self.downstream.complete();
    }
  }

  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}

// ==================== Operators ====================

/// Subscribes to all `sources` and emits one `Vec` per index, holding the
/// n-th value of every source in source order.
///
/// Completes as soon as some source has completed and its buffer is empty;
/// values still buffered for other sources are dropped. An empty list
/// completes immediately.
pub fn zip_all<Item, Err>(sources: Vec<Observable<Item, Err>>) -> Observable<Vec<Item>, Err>
where
  Item: 'static,
  Err: 'static,
{
  Observable::new(move |downstream: Subscriber<Vec<Item>, Err>| {
    if sources.is_empty() {
      downstream.complete();
      return;
    }
    let state = MutRc::own(ZipState::new(sources.len()));
    for (index, source) in sources.iter().enumerate() {
      if downstream.is_closed() {
        return;
      }
      let observer = ZipObserver { downstream: downstream.clone(), state: state.clone(), index };
      downstream.add(source.subscribe(observer));
    }
  })
}

enum Side<A, B> {
  Left(A),
  Right(B),
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Pairs the n-th value of this observable with the n-th value of `other`.
  ///
  /// ```
  /// use rxops::prelude::*;
  ///
  /// Observable::from_iter(["A", "B", "C"])
  ///   .zip(&Observable::from_iter([1, 2]))
  ///   .subscribe_next(|(letter, n)| println!("{letter}{n}"));
  /// // A1
  /// // B2
  /// ```
  pub fn zip<B: 'static>(&self, other: &Observable<B, Err>) -> Observable<(Item, B), Err> {
    let left = self.map(Side::<Item, B>::Left);
    let right = other.map(Side::<Item, B>::Right);
    zip_all(vec![left, right]).filter_map(|row| {
      let mut row = row.into_iter();
      match (row.next(), row.next()) {
        (Some(Side::Left(a)), Some(Side::Right(b))) => Some((a, b)),
        _ => None,
      }
    })
  }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::prelude::*;

  type Log = Rc<RefCell<Vec<String>>>;

  fn record<T: 'static>(o: &Observable<T>, show: impl Fn(T) -> String + 'static) -> Log {
    let log: Log = Rc::default();
    let (c_next, c_error, c_complete) = (log.clone(), log.clone(), log.clone());
    o.subscribe_all(
      move |v| c_next.borrow_mut().push(show(v)),
      move |e| c_error.borrow_mut().push(format!("error: {e}")),
      move || c_complete.borrow_mut().push("complete".into()),
    );
    log
  }

  #[test]
  fn shorter_source_ends_zip() {
    let o = Observable::from_iter(["A", "B", "C"]).zip(&Observable::from_iter([1, 2]));
    let log = record(&o, |(l, n)| format!("({l},{n})"));
    assert_eq!(*log.borrow(), vec!["(A,1)", "(B,2)", "complete"]);
  }

  #[test]
  fn n_ary_rows_keep_source_order() {
    let o = zip_all(vec![
      Observable::from_iter([1, 2]),
      Observable::from_iter([10, 20]),
      Observable::from_iter([100, 200, 300]),
    ]);
    let log = record(&o, |row| format!("{row:?}"));
    assert_eq!(*log.borrow(), vec!["[1, 10, 100]", "[2, 20, 200]", "complete"]);
  }

  #[test]
  fn empty_list_completes() {
    let log = record(&zip_all::<i32, RxError>(vec![]), |row| format!("{row:?}"));
    assert_eq!(*log.borrow(), vec!["complete"]);
  }

  #[tokio::test(start_paused = true)]
  async fn buffers_until_slow_side_arrives() {
    let scheduler = LocalScheduler::new();
    let fast = Observable::from_iter(["A", "B", "C"]);
    let slow = Observable::interval(Duration::from_millis(100), &scheduler);
    let log = record(&fast.zip(&slow), |(l, n)| format!("{l}{n}"));
    scheduler.run().await;
    assert_eq!(*log.borrow(), vec!["A0", "B1", "C2", "complete"]);
    assert!(scheduler.is_idle());
  }

  #[tokio::test(start_paused = true)]
  async fn error_disposes_other_sources() {
    let scheduler = LocalScheduler::new();
    let ticking = Observable::interval(Duration::from_millis(10), &scheduler);
    let failing = Observable::timer(0, Duration::from_millis(35), &scheduler)
      .try_map(|_| Err::<usize, _>(RxError::producer("zip side failed")));
    let log = record(&zip_all(vec![ticking, failing]), |row| format!("{row:?}"));
    scheduler.run().await;
    assert_eq!(*log.borrow(), vec!["error: producer error: zip side failed"]);
    assert!(scheduler.is_idle());
  }
}
