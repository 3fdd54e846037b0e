use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

pub struct TakeObserver<Item, Err> {
  observer: Subscriber<Item, Err>,
  count: usize,
  hits: usize,
}

impl<Item, Err> Observer<Item, Err> for TakeObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    if self.hits < self.count {
      self.hits += 1;
      self.observer.next(value);
      if self.hits == self.count {
        self.observer.clone().complete();
      }
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
  /// Emits only the first `count` values emitted by the source Observable.
  ///
  /// If the source emits fewer than `count` values then all of its values
  /// are emitted. After that, it completes, regardless if the source
  /// completes, and the source is disposed.
  ///
  /// ```
  /// use rxops::prelude::*;
  ///
  /// Observable::from_iter(0..10).take(5).subscribe_next(|v| println!("{v}"));
  ///
  /// // print logs:
  /// // 0
  /// // 1
  /// // 2
  /// // 3
  /// // 4
  /// ```
  pub fn take(&self, count: usize) -> Self {
    let source = self.clone();
    Observable::new(move |observer: Subscriber<Item, Err>| {
      if count == 0 {
        observer.complete();
        return None;
      }
      Some(source.subscribe(TakeObserver { observer, count, hits: 0 }))
    })
  }
}

#[cfg(test)]
mod test {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::prelude::*;

  #[test]
  fn base_function() {
    let completed = Rc::new(Cell::new(false));
    let next_count = Rc::new(Cell::new(0));
    let (c_completed, c_next) = (completed.clone(), next_count.clone());

    Observable::from_iter(0..100).take(5).subscribe_all(
      move |_| c_next.set(c_next.get() + 1),
      |_| {},
      move || c_completed.set(true),
    );

    assert!(completed.get());
    assert_eq!(next_count.get(), 5);
  }

  #[test]
  fn stops_infinite_synchronous_source() {
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    Observable::from_iter(0..).take(3).subscribe_next(move |v| c_seen.borrow_mut().push(v));
    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
  }

  #[test]
  fn take_zero_never_subscribes() {
    let subscribed = Rc::new(Cell::new(false));
    let completed = Rc::new(Cell::new(false));
    let (c_subscribed, c_completed) = (subscribed.clone(), completed.clone());
    Observable::<i32>::create(move |_| c_subscribed.set(true))
      .take(0)
      .subscribe_all(|_| {}, |_| {}, move || c_completed.set(true));
    assert!(!subscribed.get());
    assert!(completed.get());
  }

  #[tokio::test(start_paused = true)]
  async fn take_cancels_interval() {
    let scheduler = LocalScheduler::new();
    let seen = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_seen, c_completed) = (seen.clone(), completed.clone());
    Observable::interval(Duration::from_millis(10), &scheduler)
      .take(2)
      .subscribe_all(move |v| c_seen.borrow_mut().push(v), |_| {}, move || c_completed.set(true));
    scheduler.run().await;
    assert_eq!(*seen.borrow(), vec![0, 1]);
    assert!(completed.get());
    assert_eq!(scheduler.pending_count(), 0);
  }
}
