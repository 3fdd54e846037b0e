use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  scheduler::{Duration, Instant, LocalScheduler},
  subscriber::Subscriber,
};

/// Returns an observable which will emit a single `item` once after `delay`,
/// then complete.
pub fn timer<Item, Err>(item: Item, delay: Duration, scheduler: &LocalScheduler) -> Observable<Item, Err>
where
  Item: Clone + 'static,
  Err: 'static,
{
  let scheduler = scheduler.clone();
  Observable::new(move |mut subscriber: Subscriber<Item, Err>| {
    let value = item.clone();
    scheduler.after(delay, move || {
      subscriber.next(value);
      subscriber.complete();
    })
  })
}

/// Same as [`timer`] but fires at `at`. A timestamp in the past fires on the
/// next scheduler turn.
pub fn timer_at<Item, Err>(item: Item, at: Instant, scheduler: &LocalScheduler) -> Observable<Item, Err>
where
  Item: Clone + 'static,
  Err: 'static,
{
  timer(item, at.saturating_duration_since(scheduler.now()), scheduler)
}

impl<Item: Clone + 'static> Observable<Item> {
  pub fn timer(item: Item, delay: Duration, scheduler: &LocalScheduler) -> Self {
    timer::<_, RxError>(item, delay, scheduler)
  }

  pub fn timer_at(item: Item, at: Instant, scheduler: &LocalScheduler) -> Self {
    timer_at::<_, RxError>(item, at, scheduler)
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{prelude::*, scheduler::Instant};

  #[tokio::test(start_paused = true)]
  async fn emits_once_then_completes() {
    let scheduler = LocalScheduler::new();
    let start = Instant::now();
    let log = Rc::new(RefCell::new(vec![]));
    let fired_at = Rc::new(RefCell::new(None));
    let (c_next, c_complete, c_fired_at) = (log.clone(), log.clone(), fired_at.clone());

    Observable::timer("A1", Duration::from_millis(600), &scheduler).subscribe_all(
      move |v| {
        c_next.borrow_mut().push(v);
        *c_fired_at.borrow_mut() = Some(Instant::now() - start);
      },
      |_| {},
      move || c_complete.borrow_mut().push("complete"),
    );
    scheduler.run().await;

    assert_eq!(*log.borrow(), vec!["A1", "complete"]);
    assert!(*fired_at.borrow() >= Some(Duration::from_millis(600)));
  }

  #[tokio::test(start_paused = true)]
  async fn past_deadline_fires_immediately() {
    let scheduler = LocalScheduler::new();
    let hit = Rc::new(RefCell::new(false));
    let c_hit = hit.clone();
    let past = Instant::now();
    tokio::time::advance(Duration::from_millis(5)).await;

    Observable::timer_at(1, past, &scheduler).subscribe_next(move |_| *c_hit.borrow_mut() = true);
    scheduler.run().await;
    assert!(*hit.borrow());
  }

  #[tokio::test(start_paused = true)]
  async fn disposed_before_due_never_emits() {
    let scheduler = LocalScheduler::new();
    let hit = Rc::new(RefCell::new(false));
    let c_hit = hit.clone();
    Observable::timer(1, Duration::from_millis(5), &scheduler)
      .subscribe_next(move |_| *c_hit.borrow_mut() = true)
      .unsubscribe();
    scheduler.run().await;
    assert!(!*hit.borrow());
  }
}
