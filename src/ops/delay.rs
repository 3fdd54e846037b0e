use crate::{
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  scheduler::{Duration, LocalScheduler, TaskHandle},
  subscriber::Subscriber,
  subscription::DynamicSubscriptions,
};

#[derive(Default)]
struct DelayState {
  completed: bool,
  tasks: DynamicSubscriptions<TaskHandle>,
}

pub struct DelayObserver<Item, Err> {
  observer: Subscriber<Item, Err>,
  delay: Duration,
  scheduler: LocalScheduler,
  state: MutRc<DelayState>,
}

impl<Item: 'static, Err: 'static> Observer<Item, Err> for DelayObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    if self.observer.is_closed() {
      return;
    }
    let id = self.state.rc_deref_mut().tasks.reserve_id();
    let mut observer = self.observer.clone();
    let state = self.state.clone();
    let handle = self.scheduler.after(self.delay, move || {
      observer.next(value);
      let done = {
        let mut state = state.rc_deref_mut();
        state.tasks.remove(id);
        state.completed && state.tasks.is_empty()
      };
      if done {
        observer.complete();
      }
    });
    self.state.rc_deref_mut().tasks.insert(id, handle);
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) {
    let done = {
      let mut state = self.state.rc_deref_mut();
      state.completed = true;
      state.tasks.is_empty()
    };
    if done {
      self.observer.complete();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Shifts every value `delay` later in time on `scheduler`.
  ///
  /// Values keep their order. Completion is forwarded once every delayed
  /// value has been emitted; an error is forwarded at once and drops the
  /// values still waiting.
  pub fn delay(&self, delay: Duration, scheduler: &LocalScheduler) -> Self {
    let source = self.clone();
    let scheduler = scheduler.clone();
    Observable::new(move |observer: Subscriber<Item, Err>| {
      let state = MutRc::own(DelayState::default());
      let teardown_state = state.clone();
      observer.subscription().add_teardown(move || {
        let mut tasks = std::mem::take(&mut teardown_state.rc_deref_mut().tasks);
        tasks.unsubscribe_all();
      });
      source.subscribe(DelayObserver {
        observer,
        delay,
        scheduler: scheduler.clone(),
        state,
      })
    })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{prelude::*, scheduler::Instant};

  #[tokio::test(start_paused = true)]
  async fn keeps_order_and_delays_completion() {
    let scheduler = LocalScheduler::new();
    let start = Instant::now();
    let log = Rc::new(RefCell::new(vec![]));
    let done_at = Rc::new(RefCell::new(None));
    let (c_next, c_complete, c_done_at) = (log.clone(), log.clone(), done_at.clone());

    Observable::from_iter([1, 2, 3])
      .delay(Duration::from_millis(100), &scheduler)
      .subscribe_all(
        move |v| c_next.borrow_mut().push(v.to_string()),
        |_| {},
        move || {
          c_complete.borrow_mut().push("complete".to_string());
          *c_done_at.borrow_mut() = Some(Instant::now() - start);
        },
      );
    assert!(log.borrow().is_empty());
    scheduler.run().await;

    assert_eq!(*log.borrow(), vec!["1", "2", "3", "complete"]);
    assert!(*done_at.borrow() >= Some(Duration::from_millis(100)));
  }

  #[tokio::test(start_paused = true)]
  async fn error_is_not_delayed() {
    let scheduler = LocalScheduler::new();
    let log = Rc::new(RefCell::new(vec![]));
    let (c_next, c_error) = (log.clone(), log.clone());

    Observable::of(1)
      .concat(&Observable::throw(RxError::producer("now")))
      .delay(Duration::from_millis(100), &scheduler)
      .subscribe_all(
        move |v| c_next.borrow_mut().push(v.to_string()),
        move |e| c_error.borrow_mut().push(e.to_string()),
        || {},
      );
    assert_eq!(*log.borrow(), vec!["producer error: now"]);
    assert!(scheduler.is_idle());
    scheduler.run().await;
    assert_eq!(log.borrow().len(), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn dispose_cancels_pending_values() {
    let scheduler = LocalScheduler::new();
    let hit = Rc::new(RefCell::new(false));
    let c_hit = hit.clone();
    let subscription = Observable::from_iter([1, 2])
      .delay(Duration::from_millis(10), &scheduler)
      .subscribe_next(move |_| *c_hit.borrow_mut() = true);
    assert_eq!(scheduler.pending_count(), 2);
    subscription.unsubscribe();
    assert!(scheduler.is_idle());
    scheduler.run().await;
    assert!(!*hit.borrow());
  }
}
