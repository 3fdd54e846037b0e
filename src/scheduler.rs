//! Wall-clock scheduler for a single cooperative execution context.
//!
//! [`LocalScheduler`] keeps a queue of timed callbacks ordered by deadline,
//! then by registration order. Nothing runs until [`LocalScheduler::run`] is
//! awaited; it then sleeps until the earliest deadline, runs that callback to
//! completion, and repeats until the queue is empty. A registration made
//! while `run` sleeps (from another task on the same runtime) wakes it, so an
//! earlier deadline is never held up by a later one. Callbacks never overlap
//! with each other or with the code that registered them.
//!
//! The clock is [`tokio::time::Instant`]. Under a paused tokio runtime
//! (`#[tokio::test(start_paused = true)]`) time advances instantly to the
//! next deadline, which makes every ordering exact. On a real clock the only
//! source of nondeterminism is jitter between deadlines that are a few
//! microseconds apart.

use std::{
  cell::Cell,
  cmp::Ordering,
  collections::{BinaryHeap, HashMap},
  rc::Rc,
};

use tokio::sync::Notify;
pub use tokio::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::{
  error::RxError,
  rc::{MutRc, WeakMutRc},
  subscription::Subscription,
};

enum TaskFn {
  Once(Box<dyn FnOnce()>),
  Repeat(Box<dyn FnMut()>, Duration),
}

struct ScheduledTask {
  callback: TaskFn,
  closed: Rc<Cell<bool>>,
}

/// Queue entry. `rank` is the registration order and doubles as the task id.
struct Entry {
  deadline: Instant,
  rank: usize,
}

impl PartialEq for Entry {
  fn eq(&self, other: &Self) -> bool { self.deadline == other.deadline && self.rank == other.rank }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Entry {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier deadline first, then FIFO by registration
    other
      .deadline
      .cmp(&self.deadline)
      .then_with(|| other.rank.cmp(&self.rank))
  }
}

#[derive(Default)]
struct SchedulerState {
  queue: BinaryHeap<Entry>,
  tasks: HashMap<usize, ScheduledTask>,
  next_rank: usize,
  /// Signalled on every registration so a sleeping `run` re-reads the
  /// earliest deadline.
  wakeup: Rc<Notify>,
}

/// Single-threaded timer queue. Cloning yields another handle to the same
/// queue.
#[derive(Clone, Default)]
pub struct LocalScheduler(MutRc<SchedulerState>);

/// Cancel token for a task registered with [`LocalScheduler`].
///
/// Cancelling drops the callback immediately. Cancelling twice, or after a
/// one-shot task has fired, does nothing.
#[derive(Clone)]
pub struct TaskHandle {
  id: usize,
  closed: Rc<Cell<bool>>,
  scheduler: WeakMutRc<SchedulerState>,
}

impl TaskHandle {
  pub fn cancel(&self) {
    if self.closed.replace(true) {
      return;
    }
    trace!(task = self.id, "cancel scheduled task");
    if let Some(state) = self.scheduler.upgrade() {
      // released before the callback is dropped, its captures may cancel
      // other tasks
      let removed = state.rc_deref_mut().tasks.remove(&self.id);
      drop(removed);
    }
  }
}

impl Subscription for TaskHandle {
  #[inline]
  fn unsubscribe(self) { self.cancel() }

  #[inline]
  fn is_closed(&self) -> bool { self.closed.get() }
}

impl LocalScheduler {
  pub fn new() -> Self { Self::default() }

  #[inline]
  pub fn now(&self) -> Instant { Instant::now() }

  /// Runs `callback` once, no earlier than `delay` from now.
  pub fn after(&self, delay: Duration, callback: impl FnOnce() + 'static) -> TaskHandle {
    self.schedule(self.now() + delay, TaskFn::Once(Box::new(callback)))
  }

  /// Runs `callback` every `period`, first one `period` from now, until the
  /// returned handle is cancelled.
  pub fn every(&self, period: Duration, callback: impl FnMut() + 'static) -> TaskHandle {
    self.schedule(self.now() + period, TaskFn::Repeat(Box::new(callback), period))
  }

  pub fn cancel(&self, handle: &TaskHandle) { handle.cancel() }

  /// Number of tasks still waiting to fire.
  pub fn pending_count(&self) -> usize { self.0.rc_deref().tasks.len() }

  pub fn is_idle(&self) -> bool { self.pending_count() == 0 }

  /// Drives the queue until no task is left.
  ///
  /// Must be awaited on a tokio runtime with the time driver enabled.
  pub async fn run(&self) {
    debug!(pending = self.pending_count(), "scheduler run");
    let wakeup = self.0.rc_deref().wakeup.clone();
    while let Some(deadline) = self.next_deadline() {
      if deadline > self.now() {
        tokio::select! {
          _ = tokio::time::sleep_until(deadline) => {}
          _ = wakeup.notified() => trace!("new task while sleeping"),
        }
        continue;
      }
      self.fire_next();
    }
    debug!("scheduler idle");
  }

  /// Runs [`run`](Self::run) to the end on a fresh current-thread runtime.
  pub fn block_on_run(&self) -> Result<(), RxError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
      .enable_time()
      .build()
      .map_err(|e| RxError::scheduler(e.to_string()))?;
    runtime.block_on(self.run());
    Ok(())
  }

  fn schedule(&self, deadline: Instant, callback: TaskFn) -> TaskHandle {
    let closed = Rc::new(Cell::new(false));
    let mut state = self.0.rc_deref_mut();
    let id = state.next_rank;
    state.next_rank += 1;
    state.queue.push(Entry { deadline, rank: id });
    state
      .tasks
      .insert(id, ScheduledTask { callback, closed: closed.clone() });
    trace!(task = id, "schedule task");
    state.wakeup.notify_one();
    TaskHandle { id, closed, scheduler: self.0.downgrade() }
  }

  /// Earliest deadline of a live task, dropping entries of cancelled ones.
  fn next_deadline(&self) -> Option<Instant> {
    let mut state = self.0.rc_deref_mut();
    loop {
      let (deadline, rank) = state.queue.peek().map(|e| (e.deadline, e.rank))?;
      if state.tasks.contains_key(&rank) {
        return Some(deadline);
      }
      state.queue.pop();
    }
  }

  fn fire_next(&self) {
    let (entry, task) = {
      let mut state = self.0.rc_deref_mut();
      let Some(entry) = state.queue.pop() else {
        return;
      };
      match state.tasks.remove(&entry.rank) {
        Some(task) => (entry, task),
        None => return,
      }
    };
    trace!(task = entry.rank, "fire task");

    let ScheduledTask { callback, closed } = task;
    match callback {
      TaskFn::Once(f) => {
        closed.set(true);
        f();
      }
      TaskFn::Repeat(mut f, period) => {
        f();
        if !closed.get() {
          let mut state = self.0.rc_deref_mut();
          state
            .queue
            .push(Entry { deadline: entry.deadline + period, rank: entry.rank });
          state
            .tasks
            .insert(entry.rank, ScheduledTask { callback: TaskFn::Repeat(f, period), closed });
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;

  fn log() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnOnce()>) {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let push = move |name: &'static str| {
      let log = c_log.clone();
      Box::new(move || log.borrow_mut().push(name)) as Box<dyn FnOnce()>
    };
    (log, push)
  }

  #[tokio::test(start_paused = true)]
  async fn earlier_deadline_fires_first() {
    let scheduler = LocalScheduler::new();
    let (log, push) = log();
    scheduler.after(Duration::from_millis(300), push("slow"));
    scheduler.after(Duration::from_millis(100), push("fast"));
    scheduler.run().await;
    assert_eq!(*log.borrow(), vec!["fast", "slow"]);
  }

  #[tokio::test(start_paused = true)]
  async fn ties_fire_in_registration_order() {
    let scheduler = LocalScheduler::new();
    let (log, push) = log();
    scheduler.after(Duration::from_millis(50), push("a"));
    scheduler.after(Duration::from_millis(50), push("b"));
    scheduler.after(Duration::from_millis(50), push("c"));
    scheduler.run().await;
    assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
  }

  #[tokio::test(start_paused = true)]
  async fn fires_no_earlier_than_delay() {
    let scheduler = LocalScheduler::new();
    let start = Instant::now();
    let fired_at = Rc::new(Cell::new(None));
    let c_fired_at = fired_at.clone();
    scheduler.after(Duration::from_millis(120), move || c_fired_at.set(Some(Instant::now())));
    scheduler.run().await;
    let elapsed = fired_at.get().map(|at| at - start);
    assert!(elapsed >= Some(Duration::from_millis(120)));
  }

  #[tokio::test(start_paused = true)]
  async fn cancel_is_idempotent_and_safe_after_fire() {
    let scheduler = LocalScheduler::new();
    let (log, push) = log();
    let cancelled = scheduler.after(Duration::from_millis(10), push("cancelled"));
    let fired = scheduler.after(Duration::from_millis(10), push("fired"));
    scheduler.cancel(&cancelled);
    scheduler.cancel(&cancelled);
    assert_eq!(scheduler.pending_count(), 1);
    scheduler.run().await;
    scheduler.cancel(&fired);
    assert!(fired.is_closed());
    assert_eq!(*log.borrow(), vec!["fired"]);
  }

  #[tokio::test(start_paused = true)]
  async fn every_repeats_until_self_cancel() {
    let scheduler = LocalScheduler::new();
    let ticks = Rc::new(Cell::new(0));
    let handle: Rc<RefCell<Option<TaskHandle>>> = Rc::default();

    let c_ticks = ticks.clone();
    let c_handle = handle.clone();
    let task = scheduler.every(Duration::from_millis(10), move || {
      c_ticks.set(c_ticks.get() + 1);
      if c_ticks.get() == 3 {
        if let Some(handle) = c_handle.borrow().as_ref() {
          handle.cancel();
        }
      }
    });
    *handle.borrow_mut() = Some(task);

    let start = Instant::now();
    scheduler.run().await;
    assert_eq!(ticks.get(), 3);
    assert!(Instant::now() - start >= Duration::from_millis(30));
    assert!(scheduler.is_idle());
  }

  #[tokio::test(start_paused = true)]
  async fn periodic_and_once_interleave_by_deadline() {
    let scheduler = LocalScheduler::new();
    let log = Rc::new(RefCell::new(vec![]));

    let c_log = log.clone();
    let mut n = 0;
    let every = scheduler.every(Duration::from_millis(20), move || {
      c_log.borrow_mut().push(format!("tick{n}"));
      n += 1;
    });
    let c_log = log.clone();
    scheduler.after(Duration::from_millis(50), move || {
      c_log.borrow_mut().push("once".to_string());
      every.cancel();
    });
    scheduler.run().await;
    assert_eq!(*log.borrow(), vec!["tick0", "tick1", "once"]);
  }

  #[tokio::test(start_paused = true)]
  async fn callbacks_may_schedule_more_work() {
    let scheduler = LocalScheduler::new();
    let (log, push) = log();
    let inner = scheduler.clone();
    let late = push("nested");
    scheduler.after(Duration::from_millis(5), move || {
      inner.after(Duration::from_millis(5), late);
    });
    scheduler.run().await;
    assert_eq!(*log.borrow(), vec!["nested"]);
  }

  #[tokio::test(start_paused = true)]
  async fn task_registered_while_sleeping_fires_on_time() {
    let scheduler = LocalScheduler::new();
    let start = Instant::now();
    let (log, push) = log();
    scheduler.after(Duration::from_millis(1000), push("slow"));

    let fired_at = Rc::new(Cell::new(None));
    let c_fired_at = fired_at.clone();
    let late_registration = async {
      tokio::time::sleep(Duration::from_millis(10)).await;
      scheduler.after(Duration::from_millis(5), move || c_fired_at.set(Some(Instant::now())));
    };
    tokio::join!(scheduler.run(), late_registration);

    let elapsed = fired_at.get().map(|at| at - start);
    assert!(elapsed >= Some(Duration::from_millis(15)));
    assert!(elapsed < Some(Duration::from_millis(100)));
    assert_eq!(*log.borrow(), vec!["slow"]);
  }

  #[test]
  fn block_on_run_drives_real_clock() {
    let scheduler = LocalScheduler::new();
    let hit = Rc::new(Cell::new(false));
    let c_hit = hit.clone();
    scheduler.after(Duration::from_millis(1), move || c_hit.set(true));
    assert!(scheduler.block_on_run().is_ok());
    assert!(hit.get());
  }
}
