//! The flattening engine behind `merge_map`, `concat_map`, `merge_all` and
//! `concat_all`.
//!
//! Every outer value is projected to an inner observable. Up to `concurrent`
//! inners run at once; surplus outer values wait in a FIFO queue and are
//! projected when an active inner completes. The result completes once the
//! outer has completed, the queue is empty and no inner is active. The first
//! error from either side ends everything.

use std::{collections::VecDeque, rc::Rc};

use tracing::trace;

use crate::{
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  subscriber::Subscriber,
  subscription::{DynamicSubscriptions, LocalSubscription, Subscription},
};

struct FlatMapState<Item> {
  pending: VecDeque<Item>,
  active: usize,
  outer_completed: bool,
  inner: DynamicSubscriptions<LocalSubscription>,
  closed: bool,
  /// Set while a `drain` loop is on the stack. Completions arriving then
  /// only release their slot and leave the launching to that loop.
  draining: bool,
}

impl<Item> Default for FlatMapState<Item> {
  fn default() -> Self {
    Self {
      pending: VecDeque::new(),
      active: 0,
      outer_completed: false,
      inner: DynamicSubscriptions::default(),
      closed: false,
      draining: false,
    }
  }
}

impl<Item> FlatMapState<Item> {
  fn is_done(&self) -> bool { self.outer_completed && self.active == 0 && self.pending.is_empty() }
}

/// What the outer and the inner observers of one subscription share.
struct FlatMapCore<Item, B, Err, F> {
  downstream: Subscriber<B, Err>,
  project: Rc<F>,
  concurrent: usize,
  state: MutRc<FlatMapState<Item>>,
}

impl<Item, B, Err, F> Clone for FlatMapCore<Item, B, Err, F> {
  fn clone(&self) -> Self {
    Self {
      downstream: self.downstream.clone(),
      project: self.project.clone(),
      concurrent: self.concurrent,
      state: self.state.clone(),
    }
  }
}

impl<Item, B, Err, F> FlatMapCore<Item, B, Err, F>
where
  Item: 'static,
  B: 'static,
  Err: 'static,
  F: Fn(Item) -> Observable<B, Err> + 'static,
{
  /// Launches queued values while slots are free. Inners that complete
  /// synchronously are replaced by the next iteration instead of a nested
  /// call, so the stack depth does not grow with the queue length.
  fn drain(&self) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.draining {
        return;
      }
      state.draining = true;
    }
    loop {
      let launch = {
        let mut state = self.state.rc_deref_mut();
        if state.closed || state.active >= self.concurrent {
          None
        } else {
          let value = state.pending.pop_front();
          if value.is_some() {
            state.active += 1;
          }
          value
        }
      };
      match launch {
        Some(value) => self.subscribe_inner(value),
        None => break,
      }
    }
    self.state.rc_deref_mut().draining = false;
    self.complete_if_done();
  }

  fn subscribe_inner(&self, value: Item) {
    let inner = (self.project)(value);
    let id = self.state.rc_deref_mut().inner.reserve_id();
    trace!(inner = id, "flat_map subscribe inner");
    let subscription = inner.subscribe(InnerObserver { core: self.clone(), id });

    let mut state = self.state.rc_deref_mut();
    if state.closed {
      drop(state);
      subscription.unsubscribe();
    } else if !subscription.is_closed() {
      state.inner.insert(id, subscription);
    }
  }

  fn complete_if_done(&self) {
    let done = self.state.rc_deref().is_done();
    if done {
      self.downstream.clone().complete();
    }
  }
}

struct OuterObserver<Item, B, Err, F> {
  core: FlatMapCore<Item, B, Err, F>,
}

impl<Item, B, Err, F> Observer<Item, Err> for OuterObserver<Item, B, Err, F>
where
  Item: 'static,
  B: 'static,
  Err: 'static,
  F: Fn(Item) -> Observable<B, Err> + 'static,
{
  fn next(&mut self, value: Item) {
    {
      let mut state = self.core.state.rc_deref_mut();
      if state.closed {
        return;
      }
      state.pending.push_back(value);
    }
    self.core.drain();
  }

  fn error(self, err: Err) { self.core.downstream.error(err) }

  fn complete(self) {
    self.core.state.rc_deref_mut().outer_completed = true;
    self.core.complete_if_done();
  }

  fn is_closed(&self) -> bool { self.core.downstream.is_closed() }
}

struct InnerObserver<Item, B, Err, F> {
  core: FlatMapCore<Item, B, Err, F>,
  id: usize,
}

impl<Item, B, Err, F> Observer<B, Err> for InnerObserver<Item, B, Err, F>
where
  Item: 'static,
  B: 'static,
  Err: 'static,
  F: Fn(Item) -> Observable<B, Err> + 'static,
{
  #[inline]
  fn next(&mut self, value: B) { self.core.downstream.next(value) }

  fn error(self, err: Err) { self.core.downstream.error(err) }

  fn complete(self) {
    let draining = {
      let mut state = self.core.state.rc_deref_mut();
      state.inner.remove(self.id);
      if state.closed {
        return;
      }
      state.active -= 1;
      state.draining
    };
    if !draining {
      self.core.drain();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.core.downstream.is_closed() }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Projects each value to an inner observable and merges all inners,
  /// subscribing each one as soon as its value arrives.
  ///
  /// Inner values are forwarded in the order they arrive, not in outer
  /// order.
  pub fn merge_map<B, F>(&self, project: F) -> Observable<B, Err>
  where
    B: 'static,
    F: Fn(Item) -> Observable<B, Err> + 'static,
  {
    self.merge_map_with_concurrency(usize::MAX, project)
  }

  /// Projects each value to an inner observable and runs the inners one
  /// after another, in outer order.
  pub fn concat_map<B, F>(&self, project: F) -> Observable<B, Err>
  where
    B: 'static,
    F: Fn(Item) -> Observable<B, Err> + 'static,
  {
    self.merge_map_with_concurrency(1, project)
  }

  /// [`merge_map`](Self::merge_map) with at most `concurrent` inners active
  /// at a time. Outer values beyond the limit are queued in arrival order. A
  /// limit of `0` is treated as `1`.
  pub fn merge_map_with_concurrency<B, F>(&self, concurrent: usize, project: F) -> Observable<B, Err>
  where
    B: 'static,
    F: Fn(Item) -> Observable<B, Err> + 'static,
  {
    let source = self.clone();
    let project = Rc::new(project);
    let concurrent = concurrent.max(1);
    Observable::new(move |downstream: Subscriber<B, Err>| {
      let state = MutRc::own(FlatMapState::default());
      let teardown_state = state.clone();
      downstream.subscription().add_teardown(move || {
        let mut inner = {
          let mut state = teardown_state.rc_deref_mut();
          state.closed = true;
          state.pending.clear();
          std::mem::take(&mut state.inner)
        };
        inner.unsubscribe_all();
      });

      let core = FlatMapCore {
        downstream: downstream.clone(),
        project: project.clone(),
        concurrent,
        state,
      };
      source.subscribe(OuterObserver { core })
    })
  }
}

impl<B: 'static, Err: 'static> Observable<Observable<B, Err>, Err> {
  /// Flattens a higher-order observable, keeping up to `concurrent` inners
  /// subscribed at once.
  pub fn merge_all(&self, concurrent: usize) -> Observable<B, Err> {
    self.merge_map_with_concurrency(concurrent, |inner| inner)
  }

  /// Flattens a higher-order observable one inner at a time.
  pub fn concat_all(&self) -> Observable<B, Err> { self.concat_map(|inner| inner) }
}
