use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  scheduler::{Duration, LocalScheduler},
  subscriber::Subscriber,
};

/// Creates an observable which will fire at `period` time into the future,
/// and will repeat every `period` interval after, emitting 0, 1, 2, ...
///
/// Never completes on its own; dispose the subscription (or limit it with
/// `take`) to stop the timer.
pub fn interval<Err: 'static>(period: Duration, scheduler: &LocalScheduler) -> Observable<usize, Err> {
  let scheduler = scheduler.clone();
  Observable::new(move |mut subscriber: Subscriber<usize, Err>| {
    let mut seq = 0;
    scheduler.every(period, move || {
      subscriber.next(seq);
      seq += 1;
    })
  })
}

impl Observable<usize> {
  pub fn interval(period: Duration, scheduler: &LocalScheduler) -> Self {
    interval::<RxError>(period, scheduler)
  }
}
