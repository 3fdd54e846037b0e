use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

/// Folds every value into `acc`; the result is only emitted on completion.
pub struct ReduceObserver<Acc, Err, F> {
  observer: Subscriber<Acc, Err>,
  acc: Option<Acc>,
  reduce: Rc<F>,
}

impl<Item, Acc, Err, F> Observer<Item, Err> for ReduceObserver<Acc, Err, F>
where
  F: Fn(Acc, Item) -> Acc,
{
  fn next(&mut self, value: Item) {
    if let Some(acc) = self.acc.take() {
      self.acc = Some((self.reduce)(acc, value));
    }
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) {
    let Self { mut observer, acc, .. } = self;
    if let Some(acc) = acc {
      observer.next(acc);
    }
    observer.complete();
  }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Applies `f` to an accumulator and each value, starting from `seed`, and
  /// emits the final accumulator once the source completes.
  ///
  /// A source that completes without values emits `seed`. A source that
  /// errors never emits the accumulator.
  pub fn reduce<Acc, F>(&self, seed: Acc, f: F) -> Observable<Acc, Err>
  where
    Acc: Clone + 'static,
    F: Fn(Acc, Item) -> Acc + 'static,
  {
    let source = self.clone();
    let reduce = Rc::new(f);
    Observable::new(move |observer: Subscriber<Acc, Err>| {
      source.subscribe(ReduceObserver {
        observer,
        acc: Some(seed.clone()),
        reduce: reduce.clone(),
      })
    })
  }
}
