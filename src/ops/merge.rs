use crate::observable::{from_iter, Observable};

/// Subscribes every source at once and forwards values in arrival order.
///
/// Completes after every source has completed. The first error is
/// forwarded and the remaining sources are disposed. An empty list
/// completes immediately.
pub fn merge<Item, Err>(sources: Vec<Observable<Item, Err>>) -> Observable<Item, Err>
where
  Item: 'static,
  Err: 'static,
{
  from_iter(sources).merge_all(usize::MAX)
}

/// Subscribes the sources one after another, each once its predecessor has
/// completed.
///
/// An error aborts the sequence: later sources are never subscribed.
pub fn concat<Item, Err>(sources: Vec<Observable<Item, Err>>) -> Observable<Item, Err>
where
  Item: 'static,
  Err: 'static,
{
  from_iter(sources).concat_all()
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Merges this observable with `other`, see [`merge`].
  pub fn merge(&self, other: &Self) -> Self { merge(vec![self.clone(), other.clone()]) }

  /// Emits every value of this observable, then every value of `other`, see
  /// [`concat`].
  pub fn concat(&self, other: &Self) -> Self { concat(vec![self.clone(), other.clone()]) }
}
