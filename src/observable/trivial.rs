use crate::{error::RxError, observable::Observable, observer::Observer, subscriber::Subscriber};

/// Creates an observable that emits no items, just terminates with an error.
pub fn throw<Item, Err>(e: Err) -> Observable<Item, Err>
where
  Item: 'static,
  Err: Clone + 'static,
{
  Observable::new(move |subscriber: Subscriber<Item, Err>| subscriber.error(e.clone()))
}

/// Creates an observable that produces no values and completes immediately.
pub fn empty<Item: 'static, Err: 'static>() -> Observable<Item, Err> {
  Observable::new(|subscriber: Subscriber<Item, Err>| subscriber.complete())
}

/// Creates an observable that never emits anything, neither values nor
/// errors, and never completes.
pub fn never<Item: 'static, Err: 'static>() -> Observable<Item, Err> {
  Observable::new(|_: Subscriber<Item, Err>| {})
}

impl<Item: 'static> Observable<Item> {
  pub fn throw(e: RxError) -> Self { throw(e) }

  pub fn empty() -> Self { empty() }

  pub fn never() -> Self { never() }
}
