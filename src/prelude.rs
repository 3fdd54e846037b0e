//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::{
  error::RxError,
  observable::Observable,
  observer::{FnObserver, Observer},
  ops::{concat, into_stream::IntoStream, merge, zip_all},
  scheduler::{Duration, Instant, LocalScheduler, TaskHandle},
  subscriber::Subscriber,
  subscription::{LocalSubscription, Subscription, SubscriptionGuard},
};
