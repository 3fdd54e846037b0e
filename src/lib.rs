//! # rxops: single-threaded reactive streams
//!
//! Cold observables, a wall-clock scheduler and the classic transformation,
//! flattening and combination operators.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxops::prelude::*;
//!
//! Observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe_next(|v| println!("Value: {}", v));
//! ```
//!
//! Timed sources register callbacks with a [`LocalScheduler`]; nothing fires
//! until the scheduler is driven:
//!
//! ```rust
//! use rxops::prelude::*;
//!
//! let scheduler = LocalScheduler::new();
//! Observable::interval(Duration::from_millis(1), &scheduler)
//!   .take(3)
//!   .subscribe_next(|v| println!("tick {v}"));
//! scheduler.block_on_run().unwrap();
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | Cold, cloneable description of a stream |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`LocalScheduler`] | Timer queue driving every asynchronous emission |
//!
//! Everything runs on one thread: values reach observers either inside
//! `subscribe` or inside a scheduler callback, never concurrently.
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`LocalScheduler`]: scheduler::LocalScheduler

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subscriber;
pub mod subscription;

pub use prelude::*;
