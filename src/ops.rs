//! Operators, each added to [`Observable`](crate::observable::Observable) as
//! inherent methods from its own module.

pub mod delay;
pub mod filter;
pub mod flat_map;
pub mod into_stream;
pub mod map;
pub mod merge;
pub mod reduce;
pub mod take;
pub mod zip;

pub use merge::{concat, merge};
pub use zip::zip_all;
