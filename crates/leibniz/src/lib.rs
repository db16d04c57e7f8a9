#![doc = include_str!("../README.md")]

mod accumulate;
mod deadline;
mod error;
mod estimate;
pub mod fanout;
mod series;

pub use crate::accumulate::*;
pub use crate::deadline::*;
pub use crate::error::*;
pub use crate::estimate::*;
pub use crate::fanout::threaded;
#[cfg(feature = "async-tokio")]
pub use crate::fanout::tokio;
pub use crate::series::*;
