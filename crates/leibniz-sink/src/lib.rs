#![doc = include_str!("../README.md")]

mod destination;
mod error;
mod key;
mod sink;

pub use crate::destination::*;
pub use crate::error::*;
pub use crate::key::*;
pub use crate::sink::*;
// Public re-export so downstream crates can name store errors without a
// direct dependency.
pub use object_store;
