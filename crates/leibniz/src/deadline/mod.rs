mod interface;
mod monotonic;

pub use interface::*;
pub use monotonic::*;
