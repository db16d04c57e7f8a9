mod any;
mod gcs;
mod interface;
mod local;
mod memory;

pub use any::*;
pub use gcs::*;
pub use interface::*;
pub use local::*;
pub use memory::*;
