mod error;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod stores;
pub mod tables;
mod utils;

pub use error::*;
pub use stores::*;
pub use tables::*;
pub use utils::*;
