mod client;
mod error;
#[cfg(any(test, feature = "testing"))]
pub mod memory;

pub use client::*;
pub use error::*;
