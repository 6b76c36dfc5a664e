pub mod types;
pub mod mjpeg;
pub mod error;

pub use types::*;
pub use error::*;

#[cfg(test)]
mod mjpeg_test;
