//! Persistence bridge between the stores and a local key-value storage.

mod bridge;
mod snapshot;
mod storage;

pub use bridge::*;
pub use snapshot::*;
pub use storage::*;

#[cfg(test)]
mod tests;
