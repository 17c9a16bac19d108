//! Client side of the music service: catalogue queries and authentication.

mod auth;
mod client;
mod fetch;

pub use auth::*;
pub use client::*;
pub use fetch::*;

#[cfg(test)]
mod tests;
