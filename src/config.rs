//! Configuration loader and schema types.
//!
//! Settings come from struct defaults, an optional TOML file and
//! `CADENZA__*` environment variables, in increasing precedence.

mod load;
mod schema;

pub use load::default_data_dir;
pub use schema::*;
