//! Library state store: playlists, favorites, imported tracks and the
//! transient catalogue results (search, popular).

mod model;
mod reducer;
mod scan;
pub mod validate;

pub use model::*;
pub use reducer::*;
pub use scan::*;

#[cfg(test)]
mod tests;
