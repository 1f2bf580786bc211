//! Title resolution: media identifier to searchable title strings.

mod title;
mod types;

pub use title::{ResolverCaches, TitleResolver};
pub use types::*;
