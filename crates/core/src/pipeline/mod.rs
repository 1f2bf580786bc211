//! Stream pipeline: titles, then torrents, then playable URLs.

mod caches;
mod stream;
mod types;

pub use caches::PipelineCaches;
pub use stream::{Collaborators, StreamPipeline};
pub use types::*;
