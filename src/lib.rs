mod chunks;
mod converter;
mod error;
mod filters;
pub mod png;
mod sizes;

pub use converter::{convert, load_source, normalize, render, write_artifacts, Artifact};
pub use error::{ConvertError, Result};
pub use sizes::{SizeSpec, FAVICON_SIZES};
