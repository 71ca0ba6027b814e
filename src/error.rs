use std::{io, path::PathBuf};

use thiserror::Error;

/// Reasons a conversion can stop.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("File '{}' not found", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error loading image '{}'", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to create output directory '{}'", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode {file_name}")]
    Encode {
        file_name: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
