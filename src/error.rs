use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type used across the library.
pub type Result<T> = std::result::Result<T, TarotError>;

/// Failures raised while scanning, composing or writing a deck animation.
#[derive(Debug, Error)]
pub enum TarotError {
    #[error("source directory not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("not enough cards: found {found}, required {required}")]
    InsufficientCards { found: usize, required: usize },

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("no frames could be composed")]
    NoFrames,

    #[error("failed to process image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode animation: {0}")]
    Encode(#[from] image::ImageError),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TarotError {
    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
