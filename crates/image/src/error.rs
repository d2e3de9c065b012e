use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The frame does not start with a readable JPEG header.
    #[error("broken JPEG header: {0}")]
    Header(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    /// The codec panicked; the panic was stopped at the stage boundary.
    #[error("codec failure during {stage}: {message}")]
    Internal { stage: &'static str, message: String },

    #[error("invalid raw image: {0}")]
    InvalidImage(String),

    #[error("can't write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CodecError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CodecError::Io {
            path: path.into(),
            source,
        }
    }
}
