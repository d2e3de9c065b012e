use {
    std::{io, path::PathBuf},
    thiserror::Error,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("'{0}' is not of the form <width>x<height>")]
    MissingSeparator(String),
    #[error("'{0}' is not a valid dimension")]
    InvalidNumber(String),
    #[error("'{0}' has a zero dimension")]
    Empty(String),
}

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("couldn't open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("device is already open")]
    AlreadyOpen,
    #[error("device is not open")]
    NotOpen,
    #[error("device doesn't support {0}")]
    Unsupported(&'static str),
    #[error("format: {0}")]
    Format(String),
    #[error("{op} failed: {source}")]
    Ioctl {
        op: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("buffer {index}: {message}")]
    Buffer { index: u32, message: String },
    #[error("readiness wait failed: {0}")]
    Wait(#[source] io::Error),
    #[error("device reported an error or hangup")]
    Hangup,
    #[error("capture needs state {expected}, manager is {actual}")]
    State {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("frame {sequence}: {source}")]
    Frame {
        sequence: u64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl VideoError {
    pub(crate) fn ioctl(op: &'static str) -> impl FnOnce(io::Error) -> VideoError {
        move |source| VideoError::Ioctl { op, source }
    }
}
