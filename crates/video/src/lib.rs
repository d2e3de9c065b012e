//! Memory-mapped frame capture.
//!
//! `BufferManager` drives the request, map, queue, stream, dequeue, requeue
//! cycle of any `StreamingDevice` and hands every captured frame to a
//! `FrameSink`. The V4L2 backend lives behind the `v4l2` feature.

pub mod config;
pub mod device;
pub mod error;
pub mod manager;
pub mod pool;
pub mod resolution;
pub mod sink;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::CaptureConfig;
pub use device::{Capabilities, Dequeued, FourCc, FrameFormat, MJPEG, Readiness, StreamingDevice};
pub use error::{ResolutionError, VideoError};
pub use manager::{BufferManager, CaptureState, SessionStats};
pub use pool::{BufferPool, SlotState};
pub use resolution::Resolution;
pub use sink::{Frame, FrameSink};

#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Device;
