use {
    crate::{Resolution, VideoError},
    std::path::Path,
};

pub type FourCc = [u8; 4];

/// Motion-JPEG, the only pixel format the manager requests.
pub const MJPEG: FourCc = *b"MJPG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Single-plane video capture.
    pub video_capture: bool,
    /// Buffer-queue streaming I/O.
    pub streaming: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFormat {
    pub resolution: Resolution,
    pub fourcc: FourCc,
}

/// Outcome of blocking until the device has a filled buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    /// Woke up without a filled buffer; wait again.
    Spurious,
    /// The descriptor reported an error or hangup.
    Hangup,
}

/// A filled buffer taken back from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dequeued {
    pub index: u32,
    pub bytes_used: usize,
}

/// A frame source that shares a pool of mapped buffers with its driver.
///
/// Dropping a `Mapping` releases it, so the owner of the mappings decides
/// when (and that only once) each region is unmapped.
pub trait StreamingDevice {
    type Mapping: AsRef<[u8]>;

    fn open(&mut self, path: &Path) -> Result<(), VideoError>; // fails with AlreadyOpen when open
    fn is_open(&self) -> bool;
    fn capabilities(&self) -> Result<Capabilities, VideoError>;
    fn set_format(&mut self, requested: FrameFormat) -> Result<FrameFormat, VideoError>; // returns what the driver settled on
    fn request_buffers(&mut self, count: u32) -> Result<u32, VideoError>; // returns the granted count
    fn map_buffer(&mut self, index: u32) -> Result<Self::Mapping, VideoError>;
    fn queue(&mut self, index: u32) -> Result<(), VideoError>;
    fn stream_on(&mut self) -> Result<(), VideoError>;
    fn wait_ready(&mut self) -> Result<Readiness, VideoError>;
    fn dequeue(&mut self) -> Result<Option<Dequeued>, VideoError>; // None when nothing was ready after all
    fn stream_off(&mut self) -> Result<(), VideoError>;
    fn close(&mut self);
}
