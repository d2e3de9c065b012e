use {
    crate::Resolution,
    std::{
        path::{Path, PathBuf},
        time::Duration,
    },
};

/// Number of buffers shared with the driver.
pub const DEFAULT_BUFFER_COUNT: u32 = 32;

/// Configuration for one capture session.
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    device: PathBuf,
    resolution: Resolution,
    buffer_count: u32,
    count: u64,
    skip: u64,
    pause: Duration,
    loop_mode: bool,
    ignore_errors: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from("/dev/video0"),
            resolution: Resolution::default(),
            buffer_count: DEFAULT_BUFFER_COUNT,
            count: 1,
            skip: 0,
            pause: Duration::ZERO,
            loop_mode: false,
            ignore_errors: false,
        }
    }
}

impl CaptureConfig {
    /// Set the device path (e.g., "/dev/video0").
    pub fn with_device(mut self, device: impl Into<PathBuf>) -> Self {
        self.device = device.into();
        self
    }

    /// Set the requested resolution.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the number of buffers requested from the driver.
    pub fn with_buffer_count(mut self, buffer_count: u32) -> Self {
        self.buffer_count = buffer_count;
        self
    }

    /// Set the number of frames to persist.
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    /// Set the number of frames dropped before the first persisted one.
    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Set the pause after each persisted frame.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Capture until a fatal error, ignoring the frame count.
    pub fn with_loop_mode(mut self, loop_mode: bool) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    /// Keep capturing when a frame can't be persisted.
    pub fn with_ignore_errors(mut self, ignore_errors: bool) -> Self {
        self.ignore_errors = ignore_errors;
        self
    }

    // Getters
    pub fn device(&self) -> &Path {
        &self.device
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn buffer_count(&self) -> u32 {
        self.buffer_count
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }

    pub fn pause(&self) -> Duration {
        self.pause
    }

    pub fn loop_mode(&self) -> bool {
        self.loop_mode
    }

    pub fn ignore_errors(&self) -> bool {
        self.ignore_errors
    }
}
