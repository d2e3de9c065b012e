use {
    crate::*,
    std::thread,
};

/// Where the manager is in its capture lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Not initialized, or initialized and not yet streaming.
    Idle,
    /// Every slot handed to the driver, stream not started.
    Queued,
    Streaming,
    /// Loop finished, stream-off pending.
    Draining,
    Stopped,
}

impl CaptureState {
    fn name(&self) -> &'static str {
        match self {
            CaptureState::Idle => "idle",
            CaptureState::Queued => "queued",
            CaptureState::Streaming => "streaming",
            CaptureState::Draining => "draining",
            CaptureState::Stopped => "stopped",
        }
    }
}

/// Bookkeeping of one capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    /// Frames the sink persisted.
    pub frames_taken: u64,
    /// Frames dropped to satisfy the skip quota.
    pub frames_skipped: u64,
    /// Frames the sink rejected while errors were ignored.
    pub frames_failed: u64,
    pub streaming: bool,
}

enum Outcome {
    Skipped,
    Persisted,
    Failed,
    Abort(VideoError),
}

/// Owns a streaming device and its buffer pool for the whole
/// initialize, capture, teardown lifecycle.
pub struct BufferManager<D: StreamingDevice> {
    // dropped before the device, so every mapping is gone before close
    pool: BufferPool<D::Mapping>,
    device: D,
    config: CaptureConfig,
    format: Option<FrameFormat>,
    state: CaptureState,
    stats: SessionStats,
}

impl<D: StreamingDevice> BufferManager<D> {
    pub fn new(device: D, config: CaptureConfig) -> Self {
        Self {
            pool: BufferPool::new(),
            device,
            config,
            format: None,
            state: CaptureState::Idle,
            stats: SessionStats::default(),
        }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn pool(&self) -> &BufferPool<D::Mapping> {
        &self.pool
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// The format the driver settled on, once initialized.
    pub fn format(&self) -> Option<FrameFormat> {
        self.format
    }

    /// Open the device, check it can stream, negotiate MJPEG and map the
    /// buffer pool. The first failing step ends initialization; whatever was
    /// mapped so far stays in the pool and is released on teardown.
    pub fn initialize(&mut self) -> Result<(), VideoError> {
        if self.device.is_open() {
            log::error!("'{}' is already open", self.config.device().display());
            return Err(VideoError::AlreadyOpen);
        }

        let path = self.config.device().to_path_buf();
        self.device.open(&path)?;
        log::info!("opened '{}'", path.display());

        let capabilities = self.device.capabilities()?;
        if !capabilities.video_capture {
            return Err(VideoError::Unsupported("single-plane video capture"));
        }
        if !capabilities.streaming {
            return Err(VideoError::Unsupported("streaming I/O"));
        }

        self.format = Some(self.negotiate_format()?);

        let requested = self.config.buffer_count();
        let granted = self.device.request_buffers(requested)?;
        if granted == 0 {
            return Err(VideoError::Buffer {
                index: 0,
                message: "driver granted no buffers".to_string(),
            });
        }
        if granted != requested {
            log::warn!("requested {requested} buffers, driver granted {granted}");
        }
        for index in 0..granted {
            let mapping = self.device.map_buffer(index)?;
            if mapping.as_ref().is_empty() {
                return Err(VideoError::Buffer {
                    index,
                    message: "mapped region is empty".to_string(),
                });
            }
            self.pool.push(mapping);
        }
        log::debug!("mapped {} buffers", self.pool.len());

        Ok(())
    }

    fn negotiate_format(&mut self) -> Result<FrameFormat, VideoError> {
        let requested = FrameFormat {
            resolution: self.config.resolution(),
            fourcc: MJPEG,
        };
        let actual = self.device.set_format(requested)?;
        if actual.fourcc != MJPEG {
            return Err(VideoError::Format(format!(
                "driver switched to {} instead of MJPG",
                String::from_utf8_lossy(&actual.fourcc)
            )));
        }
        if actual.resolution != requested.resolution {
            log::warn!(
                "requested {}, driver adjusted to {}",
                requested.resolution,
                actual.resolution
            );
        } else {
            log::info!("format MJPG {}", actual.resolution);
        }
        Ok(actual)
    }

    /// Run the capture loop until enough frames are persisted (or forever in
    /// loop mode), feeding each frame to `sink`.
    ///
    /// Stream-off is issued exactly once on the way out, also when queueing
    /// or stream-on failed. Its failure is the result even when the loop
    /// itself succeeded.
    pub fn capture<S: FrameSink>(&mut self, sink: &mut S) -> Result<SessionStats, VideoError> {
        if !matches!(self.state, CaptureState::Idle | CaptureState::Stopped) {
            return Err(VideoError::State {
                expected: "idle",
                actual: self.state.name(),
            });
        }
        if self.pool.is_empty() {
            return Err(VideoError::NotOpen);
        }
        self.stats = SessionStats::default();

        if let Err(error) = self.start_streaming() {
            // the driver may hold some slots or even stream already
            if let Err(stop_error) = self.stop_streaming() {
                log::error!("{stop_error}");
            }
            return Err(error);
        }

        let result = self.run(sink);

        self.state = CaptureState::Draining;
        let stopped = self.stop_streaming();

        match (result, stopped) {
            (Ok(()), Ok(())) => Ok(self.stats),
            (Ok(()), Err(error)) => Err(error),
            (Err(error), Err(stop_error)) => {
                log::error!("{stop_error}");
                Err(error)
            }
            (Err(error), Ok(())) => Err(error),
        }
    }

    fn start_streaming(&mut self) -> Result<(), VideoError> {
        for index in self.pool.indices() {
            self.device.queue(index)?;
            self.pool.mark_queued(index)?;
        }
        self.state = CaptureState::Queued;

        self.device.stream_on()?;
        self.state = CaptureState::Streaming;
        self.stats.streaming = true;
        log::debug!("stream on");
        Ok(())
    }

    fn run<S: FrameSink>(&mut self, sink: &mut S) -> Result<(), VideoError> {
        while self.config.loop_mode() || self.stats.frames_taken < self.config.count() {
            match self.device.wait_ready()? {
                Readiness::Ready => {}
                Readiness::Spurious => {
                    log::warn!("woke up without a filled buffer");
                    continue;
                }
                Readiness::Hangup => return Err(VideoError::Hangup),
            }

            let Some(Dequeued { index, bytes_used }) = self.device.dequeue()? else {
                log::warn!("no buffer to dequeue after wake-up");
                continue;
            };
            self.pool.mark_dequeued(index)?;

            let outcome = self.process(sink, index, bytes_used);

            // requeue whatever happened, the pool never shrinks
            let requeued = self
                .device
                .queue(index)
                .and_then(|()| self.pool.mark_queued(index));
            if let Err(requeue_error) = requeued {
                if let Outcome::Abort(error) = outcome {
                    log::error!("{requeue_error}");
                    return Err(error);
                }
                return Err(requeue_error);
            }

            match outcome {
                Outcome::Skipped | Outcome::Failed => {}
                Outcome::Persisted => {
                    let pause = self.config.pause();
                    if !pause.is_zero() {
                        thread::sleep(pause);
                    }
                }
                Outcome::Abort(error) => return Err(error),
            }
        }
        Ok(())
    }

    fn process<S: FrameSink>(&mut self, sink: &mut S, index: u32, bytes_used: usize) -> Outcome {
        if self.stats.frames_skipped < self.config.skip() {
            self.stats.frames_skipped += 1;
            log::debug!(
                "skipped frame {} of {}",
                self.stats.frames_skipped,
                self.config.skip()
            );
            return Outcome::Skipped;
        }

        let data = match self.pool.frame(index, bytes_used) {
            Ok(data) => data,
            Err(error) => return Outcome::Abort(error),
        };
        let sequence = self.stats.frames_taken;
        match sink.persist(Frame {
            data,
            slot: index,
            sequence,
        }) {
            Ok(()) => {
                self.stats.frames_taken += 1;
                Outcome::Persisted
            }
            Err(error) if self.config.ignore_errors() => {
                log::error!("frame {sequence}: {error}");
                self.stats.frames_failed += 1;
                Outcome::Failed
            }
            Err(error) => Outcome::Abort(VideoError::Frame {
                sequence,
                source: Box::new(error),
            }),
        }
    }

    fn stop_streaming(&mut self) -> Result<(), VideoError> {
        let result = self.device.stream_off();
        self.state = CaptureState::Stopped;
        self.stats.streaming = false;
        self.pool.mark_all_idle();
        log::debug!("stream off");
        result
    }

    /// Stop streaming if needed, unmap the pool and close the device.
    /// Safe to call more than once; also runs on drop.
    pub fn shutdown(&mut self) {
        if matches!(
            self.state,
            CaptureState::Queued | CaptureState::Streaming | CaptureState::Draining
        ) {
            if let Err(error) = self.stop_streaming() {
                log::error!("{error}");
            }
        }
        self.pool.clear();
        if self.device.is_open() {
            self.device.close();
            log::debug!("closed '{}'", self.config.device().display());
        }
        self.format = None;
        self.state = CaptureState::Idle;
    }
}

impl<D: StreamingDevice> Drop for BufferManager<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
