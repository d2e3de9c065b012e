#![allow(dead_code)]

use {
    std::{cell::RefCell, collections::VecDeque, path::Path, rc::Rc, time::Instant},
    video::*,
};

// every mapping is at least this large; frames occupy the front
pub const SLOT_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Open,
    Capabilities,
    SetFormat,
    RequestBuffers(u32),
    Map(u32),
    Unmap(u32),
    Queue(u32),
    StreamOn,
    Wait,
    Dequeue(u32),
    StreamOff,
    Close,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn count(log: &CallLog, call: Call) -> usize {
    log.borrow().iter().filter(|&&c| c == call).count()
}

pub fn count_matching(log: &CallLog, f: impl Fn(&Call) -> bool) -> usize {
    log.borrow().iter().filter(|c| f(c)).count()
}

pub fn position(log: &CallLog, call: Call) -> Option<usize> {
    log.borrow().iter().position(|&c| c == call)
}

pub struct FakeMapping {
    index: u32,
    data: Vec<u8>,
    log: CallLog,
}

impl AsRef<[u8]> for FakeMapping {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl Drop for FakeMapping {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Call::Unmap(self.index));
    }
}

/// In-memory device. Scripted frames are assigned to slots round-robin when
/// the slots are mapped; the driver queue is FIFO, so with at least as many
/// slots as frames the n-th dequeue delivers the n-th frame.
pub struct FakeDevice {
    pub log: CallLog,
    pub capabilities: Capabilities,
    pub negotiated: Option<FrameFormat>,
    pub grant: Option<u32>,
    pub fail_open: bool,
    pub fail_map_at: Option<u32>,
    pub fail_stream_off: bool,
    /// Number of stream-on attempts that fail before one succeeds.
    pub stream_on_failures: usize,
    /// Zero-based dequeue that fails with an ioctl error.
    pub fail_dequeue_at: Option<usize>,
    /// Zero-based queue call (counting the initial fill) that fails.
    pub fail_queue_at: Option<usize>,
    /// When each readiness wait started.
    pub wait_times: Rc<RefCell<Vec<Instant>>>,
    pub hangup_after: Option<usize>,
    pub spurious_wakes: usize,
    pub frames: Vec<Vec<u8>>,
    open: bool,
    driver_queue: VecDeque<u32>,
    dequeued: usize,
    queued: usize,
}

impl FakeDevice {
    pub fn new(frames: Vec<Vec<u8>>) -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
            capabilities: Capabilities {
                video_capture: true,
                streaming: true,
            },
            negotiated: None,
            grant: None,
            fail_open: false,
            fail_map_at: None,
            fail_stream_off: false,
            stream_on_failures: 0,
            fail_dequeue_at: None,
            fail_queue_at: None,
            wait_times: Rc::new(RefCell::new(Vec::new())),
            hangup_after: None,
            spurious_wakes: 0,
            frames,
            open: false,
            driver_queue: VecDeque::new(),
            dequeued: 0,
            queued: 0,
        }
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }

    fn frame_for(&self, index: u32) -> &[u8] {
        if self.frames.is_empty() {
            return &[];
        }
        &self.frames[index as usize % self.frames.len()]
    }
}

impl StreamingDevice for FakeDevice {
    type Mapping = FakeMapping;

    fn open(&mut self, path: &Path) -> Result<(), VideoError> {
        self.record(Call::Open);
        if self.open {
            return Err(VideoError::AlreadyOpen);
        }
        if self.fail_open {
            return Err(VideoError::Open {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        self.open = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn capabilities(&self) -> Result<Capabilities, VideoError> {
        self.record(Call::Capabilities);
        Ok(self.capabilities)
    }

    fn set_format(&mut self, requested: FrameFormat) -> Result<FrameFormat, VideoError> {
        self.record(Call::SetFormat);
        Ok(self.negotiated.unwrap_or(requested))
    }

    fn request_buffers(&mut self, count: u32) -> Result<u32, VideoError> {
        self.record(Call::RequestBuffers(count));
        Ok(self.grant.unwrap_or(count))
    }

    fn map_buffer(&mut self, index: u32) -> Result<FakeMapping, VideoError> {
        self.record(Call::Map(index));
        if self.fail_map_at == Some(index) {
            return Err(VideoError::Buffer {
                index,
                message: "injected mmap failure".to_string(),
            });
        }
        let mut data = self.frame_for(index).to_vec();
        data.resize(data.len().max(SLOT_SIZE), 0);
        Ok(FakeMapping {
            index,
            data,
            log: self.log.clone(),
        })
    }

    fn queue(&mut self, index: u32) -> Result<(), VideoError> {
        self.record(Call::Queue(index));
        let call = self.queued;
        self.queued += 1;
        if self.fail_queue_at == Some(call) {
            return Err(VideoError::Ioctl {
                op: "VIDIOC_QBUF",
                source: std::io::Error::from(std::io::ErrorKind::InvalidInput),
            });
        }
        self.driver_queue.push_back(index);
        Ok(())
    }

    fn stream_on(&mut self) -> Result<(), VideoError> {
        self.record(Call::StreamOn);
        if self.stream_on_failures > 0 {
            self.stream_on_failures -= 1;
            return Err(VideoError::Ioctl {
                op: "VIDIOC_STREAMON",
                source: std::io::Error::from(std::io::ErrorKind::InvalidInput),
            });
        }
        Ok(())
    }

    fn wait_ready(&mut self) -> Result<Readiness, VideoError> {
        self.record(Call::Wait);
        self.wait_times.borrow_mut().push(Instant::now());
        if self.spurious_wakes > 0 {
            self.spurious_wakes -= 1;
            return Ok(Readiness::Spurious);
        }
        if self.hangup_after.is_some_and(|limit| self.dequeued >= limit) {
            return Ok(Readiness::Hangup);
        }
        Ok(Readiness::Ready)
    }

    fn dequeue(&mut self) -> Result<Option<Dequeued>, VideoError> {
        if self.fail_dequeue_at == Some(self.dequeued) {
            return Err(VideoError::Ioctl {
                op: "VIDIOC_DQBUF",
                source: std::io::Error::from(std::io::ErrorKind::Other),
            });
        }
        let Some(index) = self.driver_queue.pop_front() else {
            return Ok(None);
        };
        self.record(Call::Dequeue(index));
        self.dequeued += 1;
        Ok(Some(Dequeued {
            index,
            bytes_used: self.frame_for(index).len(),
        }))
    }

    fn stream_off(&mut self) -> Result<(), VideoError> {
        self.record(Call::StreamOff);
        self.driver_queue.clear();
        if self.fail_stream_off {
            return Err(VideoError::Ioctl {
                op: "VIDIOC_STREAMOFF",
                source: std::io::Error::from(std::io::ErrorKind::Other),
            });
        }
        Ok(())
    }

    fn close(&mut self) {
        self.record(Call::Close);
        self.open = false;
    }
}

#[derive(Debug, thiserror::Error)]
#[error("rejected frame {0}")]
pub struct Rejected(pub u64);

/// Keeps a copy of every frame; rejects frames whose first byte is 0xEE.
#[derive(Default)]
pub struct CollectSink {
    pub frames: Vec<(u64, Vec<u8>)>,
}

impl FrameSink for CollectSink {
    type Error = Rejected;

    fn persist(&mut self, frame: Frame<'_>) -> Result<(), Rejected> {
        if frame.data.first() == Some(&0xEE) {
            return Err(Rejected(frame.sequence));
        }
        self.frames.push((frame.sequence, frame.data.to_vec()));
        Ok(())
    }
}

/// Writes frames through the codec pipeline into `dir`.
pub struct CodecSink<'a> {
    pub writer: image::FrameWriter,
    pub dir: &'a Path,
}

impl FrameSink for CodecSink<'_> {
    type Error = image::CodecError;

    fn persist(&mut self, frame: Frame<'_>) -> Result<(), image::CodecError> {
        let path = self.dir.join(format!("frame-{}.jpg", frame.sequence));
        self.writer.write(frame.data, &path)
    }
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Vec::new();
    let img = crates_image::RgbImage::from_fn(width, height, |x, y| {
        crates_image::Rgb([(x * 4) as u8, (y * 4) as u8, 200])
    });
    crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, 90)
        .encode_image(&img)
        .unwrap();
    buffer
}
