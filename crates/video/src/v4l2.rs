use {
    crate::*,
    std::{
        io,
        mem,
        os::{fd::RawFd, raw::c_void},
        path::Path,
        ptr,
        slice,
    },
    v4l::{
        Device, Format, FourCC,
        buffer::Type,
        capability::Flags,
        memory::Memory,
        v4l_sys::{v4l2_buffer, v4l2_requestbuffers},
        v4l2::{self, vidioc},
        video::Capture,
    },
};

/// A buffer mapped from the driver. Unmapped on drop.
pub struct MmapRegion {
    ptr: *mut c_void,
    len: usize,
}

impl AsRef<[u8]> for MmapRegion {
    fn as_ref(&self) -> &[u8] {
        // SAFETY: ptr/len come from a successful mmap that lives until drop
        unsafe { slice::from_raw_parts(self.ptr as *const u8, self.len) }
    }
}

impl Drop for MmapRegion {
    fn drop(&mut self) {
        if let Err(error) = unsafe { v4l2::munmap(self.ptr, self.len) } {
            log::error!("munmap of {} bytes failed: {}", self.len, error);
        }
    }
}

/// Video4Linux2 capture device using MMAP streaming I/O.
pub struct V4l2Device {
    device: Option<Device>,
    epoll: Option<RawFd>,
}

impl V4l2Device {
    pub fn new() -> Self {
        Self {
            device: None,
            epoll: None,
        }
    }

    fn fd(&self) -> Result<RawFd, VideoError> {
        self.device
            .as_ref()
            .map(|device| device.handle().fd())
            .ok_or(VideoError::NotOpen)
    }

    fn buffer(index: u32) -> v4l2_buffer {
        v4l2_buffer {
            index,
            type_: Type::VideoCapture as u32,
            memory: Memory::Mmap as u32,
            ..unsafe { mem::zeroed() }
        }
    }

    fn close_epoll(&mut self) {
        if let Some(efd) = self.epoll.take() {
            if let Err(error) = epoll::close(efd) {
                log::error!("closing epoll descriptor failed: {error}");
            }
        }
    }
}

impl Default for V4l2Device {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingDevice for V4l2Device {
    type Mapping = MmapRegion;

    fn open(&mut self, path: &Path) -> Result<(), VideoError> {
        if self.device.is_some() {
            return Err(VideoError::AlreadyOpen);
        }
        let device = Device::with_path(path).map_err(|source| VideoError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.device = Some(device);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.device.is_some()
    }

    fn capabilities(&self) -> Result<Capabilities, VideoError> {
        let device = self.device.as_ref().ok_or(VideoError::NotOpen)?;
        let caps = device
            .query_caps()
            .map_err(VideoError::ioctl("VIDIOC_QUERYCAP"))?;
        log::debug!("{} ({}), driver {}", caps.card, caps.bus, caps.driver);
        Ok(Capabilities {
            video_capture: caps.capabilities.contains(Flags::VIDEO_CAPTURE),
            streaming: caps.capabilities.contains(Flags::STREAMING),
        })
    }

    fn set_format(&mut self, requested: FrameFormat) -> Result<FrameFormat, VideoError> {
        let device = self.device.as_ref().ok_or(VideoError::NotOpen)?;
        let format = Format::new(
            requested.resolution.width,
            requested.resolution.height,
            FourCC::new(&requested.fourcc),
        );
        let actual = Capture::set_format(device, &format)
            .map_err(VideoError::ioctl("VIDIOC_S_FMT"))?;
        Ok(FrameFormat {
            resolution: Resolution::new(actual.width, actual.height),
            fourcc: actual.fourcc.repr,
        })
    }

    fn request_buffers(&mut self, count: u32) -> Result<u32, VideoError> {
        let fd = self.fd()?;
        let mut request = v4l2_requestbuffers {
            count,
            type_: Type::VideoCapture as u32,
            memory: Memory::Mmap as u32,
            ..unsafe { mem::zeroed() }
        };
        unsafe {
            v4l2::ioctl(
                fd,
                vidioc::VIDIOC_REQBUFS,
                &mut request as *mut _ as *mut c_void,
            )
        }
        .map_err(VideoError::ioctl("VIDIOC_REQBUFS"))?;
        Ok(request.count)
    }

    fn map_buffer(&mut self, index: u32) -> Result<MmapRegion, VideoError> {
        let fd = self.fd()?;
        let mut buffer = Self::buffer(index);
        unsafe {
            v4l2::ioctl(
                fd,
                vidioc::VIDIOC_QUERYBUF,
                &mut buffer as *mut _ as *mut c_void,
            )
        }
        .map_err(VideoError::ioctl("VIDIOC_QUERYBUF"))?;

        let len = buffer.length as usize;
        let offset = unsafe { buffer.m.offset } as libc::off_t;
        let ptr = unsafe {
            v4l2::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                offset,
            )
        }
        .map_err(|error| VideoError::Buffer {
            index,
            message: format!("mmap failed: {error}"),
        })?;
        if ptr.is_null() {
            return Err(VideoError::Buffer {
                index,
                message: "mmap returned null".to_string(),
            });
        }
        Ok(MmapRegion { ptr, len })
    }

    fn queue(&mut self, index: u32) -> Result<(), VideoError> {
        let fd = self.fd()?;
        let mut buffer = Self::buffer(index);
        unsafe {
            v4l2::ioctl(
                fd,
                vidioc::VIDIOC_QBUF,
                &mut buffer as *mut _ as *mut c_void,
            )
        }
        .map_err(VideoError::ioctl("VIDIOC_QBUF"))
    }

    fn stream_on(&mut self) -> Result<(), VideoError> {
        let fd = self.fd()?;

        // register once for the whole loop, before the stream starts; level-triggered
        self.close_epoll();
        let efd = epoll::create(true).map_err(VideoError::Wait)?;
        self.epoll = Some(efd);
        if let Err(error) = epoll::ctl(
            efd,
            epoll::ControlOptions::EPOLL_CTL_ADD,
            fd,
            epoll::Event::new(epoll::Events::EPOLLIN, fd as u64),
        ) {
            self.close_epoll();
            return Err(VideoError::Wait(error));
        }

        let mut typ = Type::VideoCapture as u32;
        let result = unsafe {
            v4l2::ioctl(
                fd,
                vidioc::VIDIOC_STREAMON,
                &mut typ as *mut _ as *mut c_void,
            )
        };
        if let Err(error) = result {
            self.close_epoll();
            return Err(VideoError::Ioctl {
                op: "VIDIOC_STREAMON",
                source: error,
            });
        }
        Ok(())
    }

    fn wait_ready(&mut self) -> Result<Readiness, VideoError> {
        let efd = self.epoll.ok_or(VideoError::NotOpen)?;
        let mut events = [epoll::Event::new(epoll::Events::empty(), 0)];
        let count = match epoll::wait(efd, -1, &mut events) {
            Ok(count) => count,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => return Ok(Readiness::Spurious),
            Err(error) => return Err(VideoError::Wait(error)),
        };
        if count == 0 {
            return Ok(Readiness::Spurious);
        }

        // packed field, copy before use
        let bits = events[0].events;
        let flags = epoll::Events::from_bits_truncate(bits);
        if flags.intersects(epoll::Events::EPOLLERR | epoll::Events::EPOLLHUP) {
            return Ok(Readiness::Hangup);
        }
        if !flags.contains(epoll::Events::EPOLLIN) {
            return Ok(Readiness::Spurious);
        }
        Ok(Readiness::Ready)
    }

    fn dequeue(&mut self) -> Result<Option<Dequeued>, VideoError> {
        let fd = self.fd()?;
        let mut buffer = Self::buffer(0);
        let result = unsafe {
            v4l2::ioctl(
                fd,
                vidioc::VIDIOC_DQBUF,
                &mut buffer as *mut _ as *mut c_void,
            )
        };
        match result {
            Ok(()) => Ok(Some(Dequeued {
                index: buffer.index,
                bytes_used: buffer.bytesused as usize,
            })),
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(error) => Err(VideoError::Ioctl {
                op: "VIDIOC_DQBUF",
                source: error,
            }),
        }
    }

    fn stream_off(&mut self) -> Result<(), VideoError> {
        self.close_epoll();
        let fd = self.fd()?;
        let mut typ = Type::VideoCapture as u32;
        unsafe {
            v4l2::ioctl(
                fd,
                vidioc::VIDIOC_STREAMOFF,
                &mut typ as *mut _ as *mut c_void,
            )
        }
        .map_err(VideoError::ioctl("VIDIOC_STREAMOFF"))
    }

    fn close(&mut self) {
        self.close_epoll();
        self.device.take();
    }
}

impl Drop for V4l2Device {
    fn drop(&mut self) {
        self.close_epoll();
    }
}
