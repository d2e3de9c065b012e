/// One captured frame, borrowed from its buffer slot until the sink returns.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Compressed payload, exactly the bytes the driver reported.
    pub data: &'a [u8],
    /// Buffer slot the frame sits in.
    pub slot: u32,
    /// Number of frames persisted before this one.
    pub sequence: u64,
}

/// Where captured frames go.
pub trait FrameSink {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist one frame. An error concerns this frame only; the capture
    /// loop decides whether the session goes on.
    fn persist(&mut self, frame: Frame<'_>) -> Result<(), Self::Error>;
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    type Error = S::Error;

    fn persist(&mut self, frame: Frame<'_>) -> Result<(), Self::Error> {
        (**self).persist(frame)
    }
}
