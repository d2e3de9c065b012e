use {
    crate::{FileNamer, TemplateError},
    image::{CodecError, FrameWriter},
    thiserror::Error,
    video::{Frame, FrameSink},
};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error(transparent)]
    Name(#[from] TemplateError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Names each frame and writes it through the codec pipeline.
pub struct CodecSink {
    namer: FileNamer,
    writer: FrameWriter,
}

impl CodecSink {
    pub fn new(namer: FileNamer, writer: FrameWriter) -> Self {
        Self { namer, writer }
    }

    pub fn writer(&self) -> &FrameWriter {
        &self.writer
    }
}

impl FrameSink for CodecSink {
    type Error = SinkError;

    fn persist(&mut self, frame: Frame<'_>) -> Result<(), SinkError> {
        let path = self.namer.name(frame.sequence)?;
        self.writer.write(frame.data, &path)?;
        log::info!("saved {} ({} bytes from slot {})", path.display(), frame.data.len(), frame.slot);
        Ok(())
    }
}
