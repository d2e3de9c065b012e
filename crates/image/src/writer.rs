use {
    crate::{CodecError, DecodeOptions, decode, encode},
    std::{fs::File, io::Write, path::Path},
};

/// Quality used when none is configured.
pub const DEFAULT_QUALITY: u8 = 75;

/// How captured frames are persisted. Chosen once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Store the compressed frame exactly as the device delivered it.
    Verbatim,
    /// Decode the frame and encode it again at `quality`.
    Recompress { quality: u8 },
}

impl Default for StorageMode {
    fn default() -> Self {
        StorageMode::Recompress {
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Turns one captured frame into one file.
#[derive(Debug, Clone, Default)]
pub struct FrameWriter {
    mode: StorageMode,
    decode_options: DecodeOptions,
}

impl FrameWriter {
    pub fn new(mode: StorageMode) -> Self {
        Self {
            mode,
            decode_options: DecodeOptions::default(),
        }
    }

    /// Suppress non-fatal codec warnings.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.decode_options.quiet = quiet;
        self
    }

    /// Resolution the device negotiated, used to flag frames of another size.
    pub fn with_expected_size(mut self, size: Option<(u32, u32)>) -> Self {
        self.decode_options.expected_size = size;
        self
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    pub fn decode_options(&self) -> &DecodeOptions {
        &self.decode_options
    }

    /// Persist `frame` to `destination`.
    ///
    /// A failure only concerns this frame; nothing the writer holds is
    /// changed by it.
    pub fn write(&self, frame: &[u8], destination: &Path) -> Result<(), CodecError> {
        match self.mode {
            StorageMode::Verbatim => write_verbatim(frame, destination),
            StorageMode::Recompress { quality } => {
                let image = decode(frame, &self.decode_options)?;
                encode(&image, destination, quality)
            }
        }
    }
}

fn write_verbatim(frame: &[u8], destination: &Path) -> Result<(), CodecError> {
    let mut file = File::create(destination).map_err(|e| CodecError::io(destination, e))?;
    file.write_all(frame)
        .map_err(|e| CodecError::io(destination, e))
}
