use {
    crate::{CodecError, RawImage, containment::contain},
    crates_image::{ColorType, ImageDecoder, codecs::jpeg::JpegDecoder},
    std::{fmt, io::Cursor},
};

const START_OF_IMAGE: [u8; 2] = [0xFF, 0xD8];
const END_OF_IMAGE: [u8; 2] = [0xFF, 0xD9];

/// Largest width or height a frame header may claim.
pub const MAX_DIMENSION: u32 = 16384;

#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Suppress non-fatal codec warnings.
    pub quiet: bool,
    /// Resolution the device negotiated; a frame of another size is reported.
    pub expected_size: Option<(u32, u32)>,
}

/// Non-fatal findings while decoding a frame. Decoding carries on after each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecWarning {
    MissingEndOfImage,
    Grayscale,
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

impl fmt::Display for CodecWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecWarning::MissingEndOfImage => write!(f, "premature end of JPEG data"),
            CodecWarning::Grayscale => write!(f, "grayscale frame expanded to RGB"),
            CodecWarning::SizeMismatch { expected, actual } => write!(
                f,
                "frame is {}x{}, device negotiated {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
        }
    }
}

/// Decode one MJPEG frame to RGB pixels.
///
/// Warnings go to the log unless `options.quiet` is set. A frame without a
/// start-of-image marker or with an unreadable header fails with
/// `CodecError::Header`; damaged scan data fails with `CodecError::Decode`; a
/// panic inside the codec is stopped here and comes back as
/// `CodecError::Internal`.
pub fn decode(frame: &[u8], options: &DecodeOptions) -> Result<RawImage, CodecError> {
    let (image, warnings) = decode_with_warnings(frame, options.expected_size)?;
    if !options.quiet {
        for warning in &warnings {
            log::warn!("{warning}");
        }
    }
    Ok(image)
}

/// Like `decode`, but hands the warnings back instead of logging them.
pub fn decode_with_warnings(
    frame: &[u8],
    expected_size: Option<(u32, u32)>,
) -> Result<(RawImage, Vec<CodecWarning>), CodecError> {
    if !frame.starts_with(&START_OF_IMAGE) {
        return Err(CodecError::Header(
            "missing start-of-image marker".to_string(),
        ));
    }

    let mut warnings = Vec::new();
    if !has_end_of_image(frame) {
        warnings.push(CodecWarning::MissingEndOfImage);
    }

    let image = contain("decode", || read_pixels(frame))?;

    if image.pixel_stride == 1 {
        warnings.push(CodecWarning::Grayscale);
    }
    let image = image.into_rgb();

    if let Some(expected) = expected_size {
        let actual = (image.width, image.height);
        if actual != expected {
            warnings.push(CodecWarning::SizeMismatch { expected, actual });
        }
    }

    Ok((image, warnings))
}

fn read_pixels(frame: &[u8]) -> Result<RawImage, CodecError> {
    let decoder =
        JpegDecoder::new(Cursor::new(frame)).map_err(|e| CodecError::Header(e.to_string()))?;

    let (width, height) = decoder.dimensions();
    let pixel_stride = match decoder.color_type() {
        ColorType::L8 => 1,
        ColorType::Rgb8 => 3,
        other => {
            return Err(CodecError::Decode(format!(
                "unsupported color type {other:?}"
            )));
        }
    };

    // the header is camera data; an absurd size must not reach the allocator
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(CodecError::Decode(format!(
            "header claims {width}x{height}, limit is {MAX_DIMENSION}x{MAX_DIMENSION}"
        )));
    }
    let len = width as usize * height as usize * pixel_stride;
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|e| CodecError::Decode(format!("can't allocate {len} bytes: {e}")))?;
    data.resize(len, 0);
    decoder
        .read_image(&mut data)
        .map_err(|e| CodecError::Decode(e.to_string()))?;

    RawImage::new(width, height, pixel_stride, data)
}

// UVC drivers may pad the payload with zeros after the end-of-image marker.
fn has_end_of_image(frame: &[u8]) -> bool {
    let end = frame
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);
    frame[..end].ends_with(&END_OF_IMAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_marker_found() {
        assert!(has_end_of_image(&[0xFF, 0xD8, 0x01, 0xFF, 0xD9]));
    }

    #[test]
    fn test_end_marker_found_before_zero_padding() {
        assert!(has_end_of_image(&[0xFF, 0xD8, 0xFF, 0xD9, 0, 0, 0]));
    }

    #[test]
    fn test_end_marker_missing() {
        assert!(!has_end_of_image(&[0xFF, 0xD8, 0x01, 0x02]));
        assert!(!has_end_of_image(&[0, 0, 0]));
        assert!(!has_end_of_image(&[]));
    }
}
