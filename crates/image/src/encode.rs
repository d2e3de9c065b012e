use {
    crate::{CodecError, RawImage, containment::contain},
    crates_image::{ExtendedColorType, ImageEncoder, codecs::jpeg::JpegEncoder},
    std::{
        fs::File,
        io::{BufWriter, Write},
        path::Path,
    },
};

/// Encode an RGB image as a baseline JPEG file at `destination`.
///
/// `quality` is expected in 0..=100 (validated by the caller); the encoder
/// treats 0 like 1. If the file can't be created nothing is encoded. A file
/// left behind by a failed encode is removed.
pub fn encode(image: &RawImage, destination: &Path, quality: u8) -> Result<(), CodecError> {
    check_rgb(image)?;

    let file = File::create(destination).map_err(|e| CodecError::io(destination, e))?;
    let mut writer = BufWriter::new(file);

    let result = encode_into(image, &mut writer, quality).and_then(|()| {
        writer
            .flush()
            .map_err(|e| CodecError::io(destination, e))
    });

    if result.is_err() {
        drop(writer);
        if let Err(error) = std::fs::remove_file(destination) {
            log::debug!(
                "couldn't remove partial file '{}': {}",
                destination.display(),
                error
            );
        }
    }
    result
}

/// Encode an RGB image as JPEG into any writer.
pub fn encode_into<W: Write>(image: &RawImage, writer: W, quality: u8) -> Result<(), CodecError> {
    check_rgb(image)?;
    contain("encode", || {
        JpegEncoder::new_with_quality(writer, quality)
            .write_image(&image.data, image.width, image.height, ExtendedColorType::Rgb8)
            .map_err(|e| CodecError::Encode(e.to_string()))
    })
}

fn check_rgb(image: &RawImage) -> Result<(), CodecError> {
    if image.pixel_stride != 3 {
        return Err(CodecError::InvalidImage(format!(
            "encoder takes 3-component RGB, got {} components",
            image.pixel_stride
        )));
    }
    image.validate()
}
