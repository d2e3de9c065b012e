use crate::CodecError;

/// Decoded pixels of one frame, rows packed top to bottom.
///
/// Created per frame by `decode` and consumed by `encode`; never shared
/// between frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    /// Bytes per pixel (1 for grayscale, 3 for RGB).
    pub pixel_stride: usize,
    pub data: Vec<u8>,
}

impl RawImage {
    /// Wrap a pixel buffer, checking that its length matches the geometry.
    pub fn new(width: u32, height: u32, pixel_stride: usize, data: Vec<u8>) -> Result<Self, CodecError> {
        let image = Self {
            width,
            height,
            pixel_stride,
            data,
        };
        image.validate()?;
        Ok(image)
    }

    pub fn row_stride(&self) -> usize {
        self.width as usize * self.pixel_stride
    }

    /// The number of bytes `width * height * pixel_stride` calls for.
    pub fn expected_len(&self) -> usize {
        self.row_stride() * self.height as usize
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        if self.width == 0 || self.height == 0 {
            return Err(CodecError::InvalidImage(format!(
                "empty image {}x{}",
                self.width, self.height
            )));
        }
        if self.data.len() != self.expected_len() {
            return Err(CodecError::InvalidImage(format!(
                "{}x{}x{} needs {} bytes, buffer has {}",
                self.width,
                self.height,
                self.pixel_stride,
                self.expected_len(),
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Row `y` as a slice.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.row_stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Convert a single-channel image to RGB by replicating the gray value.
    /// Other layouts are returned unchanged.
    pub fn into_rgb(self) -> Self {
        if self.pixel_stride != 1 {
            return self;
        }
        let data = self.data.iter().flat_map(|&v| [v, v, v]).collect();
        Self {
            width: self.width,
            height: self.height,
            pixel_stride: 3,
            data,
        }
    }
}
