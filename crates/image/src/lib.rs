//! JPEG frame codec pipeline.
//!
//! A captured MJPEG frame is either persisted verbatim or decoded to a
//! `RawImage` and re-encoded at a chosen quality. Every stage returns a
//! `CodecError` instead of unwinding, so a malformed frame only costs that
//! frame.
//!
//! Raw images are packed rows, `pixel_stride` bytes per pixel.

mod containment;
pub mod decode;
pub mod encode;
pub mod error;
pub mod raw;
pub mod writer;

pub use decode::{CodecWarning, DecodeOptions, MAX_DIMENSION, decode, decode_with_warnings};
pub use encode::{encode, encode_into};
pub use error::CodecError;
pub use raw::RawImage;
pub use writer::{DEFAULT_QUALITY, FrameWriter, StorageMode};
