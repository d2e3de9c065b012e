//! Snapshot tool for UVC cameras: command line, file naming and the sink
//! that ties the capture loop to the codec pipeline.

pub mod args;
pub mod sink;
pub mod template;

pub use args::Args;
pub use sink::{CodecSink, SinkError};
pub use template::{FileNamer, IndexTemplate, MAX_WIDTH, TemplateError};
