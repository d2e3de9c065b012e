pub mod logging;
pub use logging::*;

// Re-export log crate so downstream crates can use base::log::*
pub use log;
