//! Pull encoded bytes from a source, decode them and push their text to a sink.
//!
//! The [Converter] owns a single background worker that handles one byte at a time,
//! then pauses until it is told to [resume](Converter::resume).

pub mod cli;
pub mod config;
mod converter;
mod error;
mod io;
pub mod logging;
mod ports;

pub use crate::converter::Converter;
pub use crate::converter::WorkerExit;
pub use crate::converter::WorkerReport;
pub use crate::error::ConfigError;
pub use crate::error::ConverterError;
pub use crate::io::ReaderSource;
pub use crate::io::WriterSink;
pub use crate::ports::ByteSource;
pub use crate::ports::MockByteSource;
pub use crate::ports::MockTextSink;
pub use crate::ports::TextSink;
