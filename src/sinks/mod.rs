//! Sink implementations

pub mod console;
pub mod rotating_file;

pub use console::ConsoleSink;
pub use rotating_file::RotatingFileSink;

use crate::core::error::Result;

/// A destination that accepts one fully rendered text block per record and
/// appends it. Sinks hold no lock of their own; the owning logger's lock
/// serializes all access.
pub trait Sink: Send {
    fn write(&mut self, text: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
