//! Console sink implementation

use super::Sink;
use crate::core::error::Result;
use std::io::{self, Write};

/// Stdout sink. Stateless beyond its color-capability flag; the rendered
/// text it receives already carries (or omits) color codes.
pub struct ConsoleSink {
    color_capable: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            color_capable: true,
        }
    }

    pub fn with_color_capability(color_capable: bool) -> Self {
        Self { color_capable }
    }

    /// Whether this target can display ANSI color sequences.
    pub fn color_capable(&self) -> bool {
        self.color_capable
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, text: &str) -> Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", text)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
