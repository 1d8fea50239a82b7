//! Single-line console status.
//!
//! Each update returns the cursor to column 0 and clears the line before
//! writing, so the terminal shows only the latest observed price.

use std::io::{self, Write};

use crate::blockchain::GasPrice;

/// Live "latest gas price" line.
pub struct StatusLine {
    out: Box<dyn Write + Send>,
    dirty: bool,
}

impl StatusLine {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Box::new(out),
            dirty: false,
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Discards everything; for tests and non-interactive runs.
    pub fn sink() -> Self {
        Self::new(io::sink())
    }

    pub fn update(&mut self, block: u64, price: GasPrice) {
        // Terminal write failures are not worth aborting a watch over.
        let _ = write!(self.out, "\r\x1b[2Kblock {block}: {price}");
        let _ = self.out.flush();
        self.dirty = true;
    }

    /// End the status line so following output starts on a fresh line.
    pub fn finish(&mut self) {
        if self.dirty {
            let _ = writeln!(self.out);
            let _ = self.out.flush();
            self.dirty = false;
        }
    }
}
