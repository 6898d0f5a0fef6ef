use std::io::{self, Write};

/// Derives the single overwritable status line shown during playback.
///
/// Purely observational: the dispatcher reports after waiting, so a
/// slow terminal can only delay the current step's send, never the
/// next wait computation.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    total_ms: u64,
}

impl Progress {
    pub fn new(total_ms: u64) -> Self {
        Self { total_ms }
    }

    /// Render the status line for the current step, carriage-return
    /// prefixed so it overwrites the previous one.
    pub fn render(&self, elapsed_ms: u64, keys: &[String]) -> String {
        let pct = if self.total_ms == 0 {
            100.0
        } else {
            elapsed_ms as f64 / self.total_ms as f64 * 100.0
        };
        format!(
            "\rProgress: {:6.2}% | {:5}/{}ms | keys: {}",
            pct,
            elapsed_ms,
            self.total_ms,
            keys.join(",")
        )
    }

    /// Write the status line, overwriting the previous one.
    pub fn report<W: Write>(&self, out: &mut W, elapsed_ms: u64, keys: &[String]) -> io::Result<()> {
        write!(out, "{}", self.render(elapsed_ms, keys))?;
        out.flush()
    }
}
