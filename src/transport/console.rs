use std::io::{self, Write};

use crate::error::AppResult;

const SEPARATOR_WIDTH: usize = 79;

/// Writes rendered messages to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleTransport;

impl ConsoleTransport {
    pub fn deliver(&self, rendered: &str) -> AppResult<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_message(&mut handle, rendered)
    }
}

fn write_message<W: Write>(out: &mut W, rendered: &str) -> AppResult<()> {
    out.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
    out.flush()?;
    Ok(())
}
