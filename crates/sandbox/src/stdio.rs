use std::io::Write;

use crate::console::Console;

/// Console output for the sandbox, standing in for a board's UART.
pub struct StdoutWriter {
    out: std::io::Stdout,
}

impl core::fmt::Write for StdoutWriter {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.out.write_all(s.as_bytes()).map_err(|_| core::fmt::Error)
    }
}

pub fn init(console: &Console) {
    console.attach_stdout(StdoutWriter {
        out: std::io::stdout(),
    });
}
