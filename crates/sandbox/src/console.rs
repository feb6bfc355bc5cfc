//! Defines the sandbox console that receives all log output.

use core::{fmt::Write, sync::atomic::AtomicBool};

use log::LevelFilter;
use spin::{Mutex, Once};

use crate::stdio::StdoutWriter;

pub struct Console {
    has_output: AtomicBool,
    stdout: Mutex<Option<StdoutWriter>>,
}

static DEFAULT: Once<Console> = Once::new();

impl Console {
    pub fn init() -> &'static Self {
        let console = Self::default();
        console.install();
        console
    }

    pub fn default() -> &'static Self {
        DEFAULT.call_once(|| Console {
            has_output: AtomicBool::new(false),
            stdout: Mutex::new(None),
        })
    }

    pub fn install(&'static self) {
        // A logger may already be installed when the board is re-run in-process.
        if log::set_logger(self).is_err() {
            return;
        }

        #[cfg(debug_assertions)]
        log::set_max_level(LevelFilter::Trace);

        #[cfg(not(debug_assertions))]
        log::set_max_level(LevelFilter::Info);
    }

    pub fn has_output(&self) -> bool {
        self.has_output.load(core::sync::atomic::Ordering::SeqCst)
    }

    pub fn attach_stdout(&self, writer: StdoutWriter) {
        let mut guard = self.stdout.lock();
        *guard = Some(writer);
        self.has_output
            .store(true, core::sync::atomic::Ordering::SeqCst);
    }
}

impl log::Log for Console {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if let Some(stdout) = &mut *self.stdout.lock() {
            let _ = write_log_entry_to(stdout, record);
        }
    }

    fn flush(&self) {}
}

fn write_log_entry_to(
    writer: &mut impl Write,
    record: &log::Record,
) -> core::fmt::Result {
    #[cfg(any(debug_assertions, feature = "detailed-logging"))]
    return writeln!(
        writer,
        "[{} {}:{} {}] {}",
        record.level(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.target(),
        record.args()
    );
    #[cfg(not(any(debug_assertions, feature = "detailed-logging")))]
    return writeln!(writer, "[{:5}] {}", record.level(), record.args());
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Buffer(String);

    impl Write for Buffer {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            self.0.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn log_entry_carries_level_and_message() {
        let mut buffer = Buffer(String::new());
        let record = log::Record::builder()
            .args(format_args!("ram0: 0x2000000@0x20000000"))
            .level(log::Level::Info)
            .target("bootmem")
            .build();

        write_log_entry_to(&mut buffer, &record).unwrap();

        assert!(buffer.0.starts_with("[INFO"));
        assert!(buffer.0.ends_with("ram0: 0x2000000@0x20000000\n"));
    }
}
