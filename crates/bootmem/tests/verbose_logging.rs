//! Checks that verbose bank registration reaches the installed log sink.

use bootmem::{PhysicalAddress, RegionRegistry};
use log::{Level, LevelFilter, Log, Metadata, Record};
use spin::{Mutex, Once};

struct CaptureLogger {
    lines: Mutex<Vec<String>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.lines.lock().push(format!("{}", record.args()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: Once<CaptureLogger> = Once::new();

fn logger() -> &'static CaptureLogger {
    LOGGER.call_once(|| CaptureLogger {
        lines: Mutex::new(Vec::new()),
    })
}

#[test]
fn verbose_flag_controls_bank_summary() {
    let sink = logger();
    log::set_logger(sink).unwrap();
    log::set_max_level(LevelFilter::Info);

    let mut registry = RegionRegistry::new();
    registry
        .add_memory_bank(PhysicalAddress::new(0x2000_0000), 0x0200_0000, true)
        .unwrap();
    registry
        .add_memory_bank(PhysicalAddress::new(0x4000_0000), 0x1000_0000, false)
        .unwrap();
    registry
        .add_memory_bank(PhysicalAddress::new(0x8000_0000), 0x4000_0000, true)
        .unwrap();

    let lines = sink.lines.lock();
    assert_eq!(
        *lines,
        [
            "ram0: 0x2000000@0x20000000",
            "ram2: 0x40000000@0x80000000",
        ]
    );
}
