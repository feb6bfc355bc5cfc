mod board;
mod boot;
mod console;
mod stdio;

use bootmem::RegionError;

/// Environment variable that turns on per-bank summaries during probe.
pub const VERBOSE_ENV: &str = "SANDBOX_VERBOSE";

pub fn board_main() -> Result<(), RegionError> {
    let console = console::Console::init();
    stdio::init(console);
    log::debug!("console attached: {}", console.has_output());

    let verbose = std::env::var_os(VERBOSE_ENV).is_some_and(|value| !value.is_empty());
    board::probe_memory(verbose)?;

    let mut sdram = bootmem::global::sdram();
    log::info!("memory: {}", sdram.memory_summary());

    boot::reserve_bootloader(&mut sdram)?;
    if let Some(window) = sdram.leading_free_space() {
        log::debug!("kernel window {}", window);
    }
    boot::place_images(&mut sdram, boot::IMAGES)?;

    for line in sdram.snapshot().to_string().lines() {
        log::info!("{}", line);
    }

    Ok(())
}
