//! Logger installation. Records go to the browser console through
//! `console_log` on wasm32 and to stderr through `env_logger` natively.

use log::{LevelFilter, SetLoggerError};

/// Installs the backend on first use; later calls only adjust the level.
pub fn init(level: LevelFilter) {
    if install().is_err() {
        log::debug!("logger already installed");
    }
    log::set_max_level(level);
}

// Backends accept everything; `log::max_level` is the only filter.
#[cfg(target_arch = "wasm32")]
fn install() -> Result<(), SetLoggerError> {
    console_log::init_with_level(log::Level::Trace)
}

#[cfg(not(target_arch = "wasm32"))]
fn install() -> Result<(), SetLoggerError> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .is_test(cfg!(test))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_repeatable() {
        init(LevelFilter::Warn);
        assert_eq!(log::max_level(), LevelFilter::Warn);
        init(LevelFilter::Info);
        assert_eq!(log::max_level(), LevelFilter::Info);
        log::info!("logger smoke test");
    }
}
