//! Logger setup.
//!
//! Logs go to stderr through `fern`. The level comes from `RUST_LOG` when it names a plain level
//! (`debug`, `trace`, ...), otherwise from the settings file once that has been read.

use log::LevelFilter;

/// Installs the global logger. Must be called once, before anything logs.
pub fn init_logging() -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Trace)
        .chain(std::io::stderr())
        .apply()?;

    log::set_max_level(env_level().unwrap_or(LevelFilter::Info));
    Ok(())
}

/// Switches to the configured level unless `RUST_LOG` already chose one.
pub fn apply_level(configured: Option<LevelFilter>) {
    if env_level().is_some() {
        return;
    }
    if let Some(level) = configured {
        log::set_max_level(level);
    }
}

fn env_level() -> Option<LevelFilter> {
    std::env::var("RUST_LOG").ok()?.parse().ok()
}
