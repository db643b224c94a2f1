use std::str::FromStr;
use std::time::SystemTime;

use log::LevelFilter;

use crate::config::LogConfig;

/// parses the configured level, falling back to `Info` for anything unrecognized
pub fn level_filter(config: &LogConfig) -> LevelFilter {
    LevelFilter::from_str(config.level.trim()).unwrap_or(LevelFilter::Info)
}

/// sets up the global logger. Lines always go to stderr, and additionally to the configured log file if there is one.
///
/// This can only be called once per process; a second call returns [fern::InitError::SetLoggerError]
pub fn init_logger(config: &LogConfig) -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level_filter(config))
        .chain(std::io::stderr());
    if let Some(file) = &config.file {
        dispatch = dispatch.chain(fern::log_file(file)?);
    }
    dispatch.apply()?;
    Ok(())
}
