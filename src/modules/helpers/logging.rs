use fern::Dispatch;
use log::LevelFilter;

use crate::modules::helpers::config::Settings;

/// map a `LOGGING_LEVEL` value to a filter, anything unknown is info
pub fn level_filter(verbosity: &str) -> LevelFilter {
    match verbosity {
        "OFF" => LevelFilter::Off,
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logging(settings: &Settings) -> Result<(), fern::InitError> {
    let base_config = Dispatch::new().level(level_filter(&settings.logging_level));

    let file_logger_config = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(fern::log_file(&settings.log_file)?);

    base_config.chain(file_logger_config).apply()?;

    Ok(())
}
