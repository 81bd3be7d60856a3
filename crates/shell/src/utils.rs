//! Some utilities

use std::path::{Path, PathBuf};

use ftlog::{
    appender::{FileAppender, Period},
    LevelFilter, LoggerGuard,
};

/// Configures ftlog to write to `<log_dir>/<file_name>.log`, rotated daily.
///
/// The guard must be held for as long as logs should be written.
pub fn configure_logger<P: AsRef<Path>>(log_dir: P, file_name: &str) -> Result<(LoggerGuard, PathBuf), String> {
    let log_dir = log_dir.as_ref();
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir).map_err(|e| e.to_string())?;
    }
    let log_path = log_dir.canonicalize().map_err(|e| e.to_string())?.join(format!("{file_name}.log"));

    let writer = FileAppender::builder().path(&log_path).rotate(Period::Day).build();

    let err_path = log_path.with_extension("err.log");

    let guard = ftlog::Builder::new()
        // global max log level
        .max_log_level(LevelFilter::Debug)
        // define root appender, pass None would write to stderr
        .root(writer)
        // write `Warn` and `Error` logs in ftlog::appender to `err_path` instead of `log_path`
        .filter("ftlog::appender", "ftlog-appender", LevelFilter::Warn)
        .appender("ftlog-appender", FileAppender::new(err_path))
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok((guard, log_path))
}

/// Creates `out_dir` if it does not exist and returns its canonical path.
pub fn ensure_dir<P: AsRef<Path>>(out_dir: P) -> Result<PathBuf, String> {
    let out_dir = out_dir.as_ref();
    if !out_dir.exists() {
        ftlog::info!("Creating output directory {}", out_dir.display());
        std::fs::create_dir_all(out_dir).map_err(|e| e.to_string())?;
    }
    out_dir.canonicalize().map_err(|e| e.to_string())
}
