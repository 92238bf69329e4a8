use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;
use std::str::FromStr;

/// Initialize logging with timestamp, level, source location and message.
///
/// `level` is a level name such as `"info"`; unknown names fall back to `Info`.
pub fn init_logger(level: &str) {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] [{}:{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(LevelFilter::from_str(level).unwrap_or(LevelFilter::Info))
        .init();
}
