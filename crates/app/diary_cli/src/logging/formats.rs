use std::io::Write;

use flexi_logger::{DeferredNow, style};
use log::{Level, Record};

/// `LEVEL message` for warnings and errors, bare message otherwise.
pub fn cli_format(
    w: &mut dyn Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let level = record.level();
    match level {
        Level::Error | Level::Warn => write!(
            w,
            "{} {}",
            style(level).paint(level.as_str().to_lowercase()),
            record.args()
        ),
        Level::Info => write!(w, "{}", record.args()),
        Level::Debug | Level::Trace => write!(
            w,
            "{} [{}] {}",
            style(level).paint(level.as_str().to_lowercase()),
            record.module_path().unwrap_or("<unnamed>"),
            record.args()
        ),
    }
}
