use chrono::Local;
use log::{LevelFilter, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use crate::error::Result;

/// Appends log lines to a file as `timestamp [LEVEL] target: message`.
pub struct Logger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl Logger {
    pub fn new(log_file: &Path, level: LevelFilter) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;

        Ok(Self {
            file: Mutex::new(file),
            level,
        })
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            // Nowhere to report a failed write.
            let _ = writeln!(
                file,
                "{} [{}] {}: {}",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Installs the file logger as the global logger.
pub fn init(log_file: &Path, level: LevelFilter) -> Result<()> {
    let logger = Logger::new(log_file, level)?;
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log};
    use std::fs;

    #[test]
    fn test_writes_enabled_records_only() {
        let path = std::env::temp_dir().join(format!("txc-report-log-{}.log", std::process::id()));
        let logger = Logger::new(&path, LevelFilter::Warn).unwrap();

        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .target("txc_report::api")
                .args(format_args!("using fallback data"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("should not appear"))
                .build(),
        );
        logger.flush();

        let contents = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();
        assert!(contents.contains("[WARN] txc_report::api: using fallback data"));
        assert!(!contents.contains("should not appear"));
    }
}
