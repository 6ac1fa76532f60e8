//! File-based `log` backend with size-based rotation.
//!
//! Logs are written to `~/.config/kolour/logs/kolour.log`. When
//! the file exceeds the configured max size, it is rotated to
//! `kolour.log.1` (one backup kept).

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{LevelFilter, Metadata, Record};
use serde::{Deserialize, Serialize};

const LOG_FILE_NAME: &str = "kolour.log";
const BACKUP_FILE_NAME: &str = "kolour.log.1";

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled. Defaults to `false`.
    pub enabled: bool,
    /// Minimum log level: "debug", "info", "warn", or "error".
    pub level: String,
    /// Maximum log file size in megabytes before rotation.
    pub max_file_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".into(),
            max_file_mb: 10,
        }
    }
}

impl LogConfig {
    /// Rotation threshold in bytes, saturating for oversized settings.
    pub fn max_bytes(&self) -> u64 {
        self.max_file_mb.saturating_mul(1024 * 1024)
    }
}

/// Parses a configured level name, defaulting to `Info`.
pub fn parse_level(s: &str) -> LevelFilter {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

struct FileSink {
    file: File,
    path: PathBuf,
    max_bytes: u64,
    written: u64,
}

impl FileSink {
    fn open(path: PathBuf, max_bytes: u64) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self {
            file,
            path,
            max_bytes,
            written,
        })
    }

    fn write_line(&mut self, line: &str) {
        let _ = self.file.write_all(line.as_bytes());
        self.written += line.len() as u64;

        if self.max_bytes > 0 && self.written >= self.max_bytes {
            self.rotate();
        }
    }

    fn rotate(&mut self) {
        let backup = self.path.with_file_name(BACKUP_FILE_NAME);
        let _ = fs::rename(&self.path, &backup);
        if let Ok(f) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            self.file = f;
        }
        self.written = 0;
    }
}

/// The installed `log::Log` implementation.
pub struct FileLogger {
    sink: Mutex<FileSink>,
    level: LevelFilter,
}

impl FileLogger {
    /// Opens (or creates) `kolour.log` inside `dir`.
    pub fn open(dir: &Path, config: &LogConfig) -> std::io::Result<Self> {
        fs::create_dir_all(dir)?;
        let sink = FileSink::open(dir.join(LOG_FILE_NAME), config.max_bytes())?;
        Ok(Self {
            sink: Mutex::new(sink),
            level: parse_level(&config.level),
        })
    }
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        let line = format!(
            "{now} [{lvl}] {args}\n",
            now = timestamp(),
            lvl = record.level(),
            args = record.args()
        );
        sink.write_line(&line);
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.file.flush();
        }
    }
}

/// Installs the file logger as the global `log` backend.
///
/// Does nothing if `config.enabled` is `false`, if the log directory
/// cannot be created, or if a logger is already installed.
pub fn init(config: &LogConfig) {
    if !config.enabled {
        return;
    }
    let Some(dir) = crate::config::config_dir() else {
        return;
    };
    let Ok(logger) = FileLogger::open(&dir.join("logs"), config) else {
        return;
    };
    let level = logger.level;
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}

fn timestamp() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = dur.as_secs();
    let (h, m, s) = (secs / 3600 % 24, secs / 60 % 60, secs % 60);
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kolour-log-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn level_names_parse() {
        // Assert
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("warn"), LevelFilter::Warn);
        assert_eq!(parse_level("bogus"), LevelFilter::Info);
    }

    #[test]
    fn oversized_max_file_mb_saturates() {
        // Arrange
        let config = LogConfig {
            max_file_mb: u64::MAX / 2,
            ..Default::default()
        };

        // Assert
        assert_eq!(config.max_bytes(), u64::MAX);
        assert_eq!(LogConfig::default().max_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn records_below_level_are_dropped() {
        // Arrange
        let dir = scratch_dir("filter");
        let config = LogConfig {
            enabled: true,
            level: "warn".into(),
            max_file_mb: 1,
        };
        let logger = FileLogger::open(&dir, &config).unwrap();

        // Act
        logger.log(
            &Record::builder()
                .level(log::Level::Info)
                .args(format_args!("quiet"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(log::Level::Warn)
                .args(format_args!("loud"))
                .build(),
        );
        logger.flush();

        // Assert
        let content = fs::read_to_string(dir.join(LOG_FILE_NAME)).unwrap();
        assert!(!content.contains("quiet"));
        assert!(content.contains("[WARN] loud"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rotation_moves_full_file_to_backup() {
        // Arrange
        let dir = scratch_dir("rotate");
        fs::create_dir_all(&dir).unwrap();
        let mut sink = FileSink::open(dir.join(LOG_FILE_NAME), 16).unwrap();

        // Act
        sink.write_line("0123456789abcdef-overflow\n");
        sink.write_line("fresh\n");

        // Assert
        let backup = fs::read_to_string(dir.join(BACKUP_FILE_NAME)).unwrap();
        let current = fs::read_to_string(dir.join(LOG_FILE_NAME)).unwrap();
        assert!(backup.contains("overflow"));
        assert_eq!(current, "fresh\n");
        let _ = fs::remove_dir_all(&dir);
    }
}
