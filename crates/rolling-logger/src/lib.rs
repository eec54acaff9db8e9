//! Rolling Logger
//!
//! File logger for the project tracker. Log files roll over by size and only
//! a fixed number of old files are kept.
//!
//! `log` macros are bridged into the same subscriber, so library code only
//! needs the `log` facade.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Logger settings
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Roll the active file once it would grow past this size
    pub max_file_bytes: u64,
    /// Number of rotated files kept next to the active one
    pub max_files: usize,
    pub level: log::LevelFilter,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 1024 * 1024,
            max_files: 3,
            level: log::LevelFilter::Info,
        }
    }
}

/// Logger errors
#[derive(Debug)]
pub enum LoggerError {
    Io(io::Error),
    AlreadyInitialized(String),
}

impl fmt::Display for LoggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerError::Io(e) => write!(f, "Log file error: {}", e),
            LoggerError::AlreadyInitialized(msg) => write!(f, "Logger already initialized: {}", msg),
        }
    }
}

impl std::error::Error for LoggerError {}

impl From<io::Error> for LoggerError {
    fn from(e: io::Error) -> Self {
        LoggerError::Io(e)
    }
}

// ========================
// Rolling file writer
// ========================

/// Size-based rolling writer: `<app>.log`, `<app>.log.1` ... `<app>.log.N`
pub struct RollingFileWriter {
    dir: PathBuf,
    app_name: String,
    max_bytes: u64,
    max_files: usize,
    file: File,
    written: u64,
}

impl RollingFileWriter {
    pub fn new(dir: impl AsRef<Path>, app_name: &str, max_bytes: u64, max_files: usize) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.log", app_name));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            dir,
            app_name: app_name.to_string(),
            max_bytes,
            max_files,
            file,
            written,
        })
    }

    /// Path of the file currently written to
    pub fn current_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.app_name))
    }

    fn rotated_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.log.{}", self.app_name, index))
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.max_files == 0 {
            self.file = File::create(self.current_path())?;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.rotated_path(self.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.max_files).rev() {
            let from = self.rotated_path(index);
            if from.exists() {
                fs::rename(&from, self.rotated_path(index + 1))?;
            }
        }
        fs::rename(self.current_path(), self.rotated_path(1))?;

        self.file = OpenOptions::new().create(true).append(true).open(self.current_path())?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RollingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Writer handed to the fmt layer; every event lands in the rolling file
#[derive(Clone)]
struct SharedWriter {
    file: Arc<Mutex<RollingFileWriter>>,
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.lock() {
            Ok(mut file) => file.flush(),
            Err(_) => Ok(()),
        }
    }
}

/// Local wall-clock timestamps
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

fn to_tracing_filter(level: log::LevelFilter) -> LevelFilter {
    match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    }
}

// ========================
// Public API
// ========================

/// Install the global logger. Fails if a subscriber is already installed.
pub fn init_logger_with(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    config: LoggerConfig,
) -> Result<(), LoggerError> {
    let file = RollingFileWriter::new(log_dir, app_name, config.max_file_bytes, config.max_files)?;
    let writer = SharedWriter {
        file: Arc::new(Mutex::new(file)),
    };

    tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_timer(LocalTimer)
        .with_max_level(to_tracing_filter(config.level))
        .try_init()
        .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_writer_rotates_by_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RollingFileWriter::new(dir.path(), "app", 10, 2).unwrap();

        writer.write_all(b"0123456789").unwrap();
        writer.write_all(b"abc").unwrap();
        writer.write_all(b"defghijklm").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("app.log")).unwrap(), "defghijklm");
        assert_eq!(fs::read_to_string(dir.path().join("app.log.1")).unwrap(), "abc");
        assert_eq!(fs::read_to_string(dir.path().join("app.log.2")).unwrap(), "0123456789");
    }

    #[test]
    fn test_rolling_writer_drops_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RollingFileWriter::new(dir.path(), "app", 4, 1).unwrap();

        writer.write_all(b"aaaa").unwrap();
        writer.write_all(b"bbbb").unwrap();
        writer.write_all(b"cccc").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("app.log")).unwrap(), "cccc");
        assert_eq!(fs::read_to_string(dir.path().join("app.log.1")).unwrap(), "bbbb");
        assert!(!dir.path().join("app.log.2").exists());
    }

    #[test]
    fn test_shared_writer_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = RollingFileWriter::new(dir.path(), "app", 1024, 1).unwrap();
        let mut writer = SharedWriter {
            file: Arc::new(Mutex::new(file)),
        };
        let mut clone = writer.clone();

        writer.write_all(b"first\n").unwrap();
        clone.write_all(b"second\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("app.log")).unwrap(), "first\nsecond\n");
    }
}
