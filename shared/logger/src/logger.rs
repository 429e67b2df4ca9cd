//! The cloneable [`Logger`] handle.

use crate::error::Result;
use crate::log_level::LogLevel;
use crate::record::{Record, spawn_writer};
use std::path::PathBuf;
use std::sync::mpsc::{Sender, channel};

/// Non-blocking logger backed by a writer thread.
///
/// Clones share the writer. [`Logger::for_component`] opens a second writer
/// on the same file under a different component name.
///
/// ```no_run
/// use logging::{LogLevel, Logger};
///
/// let logger = Logger::new("peerchat.log".into(), LogLevel::Info).unwrap();
/// let relay = logger.for_component("Relay").unwrap();
/// relay.info("[RELAY] connected");
/// ```
#[derive(Clone)]
pub struct Logger {
    sink: Option<Sender<Record>>,
    level: LogLevel,
    component: Option<String>,
    log_path: PathBuf,
    console_output: bool,
}

impl Logger {
    /// Creates a logger without a component tag.
    pub fn new(log_path: PathBuf, level: LogLevel) -> Result<Self> {
        Self::open(log_path, level, None, false)
    }

    /// Creates a logger tagged with `component`, optionally echoing to stdout.
    pub fn with_component(
        log_path: PathBuf,
        level: LogLevel,
        component: String,
        console_output: bool,
    ) -> Result<Self> {
        Self::open(log_path, level, Some(component), console_output)
    }

    /// A logger that drops every record. Used by tests and by tools that
    /// run without a writable log location.
    pub fn discard() -> Self {
        Logger {
            sink: None,
            level: LogLevel::Error,
            component: None,
            log_path: PathBuf::new(),
            console_output: false,
        }
    }

    /// Derives a logger for another component, sharing level, path and console setting.
    pub fn for_component(&self, component: &str) -> Result<Self> {
        if self.sink.is_none() {
            return Ok(Self {
                component: Some(component.to_string()),
                ..self.clone()
            });
        }
        Self::open(
            self.log_path.clone(),
            self.level,
            Some(component.to_string()),
            self.console_output,
        )
    }

    fn open(
        log_path: PathBuf,
        level: LogLevel,
        component: Option<String>,
        console_output: bool,
    ) -> Result<Self> {
        let (sender, receiver) = channel();
        spawn_writer(&log_path, receiver)?;
        Ok(Logger {
            sink: Some(sender),
            level,
            component,
            log_path,
            console_output,
        })
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        let Some(ref sink) = self.sink else {
            return;
        };
        if level < self.level {
            return;
        }

        let record = Record::new(level, self.component.clone(), message.to_string());
        if self.console_output {
            print!("{}", record.format());
        }
        // Writer thread gone means the process is shutting down.
        let _ = sink.send(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    fn wait_for_write() {
        thread::sleep(Duration::from_millis(50));
    }

    #[test]
    fn test_logger_creates_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("chat.log");

        let logger = Logger::new(log_path.clone(), LogLevel::Debug).unwrap();
        logger.info("hello");
        wait_for_write();

        let content = fs::read_to_string(log_path).unwrap();
        assert!(content.contains("hello"));
    }

    #[test]
    fn test_logger_respects_level() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("chat.log");

        let logger = Logger::new(log_path.clone(), LogLevel::Warn).unwrap();
        logger.debug("debug line");
        logger.info("info line");
        logger.warn("warn line");
        wait_for_write();

        let content = fs::read_to_string(log_path).unwrap();
        assert!(!content.contains("debug line"));
        assert!(!content.contains("info line"));
        assert!(content.contains("warn line"));
    }

    #[test]
    fn test_for_component_tags_records() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("chat.log");

        let logger = Logger::new(log_path.clone(), LogLevel::Info).unwrap();
        let relay = logger.for_component("Relay").unwrap();
        relay.info("joined");
        wait_for_write();

        let content = fs::read_to_string(log_path).unwrap();
        assert!(content.contains("(Relay) joined"));
    }

    #[test]
    fn test_clone_across_threads() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("chat.log");

        let logger = Logger::new(log_path.clone(), LogLevel::Info).unwrap();
        let clone = logger.clone();
        thread::spawn(move || clone.info("from thread")).join().unwrap();
        logger.info("from main");
        wait_for_write();

        let content = fs::read_to_string(log_path).unwrap();
        assert!(content.contains("from thread"));
        assert!(content.contains("from main"));
    }

    #[test]
    fn test_discard_logger_is_silent() {
        let logger = Logger::discard();
        logger.error("nowhere");
        let derived = logger.for_component("Peer").unwrap();
        derived.error("still nowhere");
        assert_eq!(derived.level(), LogLevel::Error);
    }
}
