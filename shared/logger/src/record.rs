//! Log records and the background file writer.

use crate::error::Result;
use crate::log_level::LogLevel;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::Receiver;

#[derive(Debug, Clone)]
pub(crate) struct Record {
    pub timestamp: String,
    pub level: LogLevel,
    pub component: Option<String>,
    pub message: String,
}

impl Record {
    pub fn new(level: LogLevel, component: Option<String>, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            level,
            component,
            message,
        }
    }

    /// `[timestamp] LEVEL (component) message\n`
    pub fn format(&self) -> String {
        match self.component {
            Some(ref component) => format!(
                "[{}] {:<5} ({}) {}\n",
                self.timestamp, self.level, component, self.message
            ),
            None => format!("[{}] {:<5} {}\n", self.timestamp, self.level, self.message),
        }
    }
}

/// Opens `path` for appending and drains `records` into it on a new thread.
pub(crate) fn spawn_writer(path: &Path, records: Receiver<Record>) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    std::thread::Builder::new()
        .name("log-writer".to_string())
        .spawn(move || write_all(file, records))?;
    Ok(())
}

fn write_all(mut file: File, records: Receiver<Record>) {
    for record in records {
        if let Err(e) = file
            .write_all(record.format().as_bytes())
            .and_then(|_| file.flush())
        {
            eprintln!("log write failed: {}", e);
        }
    }
}
