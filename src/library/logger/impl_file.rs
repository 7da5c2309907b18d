use crate::library::logger::interface::{format_line, join_namespace, Logger};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Appends log lines to a file, rotating it to `<path>.1 .. <path>.N` once it
/// grows past `max_bytes`.
#[derive(Debug, Clone)]
pub struct LoggerFile {
    namespace: Option<String>,
    timezone: chrono::FixedOffset,
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    // Shared by every namespaced clone so rotation never interleaves.
    write_lock: Arc<Mutex<()>>,
}

impl LoggerFile {
    pub fn new(
        path: impl Into<PathBuf>,
        max_bytes: u64,
        backups: usize,
        timezone: chrono::FixedOffset,
    ) -> Self {
        Self {
            namespace: None,
            timezone,
            path: path.into(),
            max_bytes,
            backups,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn rotate(&self) -> std::io::Result<()> {
        if self.backups == 0 {
            return fs::remove_file(&self.path);
        }

        let oldest = self.backup_path(self.backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))
    }

    fn append(&self, line: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| format!("log file lock poisoned: {}", e))?;

        let incoming = line.len() as u64 + 1;
        if current_size(&self.path) + incoming > self.max_bytes && self.path.exists() {
            self.rotate()?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

fn current_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

impl Logger for LoggerFile {
    fn info(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.append(&format_line(
            &self.timezone,
            "INFO",
            &self.namespace,
            message,
        ))
    }

    fn warn(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.append(&format_line(
            &self.timezone,
            "WARN",
            &self.namespace,
            message,
        ))
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerFile {
            namespace: Some(join_namespace(&self.namespace, namespace)),
            ..self.clone()
        })
    }
}
