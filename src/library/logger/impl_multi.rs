use crate::library::logger::interface::Logger;
use std::sync::Arc;

pub struct LoggerMulti {
    loggers: Vec<Arc<dyn Logger + Send + Sync>>,
}

impl LoggerMulti {
    pub fn new(loggers: Vec<Arc<dyn Logger + Send + Sync>>) -> Self {
        Self { loggers }
    }

    /// Every logger gets the line even if an earlier one fails. The first
    /// failure is returned.
    fn log_all(
        &self,
        log: impl Fn(&dyn Logger) -> Result<(), Box<dyn std::error::Error + Send + Sync>>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut first_error = None;
        for logger in &self.loggers {
            if let Err(e) = log(logger.as_ref()) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Logger for LoggerMulti {
    fn info(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.log_all(|logger| logger.info(message))
    }

    fn warn(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.log_all(|logger| logger.warn(message))
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerMulti {
            loggers: self
                .loggers
                .iter()
                .map(|logger| logger.with_namespace(namespace))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_file::LoggerFile;
    use std::fs;

    #[test]
    fn test_fans_out_to_every_logger() {
        let dir = tempfile::tempdir().unwrap();
        let utc = chrono::FixedOffset::east_opt(0).unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");

        let logger = LoggerMulti::new(vec![
            Arc::new(LoggerFile::new(&first, 4096, 1, utc)),
            Arc::new(LoggerFile::new(&second, 4096, 1, utc)),
        ]);
        logger.with_namespace("viewer").info("hello").unwrap();

        for path in [first, second] {
            let contents = fs::read_to_string(path).unwrap();
            assert!(contents.trim_end().ends_with("INFO viewer: hello"));
        }
    }

    #[test]
    fn test_failing_logger_does_not_silence_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let utc = chrono::FixedOffset::east_opt(0).unwrap();
        let unwritable = dir.path().join("missing").join("viewer.log");
        let working = dir.path().join("working.log");

        let logger = LoggerMulti::new(vec![
            Arc::new(LoggerFile::new(&unwritable, 4096, 1, utc)),
            Arc::new(LoggerFile::new(&working, 4096, 1, utc)),
        ]);

        assert!(logger.info("started").is_err());
        assert!(logger.warn("still here").is_err());

        let contents = fs::read_to_string(&working).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("INFO started"));
        assert!(lines[1].ends_with("WARN still here"));
        assert!(!unwritable.exists());
    }
}
