use std::sync::Arc;

pub trait Logger: Send + Sync {
    fn info(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn warn(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync>;
}

pub fn join_namespace(current: &Option<String>, namespace: &str) -> String {
    match current {
        Some(current) => format!("{}:{}", current, namespace),
        None => namespace.to_string(),
    }
}

pub fn format_line(
    timezone: &chrono::FixedOffset,
    level: &str,
    namespace: &Option<String>,
    message: &str,
) -> String {
    let local_time = chrono::Utc::now().with_timezone(timezone);
    let formatted = local_time.format("%Y-%m-%d %I:%M:%S%.3f %p");
    match namespace {
        Some(namespace) => format!("[{}] {} {}: {}", formatted, level, namespace, message),
        None => format!("[{}] {} {}", formatted, level, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_namespace() {
        assert_eq!(join_namespace(&None, "viewer"), "viewer");
        assert_eq!(
            join_namespace(&Some("viewer".to_string()), "http"),
            "viewer:http"
        );
    }

    #[test]
    fn test_format_line_includes_level_and_namespace() {
        let timezone = chrono::FixedOffset::east_opt(0).unwrap();
        let line = format_line(&timezone, "WARN", &Some("viewer".to_string()), "hello");
        assert!(line.ends_with("] WARN viewer: hello"), "{}", line);

        let line = format_line(&timezone, "INFO", &None, "hello");
        assert!(line.ends_with("] INFO hello"), "{}", line);
    }
}
