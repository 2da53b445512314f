use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

const MAX_LOG_ENTRIES: usize = 100;

/// One record in the operator-visible diagnostic log.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub type SharedLogs = Arc<Mutex<Vec<LogEntry>>>;

pub fn new_shared_logs() -> SharedLogs {
    Arc::new(Mutex::new(Vec::new()))
}

/// Install the global `tracing` subscriber. Later calls are no-ops.
pub fn init_tracing(filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };

    match level {
        "ERROR" => tracing::error!(source, "{}", message),
        "WARN" => tracing::warn!(source, "{}", message),
        "DEBUG" => tracing::debug!(source, "{}", message),
        _ => tracing::info!(source, "{}", message),
    }

    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

pub fn snapshot(logs: &Mutex<Vec<LogEntry>>) -> Vec<LogEntry> {
    logs.lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_log_records_entry() {
        let logs = new_shared_logs();
        add_log(&logs, "ERROR", "FormSubmission", "Erro: connection refused");

        let entries = snapshot(&logs);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, "ERROR");
        assert_eq!(entries[0].source, "FormSubmission");
        assert_eq!(entries[0].message, "Erro: connection refused");
    }

    #[test]
    fn test_log_is_bounded() {
        let logs = new_shared_logs();
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            add_log(&logs, "INFO", "Test", &format!("entry {}", i));
        }

        let entries = snapshot(&logs);
        assert_eq!(entries.len(), MAX_LOG_ENTRIES);
        assert_eq!(entries[0].message, "entry 5");
    }
}
