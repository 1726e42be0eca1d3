use std::collections::VecDeque;

pub const MAX_LOG_ENTRIES: usize = 1000;

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogEntry {
    /// Single line as shown in the log pane
    pub fn line(&self) -> String {
        match self.level {
            LogLevel::Info => format!("[{}] {}", self.timestamp, self.message),
            LogLevel::Warning => format!("[{}] WARNING: {}", self.timestamp, self.message),
            LogLevel::Error => format!("[{}] ERROR: {}", self.timestamp, self.message),
        }
    }
}

/// Bounded log pane contents; every entry is also forwarded to the `log` facade
#[derive(Debug, Default)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Info => log::info!("{}", message),
            LogLevel::Warning => log::warn!("{}", message),
            LogLevel::Error => log::error!("{}", message),
        }

        self.entries.push_back(LogEntry {
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            level,
            message,
        });

        // Keep only last MAX_LOG_ENTRIES
        while self.entries.len() > MAX_LOG_ENTRIES {
            self.entries.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_is_bounded() {
        let mut logs = LogBuffer::new();
        for i in 0..MAX_LOG_ENTRIES + 5 {
            logs.push(LogLevel::Info, format!("line {}", i));
        }

        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs.iter().next().unwrap().message, "line 5");
        assert_eq!(logs.last().unwrap().message, format!("line {}", MAX_LOG_ENTRIES + 4));
    }

    #[test]
    fn test_line_prefix_by_level() {
        let mut logs = LogBuffer::new();
        logs.push(LogLevel::Error, "docker stop failed");
        let line = logs.last().unwrap().line();
        assert!(line.ends_with("ERROR: docker stop failed"));
    }
}
