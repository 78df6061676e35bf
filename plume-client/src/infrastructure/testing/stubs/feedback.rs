use parking_lot::Mutex;

use crate::infrastructure::logging::{ErrorLog, LogContext};
use crate::infrastructure::notifications::NotificationSink;

/// Notification sink that remembers every message.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().len()
    }
}

impl NotificationSink for RecordingNotifier {
    fn show(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// Error log that keeps records in memory.
#[derive(Debug, Default)]
pub struct RecordingErrorLog {
    records: Mutex<Vec<(String, LogContext)>>,
}

impl RecordingErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(String, LogContext)> {
        self.records.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.records.lock().len()
    }
}

impl ErrorLog for RecordingErrorLog {
    fn error(&self, message: &str, context: &LogContext) {
        self.records
            .lock()
            .push((message.to_string(), context.clone()));
    }
}
