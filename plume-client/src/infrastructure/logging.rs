//! Structured error logging and subscriber setup

use std::fmt;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Key/value context attached to an error record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogContext {
    fields: Vec<(&'static str, String)>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value:?}")?;
        }
        Ok(())
    }
}

/// Sink for structured error records.
pub trait ErrorLog: Send + Sync {
    fn error(&self, message: &str, context: &LogContext);
}

/// Emits error records as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorLog;

impl ErrorLog for TracingErrorLog {
    fn error(&self, message: &str, context: &LogContext) {
        tracing::error!(
            target: "plume::preferences",
            kind = context.get("kind").unwrap_or("unknown"),
            context = %context,
            "{message}"
        );
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A subscriber may already be installed (tests, embedding shells).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_renders_as_key_value_pairs() {
        let context = LogContext::new()
            .with("kind", "NetworkError")
            .with("error", "connection refused");

        assert_eq!(context.get("kind"), Some("NetworkError"));
        assert_eq!(
            context.to_string(),
            r#"kind="NetworkError" error="connection refused""#
        );
    }
}
