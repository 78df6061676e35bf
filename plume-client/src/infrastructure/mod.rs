pub mod api_client;
pub mod logging;
pub mod notifications;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api_client::ApiClient;
pub use logging::{ErrorLog, LogContext, TracingErrorLog};
pub use notifications::{NotificationSink, ToastLevel, ToastManager};
