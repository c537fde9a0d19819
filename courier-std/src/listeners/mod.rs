//! Standard listener adapters.

pub mod logging;
pub mod timeout;

pub use logging::LoggingListener;
pub use timeout::TimeoutListener;
