//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Failed to create event loop
    #[error("Failed to create event loop: {0}")]
    EventLoop(String),

    /// Failed to create window
    #[error("Failed to create window: {0}")]
    WindowCreation(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failed_step() {
        let err = PlatformError::EventLoop("no display".into());
        assert_eq!(err.to_string(), "Failed to create event loop: no display");

        let err: Result<()> = Err(PlatformError::WindowCreation("denied".into()));
        assert_eq!(
            err.unwrap_err().to_string(),
            "Failed to create window: denied"
        );
    }
}
