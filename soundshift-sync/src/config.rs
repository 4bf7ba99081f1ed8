//! Configuration for the sync controller and its worker

use std::time::Duration;

use crate::error::SyncError;

/// Configuration for the sync controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Capacity of the backend notification channel
    /// Default: 16
    pub notification_buffer: usize,

    /// Longest a single command or fetch may take before it counts as failed
    /// Default: 5 seconds
    pub fetch_timeout: Duration,

    /// How often the worker drains queued user commands
    /// Default: 10 milliseconds
    pub command_poll_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            notification_buffer: 16,
            fetch_timeout: Duration::from_secs(5),
            command_poll_interval: Duration::from_millis(10),
        }
    }
}

impl SyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorter timeouts and polling, for interactive use and tests
    pub fn responsive() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(1),
            command_poll_interval: Duration::from_millis(2),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), SyncError> {
        if self.notification_buffer == 0 {
            return Err(SyncError::Configuration(
                "Notification buffer must be greater than 0".to_string(),
            ));
        }

        if self.fetch_timeout == Duration::ZERO {
            return Err(SyncError::Configuration(
                "Fetch timeout must be greater than 0".to_string(),
            ));
        }

        if self.command_poll_interval == Duration::ZERO {
            return Err(SyncError::Configuration(
                "Command poll interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_notification_buffer(mut self, size: usize) -> Self {
        self.notification_buffer = size;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_command_poll_interval(mut self, interval: Duration) -> Self {
        self.command_poll_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.notification_buffer, 16);
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(SyncConfig::new().with_notification_buffer(0).validate().is_err());
        assert!(SyncConfig::new().with_fetch_timeout(Duration::ZERO).validate().is_err());
        assert!(SyncConfig::new()
            .with_command_poll_interval(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_responsive_preset() {
        let config = SyncConfig::responsive();
        assert!(config.fetch_timeout < SyncConfig::default().fetch_timeout);
        assert_eq!(config.notification_buffer, 16);
        assert!(config.validate().is_ok());
    }
}
