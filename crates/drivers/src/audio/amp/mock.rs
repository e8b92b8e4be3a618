//! Mock speaker amplifier for host-side testing
//!
//! Implements [`AmpDriver`] without any hardware dependency. Records all calls
//! for assertion in tests.

use platform::DriverError;

use super::AmpDriver;

/// Mock amplifier: records all calls for test assertions.
#[derive(Debug, Default)]
pub struct MockAmp {
    /// Whether `reg_init` has succeeded.
    pub initialized: bool,
    /// Whether the amplifier stage is powered.
    pub enabled: bool,
    /// Whether the output is muted.
    pub muted: bool,
    /// Total number of times [`AmpDriver::reg_init`] has been called.
    pub init_count: usize,
    /// Total number of times [`AmpDriver::start_up`] has been called.
    pub start_count: usize,
    /// Total number of times [`AmpDriver::shut_down`] has been called.
    pub stop_count: usize,
    /// When set, the next call fails with this error and clears it.
    pub fail_next: Option<DriverError>,
}

impl MockAmp {
    /// Create a new mock amplifier. Starts uninitialised and powered down.
    pub fn new() -> Self {
        Self::default()
    }

    fn take_failure(&mut self) -> Result<(), DriverError> {
        self.fail_next.take().map_or(Ok(()), Err)
    }
}

impl AmpDriver for MockAmp {
    type Error = DriverError;

    #[allow(clippy::arithmetic_side_effects)] // Mock counter; overflow not a concern in tests
    async fn reg_init(&mut self) -> Result<(), Self::Error> {
        self.init_count += 1;
        self.take_failure()?;
        self.initialized = true;
        Ok(())
    }

    #[allow(clippy::arithmetic_side_effects)] // Mock counter; overflow not a concern in tests
    async fn start_up(&mut self) -> Result<(), Self::Error> {
        self.start_count += 1;
        self.take_failure()?;
        self.enabled = true;
        Ok(())
    }

    async fn set_mute(&mut self, mute: bool) -> Result<(), Self::Error> {
        self.take_failure()?;
        self.muted = mute;
        Ok(())
    }

    #[allow(clippy::arithmetic_side_effects)] // Mock counter; overflow not a concern in tests
    async fn shut_down(&mut self) -> Result<(), Self::Error> {
        self.stop_count += 1;
        self.take_failure()?;
        self.enabled = false;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_state() {
        let amp = MockAmp::new();
        assert!(!amp.is_enabled(), "amp should start powered down");
        assert!(!amp.initialized);
        assert_eq!(amp.start_count, 0);
        assert_eq!(amp.stop_count, 0);
    }

    #[tokio::test]
    async fn test_start_and_stop() {
        let mut amp = MockAmp::new();
        amp.reg_init().await.unwrap();
        amp.start_up().await.unwrap();
        assert!(amp.is_enabled());
        amp.shut_down().await.unwrap();
        assert!(!amp.is_enabled());
        assert_eq!((amp.init_count, amp.start_count, amp.stop_count), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_mute_toggles() {
        let mut amp = MockAmp::new();
        amp.set_mute(true).await.unwrap();
        assert!(amp.muted);
        amp.set_mute(false).await.unwrap();
        assert!(!amp.muted);
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let mut amp = MockAmp::new();
        amp.fail_next = Some(DriverError::Timeout);
        assert_eq!(amp.reg_init().await, Err(DriverError::Timeout));
        assert!(!amp.initialized);
        amp.reg_init().await.unwrap();
        assert!(amp.initialized);
        assert_eq!(amp.init_count, 2);
    }
}
