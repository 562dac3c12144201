//! Driver lifecycle with state tracking.
//!
//! The vendor driver is only valid when driven in order:
//!
//! ```text
//! Uninstalled ──install──▶ Installed ──start──▶ Running
//!      ▲                    │    ▲                 │
//!      └─────uninstall──────┘    └──────stop───────┘
//! ```
//!
//! Any other transition is refused with [`SessionError::InvalidState`]
//! before the driver is touched. A driver failure leaves the state unchanged
//! and is returned as [`SessionError::Driver`]; callers treat both as fatal.
use crate::error::SessionError;
use crate::protocol::config::TwaiConfig;
use crate::protocol::transport::traits::can_driver::CanDriver;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Lifecycle state of the driver.
pub enum DriverState {
    Uninstalled,
    /// Installed but not on the bus (never started, or stopped).
    Installed,
    /// On the bus, frames are being queued.
    Running,
}

/// Owns a [`CanDriver`] and enforces the lifecycle order.
pub struct DriverSession<D: CanDriver> {
    driver: D,
    state: DriverState,
}

impl<D: CanDriver> DriverSession<D> {
    /// Wrap a driver that has not been installed yet.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            state: DriverState::Uninstalled,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Release the driver, whatever its state.
    pub fn into_inner(self) -> D {
        self.driver
    }

    /// Validate `config` and install the driver.
    pub fn install(&mut self, config: &TwaiConfig) -> Result<(), SessionError<D::Error>> {
        self.expect(DriverState::Uninstalled)?;
        config.validate()?;
        self.driver.install(config).map_err(SessionError::Driver)?;
        self.state = DriverState::Installed;

        #[cfg(feature = "defmt")]
        defmt::info!("Driver installed");
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), SessionError<D::Error>> {
        self.expect(DriverState::Installed)?;
        self.driver.start().map_err(SessionError::Driver)?;
        self.state = DriverState::Running;

        #[cfg(feature = "defmt")]
        defmt::info!("Driver started");
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), SessionError<D::Error>> {
        self.expect(DriverState::Running)?;
        self.driver.stop().map_err(SessionError::Driver)?;
        self.state = DriverState::Installed;

        #[cfg(feature = "defmt")]
        defmt::info!("Driver stopped");
        Ok(())
    }

    pub fn uninstall(&mut self) -> Result<(), SessionError<D::Error>> {
        self.expect(DriverState::Installed)?;
        self.driver.uninstall().map_err(SessionError::Driver)?;
        self.state = DriverState::Uninstalled;

        #[cfg(feature = "defmt")]
        defmt::info!("Driver uninstalled");
        Ok(())
    }

    /// Receive half of the driver. Only available while running.
    pub fn running_bus(&mut self) -> Result<&mut D, SessionError<D::Error>> {
        self.expect(DriverState::Running)?;
        Ok(&mut self.driver)
    }

    fn expect(&self, expected: DriverState) -> Result<(), SessionError<D::Error>> {
        if self.state != expected {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "Driver in state {}, expected {}",
                self.state,
                expected
            );
            return Err(SessionError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }
}
