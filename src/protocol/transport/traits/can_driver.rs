//! Lifecycle of the CAN controller driver.
//!
//! The vendor driver owns everything below this trait (bit timing, filters,
//! interrupts). The library only sequences its four lifecycle calls; see
//! [`DriverSession`](crate::protocol::listen_only::session::DriverSession)
//! for the ordering rules.
use crate::protocol::config::TwaiConfig;
use crate::protocol::transport::traits::can_bus::CanBus;

/// Controller driver: install → start → (receive) → stop → uninstall.
///
/// Receiving goes through the [`CanBus`] supertrait and shares its error type.
pub trait CanDriver: CanBus {
    /// Allocate driver resources and apply `config`. The controller stays stopped.
    fn install(&mut self, config: &TwaiConfig) -> Result<(), Self::Error>;
    /// Join the bus; frames start filling the RX queue.
    fn start(&mut self) -> Result<(), Self::Error>;
    /// Leave the bus. Pending RX frames may be discarded.
    fn stop(&mut self) -> Result<(), Self::Error>;
    /// Release driver resources.
    fn uninstall(&mut self) -> Result<(), Self::Error>;
}
