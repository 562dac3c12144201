//! Abstraction traits used by the transport layer (driver lifecycle, receive-only bus, timer).
pub mod can_bus;
pub mod can_driver;
pub mod korri_timer;
