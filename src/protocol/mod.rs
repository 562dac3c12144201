//! High-level components of the listen-only node: driver configuration,
//! CAN transport abstractions, and the receive session itself.
pub mod config;
pub mod listen_only;
pub mod transport;
