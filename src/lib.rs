//! `korri-listen` library: a listen-only CAN (TWAI) node for `no_std`
//! firmware. The crate exposes the infrastructure modules (Base64 codec),
//! the transport abstractions (frames, identifiers, driver/bus/timer traits)
//! and the listen-only session (driver lifecycle, receiver task, hand-off).
#![no_std]
//==================================================================================
/// Fixed-capacity value types shared by the codec and the node.
pub mod core;
/// Domain and low-level errors (Base64 buffers, configuration, driver lifecycle).
pub mod error;
/// Payload codecs, starting with the allocation-free Base64 block encoder.
pub mod infra;
/// Listen-only node: driver configuration, CAN transport, receiver and session.
pub mod protocol;
//==================================================================================
