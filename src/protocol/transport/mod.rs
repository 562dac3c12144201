//! Listen-only transport layer: CAN frame representation, example network
//! identifiers, and the driver/bus/timer abstraction traits.
//!
//! ## Timing Constants
//!
//! Delays used by the listen-only session, expressed in milliseconds for an
//! ESP-IDF target running the FreeRTOS tick at 100 Hz.

pub mod can_frame;
pub mod can_id;
pub mod traits;

/// Delay between the start hand-off and the wait for the receiver (ms).
///
/// Gives the receiver task time to take the start signal before the main
/// flow blocks on the completion signal.
pub const STARTUP_DELAY_MS: u64 = 100;

/// Pause after each received frame (ms).
///
/// 100 scheduler ticks at the default 100 Hz tick rate, i.e. one second.
/// It throttles console output, not reception: frames keep queueing in the driver RX queue meanwhile.
pub const RECEIVE_DELAY_MS: u64 = 1_000;
