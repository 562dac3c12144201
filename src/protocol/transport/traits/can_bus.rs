//! Minimal abstraction for an asynchronous, receive-only CAN bus. Allows the
//! library to plug into various implementations (embedded HAL, desktop
//! driver, simulated bus).
use crate::protocol::transport::can_frame::CanFrame;
use futures_util::Future;

/// Contract to receive CAN frames asynchronously.
///
/// A listen-only node never acknowledges nor transmits, so there is no send
/// half.
pub trait CanBus {
    type Error: core::fmt::Debug;
    /// Retrieve the next available frame. Asynchronously waits until data arrives.
    fn recv<'a>(&'a mut self) -> impl Future<Output = Result<CanFrame, Self::Error>> + 'a;
}
