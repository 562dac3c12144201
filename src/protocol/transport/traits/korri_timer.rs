//! Asynchronous timer abstraction providing the delays required by the
//! session hand-off and the receiver pacing.
use embassy_time::Duration;

/// Timer trait abstraction; must remain thread-safe when applicable.
pub trait KorriTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;

    /// Asynchronously wait for `duration`, saturating at `u32::MAX` milliseconds.
    fn delay<'a>(&'a mut self, duration: Duration) -> impl core::future::Future<Output = ()> + 'a {
        let millis = duration.as_millis().min(u32::MAX as u64) as u32;
        self.delay_ms(millis)
    }
}
