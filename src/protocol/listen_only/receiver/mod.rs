//! Receiver task of the listen-only node.
//!
//! The task blocks on the start hand-off, then turns every received frame
//! into a [`FrameRecord`] (identifier, big-endian payload value, Base64
//! payload), logs it and hands it to a [`FrameSink`]. It ends when its frame
//! budget is exhausted, when a stop is requested, or when the bus reports an
//! error, and always gives the completion hand-off back before returning.
use core::fmt;

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Sender};
use embassy_time::Duration;
use futures_util::{
    future::{select, Either},
    pin_mut,
};

use crate::core::PayloadText;
use crate::infra::codec::traits::ToBase64;
use crate::protocol::listen_only::handoff::Handoff;
use crate::protocol::transport::{
    can_frame::CanFrame,
    can_id::{FrameKind, KindCounters},
    traits::{can_bus::CanBus, korri_timer::KorriTimer},
    RECEIVE_DELAY_MS,
};

//==================================================================================FRAME_RECORD
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Log entry for one received frame.
pub struct FrameRecord {
    /// Numeric identifier (11 or 29 bits).
    pub id: u32,
    pub extended: bool,
    pub kind: FrameKind,
    /// Data length code.
    pub dlc: usize,
    /// Payload folded big-endian.
    pub value: u64,
    /// Payload as Base64.
    pub text: PayloadText,
}

impl FrameRecord {
    pub fn from_frame(frame: &CanFrame) -> Self {
        Self {
            id: frame.raw_id(),
            extended: matches!(frame.id, embedded_can::Id::Extended(_)),
            kind: frame.kind(),
            dlc: frame.payload().len(),
            value: frame.payload_value(),
            // A classic payload (≤ 8 bytes) always fits the 12-symbol text.
            text: frame.to_base64().unwrap_or_default(),
        }
    }
}

impl fmt::Display for FrameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id: {}, Msg: {}, Base64: {}", self.id, self.value, self.text)
    }
}

//==================================================================================FRAME_SINK
/// Destination of the records produced by the receiver.
pub trait FrameSink {
    fn deliver(&mut self, record: &FrameRecord);
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn deliver(&mut self, record: &FrameRecord) {
        (**self).deliver(record)
    }
}

/// Adapts a closure into a [`FrameSink`].
pub struct FnSink<F>(pub F);

impl<F: FnMut(&FrameRecord)> FrameSink for FnSink<F> {
    fn deliver(&mut self, record: &FrameRecord) {
        (self.0)(record)
    }
}

/// Discards every record; the receiver still logs them.
pub struct NullSink;

impl FrameSink for NullSink {
    fn deliver(&mut self, _record: &FrameRecord) {}
}

/// Forwards records to another task. Records are dropped when the channel is
/// full so that a slow consumer never stalls reception.
impl<M: RawMutex, const N: usize> FrameSink for Sender<'_, M, FrameRecord, N> {
    fn deliver(&mut self, record: &FrameRecord) {
        if self.try_send(*record).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Record channel full, dropping frame {=u32}", record.id);
        }
    }
}

//==================================================================================CONFIG
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Receiver settings.
pub struct ReceiverConfig {
    /// Pause after each frame.
    pub receive_delay: Duration,
    /// Stop after this many frames; `None` runs until stopped or a bus error.
    pub frame_budget: Option<usize>,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            receive_delay: Duration::from_millis(RECEIVE_DELAY_MS),
            frame_budget: None,
        }
    }
}

//==================================================================================SUMMARY
#[derive(Debug, Clone, PartialEq, Eq)]
/// Why the receiver returned.
pub enum EndReason<E> {
    BudgetReached,
    StopRequested,
    /// Receiving failed; the error is fatal for this run.
    Bus(E),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of one receiver run.
pub struct ReceiveSummary<E> {
    pub frames: usize,
    pub by_kind: KindCounters,
    pub end: EndReason<E>,
}

//==================================================================================RECEIVER
/// Receiver task body.
#[derive(Clone, Copy, Debug, Default)]
pub struct Receiver {
    config: ReceiverConfig,
}

impl Receiver {
    pub fn new(config: ReceiverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    /// Wait for the start hand-off, then receive until the run ends.
    pub async fn run<C, T, S>(
        &self,
        bus: &mut C,
        timer: &mut T,
        handoff: &Handoff,
        sink: &mut S,
    ) -> ReceiveSummary<C::Error>
    where
        C: CanBus,
        T: KorriTimer,
        S: FrameSink + ?Sized,
    {
        handoff.take_start().await;

        #[cfg(feature = "defmt")]
        defmt::info!("Receiver started");

        let mut frames = 0;
        let mut by_kind = KindCounters::new();

        let end = loop {
            if self.config.frame_budget.is_some_and(|budget| frames >= budget) {
                break EndReason::BudgetReached;
            }
            if handoff.is_stop_requested() {
                break EndReason::StopRequested;
            }

            let incoming = {
                let recv = bus.recv();
                let stop = handoff.wait_stop();
                pin_mut!(recv);
                pin_mut!(stop);

                match select(recv, stop).await {
                    Either::Left((result, _)) => Some(result),
                    Either::Right(_) => None,
                }
            };

            let frame = match incoming {
                Some(Ok(frame)) => frame,
                Some(Err(err)) => {
                    #[cfg(feature = "defmt")]
                    defmt::error!("Receive error after {=usize} frames", frames);
                    break EndReason::Bus(err);
                }
                None => break EndReason::StopRequested,
            };

            let record = FrameRecord::from_frame(&frame);
            frames += 1;
            by_kind.record(record.kind);

            #[cfg(feature = "defmt")]
            defmt::info!(
                "Id: {=u32}, Msg: {=u64}, Base64: {}",
                record.id,
                record.value,
                record.text
            );

            sink.deliver(&record);

            if self.config.receive_delay.as_ticks() > 0 {
                timer.delay(self.config.receive_delay).await;
            }
        };

        #[cfg(feature = "defmt")]
        defmt::info!("Receiver done, {=usize} frames", frames);

        handoff.give_done();
        ReceiveSummary {
            frames,
            by_kind,
            end,
        }
    }
}
