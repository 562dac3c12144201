//! Listen-only node: observes a CAN network without acknowledging or
//! transmitting anything.
//!
//! A run goes through these steps:
//!
//! 1. install and start the driver ([`session`]);
//! 2. give the start hand-off to the receiver ([`handoff`]);
//! 3. wait a short startup delay, then (optionally) a listen window after
//!    which a stop is requested;
//! 4. take the completion hand-off given back by the receiver ([`receiver`]);
//! 5. stop and uninstall the driver.
//!
//! The receiver and the control flow run as two futures joined on the
//! caller's executor; they only share the [`Handoff`] signals.
//!
//! # Example
//!
//! ```rust,ignore
//! use korri_listen::protocol::listen_only::{
//!     handoff::Handoff, receiver::FnSink, ListenOnlyNode, NodeConfig,
//! };
//!
//! static HANDOFF: Handoff = Handoff::new();
//!
//! let mut node = ListenOnlyNode::new(twai_driver, timer, NodeConfig::default());
//! let mut sink = FnSink(|record: &_| println!("{}", record));
//! let report = node.run(&HANDOFF, &mut sink).await?;
//! ```
use embassy_time::Duration;
use futures_util::{
    future::{join, select, Either},
    pin_mut,
};

use crate::error::SessionError;
use crate::protocol::config::TwaiConfig;
use crate::protocol::transport::{
    can_id::KindCounters,
    traits::{can_driver::CanDriver, korri_timer::KorriTimer},
    STARTUP_DELAY_MS,
};

pub mod handoff;
pub mod receiver;
pub mod session;

use handoff::Handoff;
use receiver::{EndReason, FrameSink, ReceiveSummary, Receiver, ReceiverConfig};
use session::{DriverSession, DriverState};

/// Listen cycles of a default run.
pub const DEFAULT_ITERATIONS: usize = 3;

//==================================================================================CONFIG
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Node settings.
pub struct NodeConfig {
    pub twai: TwaiConfig,
    pub receiver: ReceiverConfig,
    /// Delay between the start hand-off and the wait for completion.
    pub startup_delay: Duration,
    /// Listening time after the startup delay before a stop is requested.
    /// `None` lets the receiver run until its budget or a bus error.
    pub listen_window: Option<Duration>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            twai: TwaiConfig::default(),
            receiver: ReceiverConfig::default(),
            startup_delay: Duration::from_millis(STARTUP_DELAY_MS),
            listen_window: None,
        }
    }
}

//==================================================================================REPORT
#[derive(Debug, Clone, PartialEq, Eq)]
/// Aggregated outcome of a node run.
pub struct SessionReport<E> {
    /// Listen cycles completed.
    pub iterations: usize,
    pub frames: usize,
    pub by_kind: KindCounters,
    /// How the last cycle ended.
    pub last_end: Option<EndReason<E>>,
}

impl<E> Default for SessionReport<E> {
    fn default() -> Self {
        Self {
            iterations: 0,
            frames: 0,
            by_kind: KindCounters::new(),
            last_end: None,
        }
    }
}

impl<E> SessionReport<E> {
    fn absorb(&mut self, summary: ReceiveSummary<E>) {
        self.iterations += 1;
        self.frames += summary.frames;
        self.by_kind.merge(&summary.by_kind);
        self.last_end = Some(summary.end);
    }
}

//==================================================================================NODE
/// Listen-only node driving a [`CanDriver`] and its receiver task.
pub struct ListenOnlyNode<D: CanDriver, T: KorriTimer + Clone> {
    session: DriverSession<D>,
    timer: T,
    config: NodeConfig,
}

impl<D, T> ListenOnlyNode<D, T>
where
    D: CanDriver,
    T: KorriTimer + Clone,
{
    pub fn new(driver: D, timer: T, config: NodeConfig) -> Self {
        Self {
            session: DriverSession::new(driver),
            timer,
            config,
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn driver_state(&self) -> DriverState {
        self.session.state()
    }

    pub fn session(&self) -> &DriverSession<D> {
        &self.session
    }

    /// Release the driver and the timer.
    pub fn into_parts(self) -> (D, T) {
        (self.session.into_inner(), self.timer)
    }

    /// One complete run: install, start, one listen cycle, stop, uninstall.
    pub async fn run<S: FrameSink + ?Sized>(
        &mut self,
        handoff: &Handoff,
        sink: &mut S,
    ) -> Result<SessionReport<D::Error>, SessionError<D::Error>> {
        self.run_iterations(1, handoff, sink).await
    }

    /// Like [`run`](Self::run) with `iterations` listen cycles while the driver
    /// stays started. A bus error ends the run early; the driver is still
    /// stopped and uninstalled.
    ///
    /// If the driver fails to start it is uninstalled again before the start
    /// error is returned, so the node can be run later. A failing stop or
    /// uninstall leaves the driver in its current state.
    pub async fn run_iterations<S: FrameSink + ?Sized>(
        &mut self,
        iterations: usize,
        handoff: &Handoff,
        sink: &mut S,
    ) -> Result<SessionReport<D::Error>, SessionError<D::Error>> {
        self.session.install(&self.config.twai)?;
        if let Err(err) = self.session.start() {
            // Best effort: the start error is the one reported.
            let _ = self.session.uninstall();
            return Err(err);
        }

        let mut report = SessionReport::default();
        for _iteration in 0..iterations {
            #[cfg(feature = "defmt")]
            defmt::info!("Listen cycle {=usize}/{=usize}", _iteration + 1, iterations);

            let summary = self.listen_once(handoff, sink).await?;
            let bus_failed = matches!(summary.end, EndReason::Bus(_));
            report.absorb(summary);
            if bus_failed {
                break;
            }
        }

        self.session.stop()?;
        self.session.uninstall()?;
        Ok(report)
    }

    async fn listen_once<S: FrameSink + ?Sized>(
        &mut self,
        handoff: &Handoff,
        sink: &mut S,
    ) -> Result<ReceiveSummary<D::Error>, SessionError<D::Error>> {
        handoff.reset();

        let receiver = Receiver::new(self.config.receiver);
        let startup_delay = self.config.startup_delay;
        let listen_window = self.config.listen_window;
        let mut rx_timer = self.timer.clone();
        let timer = &mut self.timer;
        let bus = self.session.running_bus()?;

        handoff.give_start();
        let rx = receiver.run(bus, &mut rx_timer, handoff, sink);
        let control = async move {
            timer.delay(startup_delay).await;

            if let Some(window) = listen_window {
                let finished_early = {
                    let window = timer.delay(window);
                    let done = handoff.take_done();
                    pin_mut!(window);
                    pin_mut!(done);
                    matches!(select(window, done).await, Either::Right(_))
                };
                if finished_early {
                    return;
                }
                handoff.request_stop();
            }

            handoff.take_done().await;
        };

        let (summary, ()) = join(rx, control).await;
        Ok(summary)
    }
}
