/// Test doubles to simulate the TWAI driver and timer during integration tests.
use korri_listen::protocol::{
    config::TwaiConfig,
    transport::{
        can_frame::CanFrame,
        traits::{can_bus::CanBus, can_driver::CanDriver, korri_timer::KorriTimer},
    },
};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
/// Lifecycle calls observed by the mock driver.
pub enum DriverCall {
    Install,
    Start,
    Stop,
    Uninstall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum MockError {
    /// The host side hung up.
    Closed,
    /// `recv` called while the controller is not started.
    NotStarted,
    /// Failure injected with `MockTwaiDriver::fail_on`.
    Injected,
}

#[derive(Default)]
struct Shared {
    calls: Vec<DriverCall>,
    config: Option<TwaiConfig>,
}

/// In-memory TWAI driver: lifecycle bookkeeping plus a frame queue fed by the host.
pub struct MockTwaiDriver {
    rx: mpsc::UnboundedReceiver<CanFrame>,
    shared: Arc<Mutex<Shared>>,
    running: bool,
    fail_on: Option<DriverCall>,
}

/// Host end of the simulated bus: injects frames and inspects the driver.
pub struct HostBus {
    tx: Option<mpsc::UnboundedSender<CanFrame>>,
    shared: Arc<Mutex<Shared>>,
}

#[allow(dead_code)]
impl MockTwaiDriver {
    /// Build a driver and the host handle feeding it.
    pub fn create_pair() -> (Self, HostBus) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Mutex::new(Shared::default()));
        let driver = Self {
            rx,
            shared: shared.clone(),
            running: false,
            fail_on: None,
        };
        let host = HostBus {
            tx: Some(tx),
            shared,
        };
        (driver, host)
    }

    /// Make the given lifecycle call fail.
    pub fn fail_on(mut self, call: DriverCall) -> Self {
        self.fail_on = Some(call);
        self
    }

    fn apply(&mut self, call: DriverCall) -> Result<(), MockError> {
        if self.fail_on == Some(call) {
            return Err(MockError::Injected);
        }
        self.shared.lock().unwrap().calls.push(call);
        Ok(())
    }
}

#[allow(dead_code)]
impl HostBus {
    /// Put a frame on the bus.
    pub fn send(&self, frame: CanFrame) {
        if let Some(tx) = &self.tx {
            tx.send(frame).expect("driver dropped");
        }
    }

    /// Put a standard-id frame on the bus.
    pub fn send_standard(&self, id: u16, payload: &[u8]) {
        self.send(CanFrame::standard(id, payload).expect("valid frame"));
    }

    /// Disconnect the host; pending frames are still delivered, then `recv` fails.
    pub fn close(&mut self) {
        self.tx = None;
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.shared.lock().unwrap().calls.clone()
    }

    pub fn installed_config(&self) -> Option<TwaiConfig> {
        self.shared.lock().unwrap().config
    }
}

impl CanBus for MockTwaiDriver {
    type Error = MockError;

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        if !self.running {
            return Err(MockError::NotStarted);
        }
        self.rx.recv().await.ok_or(MockError::Closed)
    }
}

impl CanDriver for MockTwaiDriver {
    fn install(&mut self, config: &TwaiConfig) -> Result<(), Self::Error> {
        self.apply(DriverCall::Install)?;
        self.shared.lock().unwrap().config = Some(*config);
        Ok(())
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        self.apply(DriverCall::Start)?;
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.apply(DriverCall::Stop)?;
        self.running = false;
        Ok(())
    }

    fn uninstall(&mut self) -> Result<(), Self::Error> {
        self.apply(DriverCall::Uninstall)
    }
}

#[derive(Clone)]
#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to drive delays in tests.
pub struct MockTimer;

impl KorriTimer for MockTimer {
    async fn delay_ms(&mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }
}
