//! # Listen-only example
//!
//! Simulates the master/slave example network on the host and observes it
//! with a listen-only node:
//! - a master pings, starts, and stops a slave that streams data frames
//! - the node installs and starts its (simulated) driver, listens for
//!   three cycles, then stops and uninstalls it
//! - each observed frame is printed with its Base64 payload
//!
//! ```bash
//! cargo run --example listen_only
//! ```

use embassy_time::Duration;
use korri_listen::protocol::{
    config::TwaiConfig,
    listen_only::{
        handoff::Handoff,
        receiver::{FnSink, FrameRecord, ReceiverConfig},
        ListenOnlyNode, NodeConfig, DEFAULT_ITERATIONS,
    },
    transport::{
        can_frame::CanFrame,
        can_id::{
            FrameKind, ID_MASTER_PING, ID_MASTER_START_CMD, ID_MASTER_STOP_CMD, ID_SLAVE_DATA,
            ID_SLAVE_PING_RESP, ID_SLAVE_STOP_RESP,
        },
        traits::{can_bus::CanBus, can_driver::CanDriver, korri_timer::KorriTimer},
    },
};
use tokio::sync::mpsc;

// ============================================================================
// Simulated TWAI driver
// ============================================================================

#[derive(Debug)]
enum SimError {
    Disconnected,
    NotRunning,
}

struct SimDriver {
    rx: mpsc::Receiver<CanFrame>,
    running: bool,
}

impl CanBus for SimDriver {
    type Error = SimError;

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        if !self.running {
            return Err(SimError::NotRunning);
        }
        self.rx.recv().await.ok_or(SimError::Disconnected)
    }
}

impl CanDriver for SimDriver {
    fn install(&mut self, config: &TwaiConfig) -> Result<(), Self::Error> {
        println!(
            "Driver installed ({:?}, {} bit/s)",
            config.general.mode,
            config.timing.bit_rate.bits_per_second()
        );
        Ok(())
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        self.running = true;
        println!("Driver started");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.running = false;
        println!("Driver stopped");
        Ok(())
    }

    fn uninstall(&mut self) -> Result<(), Self::Error> {
        println!("Driver uninstalled");
        Ok(())
    }
}

#[derive(Clone)]
struct TokioTimer;

impl KorriTimer for TokioTimer {
    async fn delay_ms(&mut self, millis: u32) {
        tokio::time::sleep(std::time::Duration::from_millis(millis as u64)).await;
    }
}

// ============================================================================
// Simulated network: master and slave exchanges
// ============================================================================

async fn simulate_network(bus: mpsc::Sender<CanFrame>) {
    let mut counter: u32 = 0;
    loop {
        let exchange = [
            (ID_MASTER_PING, Vec::new()),
            (ID_SLAVE_PING_RESP, Vec::new()),
            (ID_MASTER_START_CMD, Vec::new()),
            (ID_SLAVE_DATA, counter.to_be_bytes().to_vec()),
            (ID_SLAVE_DATA, (counter + 1).to_be_bytes().to_vec()),
            (ID_MASTER_STOP_CMD, Vec::new()),
            (ID_SLAVE_STOP_RESP, Vec::new()),
        ];
        for (id, payload) in exchange {
            let Some(frame) = CanFrame::standard(id, &payload) else {
                continue;
            };
            if bus.send(frame).await.is_err() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        counter += 2;
    }
}

static HANDOFF: Handoff = Handoff::new();

#[tokio::main]
async fn main() {
    println!("=== korri-listen listen-only node ===\n");

    let (tx, rx) = mpsc::channel(5);
    let network = tokio::spawn(simulate_network(tx));

    let config = NodeConfig {
        receiver: ReceiverConfig {
            receive_delay: Duration::from_millis(10),
            frame_budget: Some(7),
        },
        listen_window: Some(Duration::from_secs(2)),
        ..NodeConfig::default()
    };
    let driver = SimDriver { rx, running: false };
    let mut node = ListenOnlyNode::new(driver, TokioTimer, config);

    let mut sink = FnSink(|record: &FrameRecord| {
        let role = if record.kind.is_master() {
            "master"
        } else if record.kind.is_slave() {
            "slave "
        } else {
            "other "
        };
        println!("[{}] {}", role, record);
    });

    match node
        .run_iterations(DEFAULT_ITERATIONS, &HANDOFF, &mut sink)
        .await
    {
        Ok(report) => {
            println!("\n{} cycles, {} frames", report.iterations, report.frames);
            for kind in FrameKind::ALL {
                println!("   {:?}: {}", kind, report.by_kind.get(kind));
            }
            println!("   last cycle ended: {:?}", report.last_end);
        }
        Err(e) => eprintln!("Node failed: {}", e),
    }

    network.abort();
}
