//! # Listen-only ESP32-S3 Example
//!
//! Observes a CAN network through the ESP32-S3 TWAI controller in
//! listen-only mode (no acknowledgement, no transmission) using Embassy and
//! esp-hal.
//!
//! ## Compilation
//! ```bash
//! cargo build --example esp32s3_listen_only --target xtensa-esp32s3-none-elf --features embedded-examples
//! cargo run --example esp32s3_listen_only --target xtensa-esp32s3-none-elf --features embedded-examples
//! ```
//!
//! ## Required hardware
//! - ESP32-S3 DevKit
//! - CAN transceiver (e.g. SN65HVD230)
//! - Connections:
//!   - GPIO21 → CAN TX
//!   - GPIO22 → CAN RX

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use embassy_time::Duration;
use embedded_can::Frame;
use esp_hal::{
    clock::CpuClock,
    gpio::AnyPin,
    peripherals::TWAI0,
    timer::timg::TimerGroup,
    twai::{self, BaudRate, EspTwaiError, Twai, TwaiConfiguration},
    Async,
};

use korri_listen::protocol::{
    config::{TwaiConfig, TwaiMode},
    listen_only::{
        handoff::Handoff, receiver::FrameRecord, ListenOnlyNode, NodeConfig, DEFAULT_ITERATIONS,
    },
    transport::{
        can_frame::CanFrame,
        traits::{can_bus::CanBus, can_driver::CanDriver, korri_timer::KorriTimer},
    },
};

// ============================================================================
// CanDriver implementation for the ESP32-S3 TWAI controller
// ============================================================================

#[derive(Debug)]
pub enum EspDriverError {
    /// Lifecycle call on a controller that is not in the matching state.
    NotReady,
    /// Only listen-only operation is supported by this driver.
    UnsupportedMode,
    Twai(EspTwaiError),
}

enum Controller<'d> {
    Idle {
        twai: TWAI0<'d>,
        rx: AnyPin<'d>,
        tx: AnyPin<'d>,
    },
    Configured(TwaiConfiguration<'d, Async>),
    Running(Twai<'d, Async>),
    /// Transitional state while the controller is moved between variants.
    Busy,
}

pub struct EspTwaiDriver<'d> {
    controller: Controller<'d>,
}

impl<'d> EspTwaiDriver<'d> {
    pub fn new(twai: TWAI0<'d>, rx: AnyPin<'d>, tx: AnyPin<'d>) -> Self {
        Self {
            controller: Controller::Idle { twai, rx, tx },
        }
    }

    fn baud_rate(config: &TwaiConfig) -> BaudRate {
        use korri_listen::protocol::config::BitRate;
        match config.timing.bit_rate {
            BitRate::B125K => BaudRate::B125K,
            BitRate::B250K => BaudRate::B250K,
            BitRate::B500K => BaudRate::B500K,
            _ => BaudRate::B1000K,
        }
    }
}

impl CanBus for EspTwaiDriver<'_> {
    type Error = EspDriverError;

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        let Controller::Running(can) = &mut self.controller else {
            return Err(EspDriverError::NotReady);
        };
        let frame = can.receive_async().await.map_err(EspDriverError::Twai)?;
        CanFrame::new(frame.id(), frame.data()).ok_or(EspDriverError::NotReady)
    }
}

impl CanDriver for EspTwaiDriver<'_> {
    fn install(&mut self, config: &TwaiConfig) -> Result<(), Self::Error> {
        if config.general.mode != TwaiMode::ListenOnly {
            return Err(EspDriverError::UnsupportedMode);
        }
        match core::mem::replace(&mut self.controller, Controller::Busy) {
            Controller::Idle { twai, rx, tx } => {
                let configuration = TwaiConfiguration::new(
                    twai,
                    rx,
                    tx,
                    Self::baud_rate(config),
                    twai::TwaiMode::ListenOnly,
                )
                .into_async();
                self.controller = Controller::Configured(configuration);
                Ok(())
            }
            other => {
                self.controller = other;
                Err(EspDriverError::NotReady)
            }
        }
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        match core::mem::replace(&mut self.controller, Controller::Busy) {
            Controller::Configured(configuration) => {
                self.controller = Controller::Running(configuration.start());
                Ok(())
            }
            other => {
                self.controller = other;
                Err(EspDriverError::NotReady)
            }
        }
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        match core::mem::replace(&mut self.controller, Controller::Busy) {
            Controller::Running(can) => {
                self.controller = Controller::Configured(can.stop());
                Ok(())
            }
            other => {
                self.controller = other;
                Err(EspDriverError::NotReady)
            }
        }
    }

    fn uninstall(&mut self) -> Result<(), Self::Error> {
        // The peripheral stays owned by the configuration; it is reconfigured
        // on the next install of a fresh driver.
        match &self.controller {
            Controller::Configured(_) => Ok(()),
            _ => Err(EspDriverError::NotReady),
        }
    }
}

// ============================================================================
// Timer implementation for ESP32-S3
// ============================================================================

#[derive(Clone)]
pub struct EspTimer;

impl KorriTimer for EspTimer {
    async fn delay_ms(&mut self, millis: u32) {
        embassy_time::Timer::after(Duration::from_millis(millis as u64)).await;
    }
}

// ============================================================================
// Main application
// ============================================================================

esp_bootloader_esp_idf::esp_app_desc!();

static HANDOFF: Handoff = Handoff::new();
static RECORDS: Channel<CriticalSectionRawMutex, FrameRecord, 8> = Channel::new();

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    esp_println::println!("=== ESP32-S3 listen-only node ===");

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    let driver = EspTwaiDriver::new(
        peripherals.TWAI0,
        peripherals.GPIO22.into(),
        peripherals.GPIO21.into(),
    );

    spawner.spawn(task_print_records()).unwrap();

    let mut node = ListenOnlyNode::new(driver, EspTimer, NodeConfig::default());
    let mut sink = RECORDS.sender();
    match node
        .run_iterations(DEFAULT_ITERATIONS, &HANDOFF, &mut sink)
        .await
    {
        Ok(report) => esp_println::println!(
            "✓ {} cycles, {} frames observed",
            report.iterations,
            report.frames
        ),
        Err(e) => esp_println::println!("✗ Listen-only node failed: {:?}", e),
    }

    loop {
        embassy_time::Timer::after(Duration::from_secs(10)).await;
    }
}

// ============================================================================
// Application tasks
// ============================================================================

/// Print every record forwarded by the receiver.
#[embassy_executor::task]
async fn task_print_records() {
    loop {
        let record = RECORDS.receive().await;
        esp_println::println!("{}", record);
    }
}

// ============================================================================
// Panic handler
// ============================================================================

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    esp_println::println!("PANIC: {:?}", info);
    loop {
        core::hint::spin_loop();
    }
}
