//! Driver configuration handed to [`CanDriver::install`](crate::protocol::transport::traits::can_driver::CanDriver::install).
//!
//! Mirrors the three configuration blocks of the vendor TWAI driver:
//! general (mode, pins, queues, alerts), timing (bit rate) and acceptance
//! filter. Values are plain data; the driver is responsible for turning them
//! into register settings.
//!
//! # Example
//!
//! ```
//! use korri_listen::protocol::config::{BitRate, TwaiConfig, TwaiMode};
//!
//! let config = TwaiConfig::builder()
//!     .pins(21, 22)
//!     .bit_rate(BitRate::B500K)
//!     .rx_queue_len(10)
//!     .build();
//!
//! assert_eq!(config.general.mode, TwaiMode::ListenOnly);
//! assert_eq!(config.general.tx_queue_len, 0);
//! assert!(config.validate().is_ok());
//! ```
use crate::error::ConfigError;

/// Default TX pin of the reference board.
pub const DEFAULT_TX_GPIO: u8 = 21;
/// Default RX pin of the reference board.
pub const DEFAULT_RX_GPIO: u8 = 22;
/// Default RX queue depth.
pub const DEFAULT_RX_QUEUE_LEN: u32 = 5;

//==================================================================================MODE
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Controller operating mode.
pub enum TwaiMode {
    /// Regular node: transmits, acknowledges, raises error frames.
    Normal,
    /// Transmits without requiring acknowledgments (self-test).
    NoAck,
    /// Receives only: no acknowledgments, no error frames, no transmission.
    ListenOnly,
}

//==================================================================================ALERTS
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Driver alert mask (bit set of vendor alert flags).
pub struct Alerts(pub u32);

impl Alerts {
    pub const NONE: Alerts = Alerts(0);
    pub const ALL: Alerts = Alerts(u32::MAX);

    pub const fn bits(self) -> u32 {
        self.0
    }
}

//==================================================================================GENERAL
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// General driver configuration.
pub struct GeneralConfig {
    pub mode: TwaiMode,
    /// GPIO routed to the transceiver TX line.
    pub tx_io: u8,
    /// GPIO routed to the transceiver RX line.
    pub rx_io: u8,
    /// Optional clock output pin.
    pub clkout_io: Option<u8>,
    /// Optional bus-off indicator pin.
    pub bus_off_io: Option<u8>,
    /// Frames the driver may queue for transmission. Must be 0 in listen-only mode.
    pub tx_queue_len: u32,
    /// Frames the driver may queue on reception.
    pub rx_queue_len: u32,
    pub alerts: Alerts,
    /// Clock output divider; 0 disables the clock output.
    pub clkout_divider: u32,
}

impl GeneralConfig {
    /// Listen-only setup on the given pins: no TX queue, no alerts.
    pub const fn listen_only(tx_io: u8, rx_io: u8) -> Self {
        Self {
            mode: TwaiMode::ListenOnly,
            tx_io,
            rx_io,
            clkout_io: None,
            bus_off_io: None,
            tx_queue_len: 0,
            rx_queue_len: DEFAULT_RX_QUEUE_LEN,
            alerts: Alerts::NONE,
            clkout_divider: 0,
        }
    }
}

//==================================================================================TIMING
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Bit rate presets supported by the vendor driver.
pub enum BitRate {
    B25K,
    B50K,
    B100K,
    B125K,
    B250K,
    B500K,
    B800K,
    B1M,
}

impl BitRate {
    /// Nominal bit rate in bit/s.
    pub const fn bits_per_second(self) -> u32 {
        match self {
            BitRate::B25K => 25_000,
            BitRate::B50K => 50_000,
            BitRate::B100K => 100_000,
            BitRate::B125K => 125_000,
            BitRate::B250K => 250_000,
            BitRate::B500K => 500_000,
            BitRate::B800K => 800_000,
            BitRate::B1M => 1_000_000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Timing configuration. Bit segment computation is left to the driver.
pub struct TimingConfig {
    pub bit_rate: BitRate,
}

impl TimingConfig {
    pub const fn new(bit_rate: BitRate) -> Self {
        Self { bit_rate }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::new(BitRate::B1M)
    }
}

//==================================================================================FILTER
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Hardware acceptance filter, passed through to the driver untouched.
pub struct FilterConfig {
    pub acceptance_code: u32,
    /// Bits set to 1 are "don't care".
    pub acceptance_mask: u32,
    pub single_filter: bool,
}

impl FilterConfig {
    /// Accept every frame.
    pub const ACCEPT_ALL: FilterConfig = FilterConfig {
        acceptance_code: 0,
        acceptance_mask: 0xFFFF_FFFF,
        single_filter: true,
    };
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::ACCEPT_ALL
    }
}

//==================================================================================TWAI_CONFIG
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Complete driver configuration.
pub struct TwaiConfig {
    pub general: GeneralConfig,
    pub timing: TimingConfig,
    pub filter: FilterConfig,
}

impl Default for TwaiConfig {
    /// Listen-only, 1 Mbit/s, accept-all, default pins.
    fn default() -> Self {
        Self::listen_only(DEFAULT_TX_GPIO, DEFAULT_RX_GPIO)
    }
}

impl TwaiConfig {
    /// Listen-only at 1 Mbit/s with an accept-all filter.
    pub const fn listen_only(tx_io: u8, rx_io: u8) -> Self {
        Self {
            general: GeneralConfig::listen_only(tx_io, rx_io),
            timing: TimingConfig::new(BitRate::B1M),
            filter: FilterConfig::ACCEPT_ALL,
        }
    }

    /// Start a builder from the listen-only defaults.
    pub const fn builder() -> TwaiConfigBuilder {
        TwaiConfigBuilder::new()
    }

    /// Check the constraints the driver would otherwise reject at install time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let general = &self.general;
        if general.mode == TwaiMode::ListenOnly && general.tx_queue_len != 0 {
            return Err(ConfigError::TxQueueInListenOnly {
                len: general.tx_queue_len,
            });
        }
        if general.rx_queue_len == 0 {
            return Err(ConfigError::EmptyRxQueue);
        }
        if general.tx_io == general.rx_io {
            return Err(ConfigError::PinConflict { pin: general.tx_io });
        }
        Ok(())
    }
}

//==================================================================================BUILDER
/// Fluent builder for [`TwaiConfig`]. Starts from [`TwaiConfig::default`].
#[derive(Clone, Copy, Debug)]
pub struct TwaiConfigBuilder {
    config: TwaiConfig,
}

impl Default for TwaiConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TwaiConfigBuilder {
    pub const fn new() -> Self {
        Self {
            config: TwaiConfig::listen_only(DEFAULT_TX_GPIO, DEFAULT_RX_GPIO),
        }
    }

    pub const fn mode(mut self, mode: TwaiMode) -> Self {
        self.config.general.mode = mode;
        self
    }

    /// Route TX and RX.
    pub const fn pins(mut self, tx_io: u8, rx_io: u8) -> Self {
        self.config.general.tx_io = tx_io;
        self.config.general.rx_io = rx_io;
        self
    }

    pub const fn clkout(mut self, pin: u8, divider: u32) -> Self {
        self.config.general.clkout_io = Some(pin);
        self.config.general.clkout_divider = divider;
        self
    }

    pub const fn bus_off_indicator(mut self, pin: u8) -> Self {
        self.config.general.bus_off_io = Some(pin);
        self
    }

    pub const fn tx_queue_len(mut self, len: u32) -> Self {
        self.config.general.tx_queue_len = len;
        self
    }

    pub const fn rx_queue_len(mut self, len: u32) -> Self {
        self.config.general.rx_queue_len = len;
        self
    }

    pub const fn alerts(mut self, alerts: Alerts) -> Self {
        self.config.general.alerts = alerts;
        self
    }

    pub const fn bit_rate(mut self, bit_rate: BitRate) -> Self {
        self.config.timing.bit_rate = bit_rate;
        self
    }

    pub const fn filter(mut self, filter: FilterConfig) -> Self {
        self.config.filter = filter;
        self
    }

    /// Finalize. Validation happens at install time, see [`TwaiConfig::validate`].
    pub const fn build(self) -> TwaiConfig {
        self.config
    }
}

#[cfg(test)]
mod tests;
