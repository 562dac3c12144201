//! Unit tests for driver configuration defaults, builder and validation.
use super::*;

#[test]
/// Defaults describe a listen-only node on GPIO 21/22 at 1 Mbit/s.
fn test_listen_only_defaults() {
    let config = TwaiConfig::default();
    assert_eq!(config.general.mode, TwaiMode::ListenOnly);
    assert_eq!(config.general.tx_io, DEFAULT_TX_GPIO);
    assert_eq!(config.general.rx_io, DEFAULT_RX_GPIO);
    assert_eq!(config.general.clkout_io, None);
    assert_eq!(config.general.bus_off_io, None);
    assert_eq!(config.general.tx_queue_len, 0);
    assert_eq!(config.general.rx_queue_len, 5);
    assert_eq!(config.general.alerts, Alerts::NONE);
    assert_eq!(config.general.clkout_divider, 0);
    assert_eq!(config.timing.bit_rate.bits_per_second(), 1_000_000);
    assert_eq!(config.filter, FilterConfig::ACCEPT_ALL);
    assert!(config.validate().is_ok());
}

#[test]
fn test_builder_overrides() {
    let config = TwaiConfig::builder()
        .pins(4, 5)
        .bit_rate(BitRate::B250K)
        .rx_queue_len(32)
        .clkout(9, 2)
        .bus_off_indicator(10)
        .alerts(Alerts::ALL)
        .build();

    assert_eq!(config.general.tx_io, 4);
    assert_eq!(config.general.rx_io, 5);
    assert_eq!(config.general.rx_queue_len, 32);
    assert_eq!(config.general.clkout_io, Some(9));
    assert_eq!(config.general.clkout_divider, 2);
    assert_eq!(config.general.bus_off_io, Some(10));
    assert_eq!(config.general.alerts.bits(), u32::MAX);
    assert_eq!(config.timing.bit_rate, BitRate::B250K);
    assert!(config.validate().is_ok());
}

#[test]
/// A listen-only node must not reserve a TX queue.
fn test_validate_tx_queue_in_listen_only() {
    let config = TwaiConfig::builder().tx_queue_len(3).build();
    assert_eq!(
        config.validate(),
        Err(ConfigError::TxQueueInListenOnly { len: 3 })
    );

    // Allowed once the node transmits.
    let normal = TwaiConfig::builder()
        .mode(TwaiMode::Normal)
        .tx_queue_len(3)
        .build();
    assert!(normal.validate().is_ok());
}

#[test]
fn test_validate_rx_queue_and_pins() {
    let no_rx = TwaiConfig::builder().rx_queue_len(0).build();
    assert_eq!(no_rx.validate(), Err(ConfigError::EmptyRxQueue));

    let shared = TwaiConfig::builder().pins(7, 7).build();
    assert_eq!(shared.validate(), Err(ConfigError::PinConflict { pin: 7 }));
}

#[test]
fn test_bit_rate_presets() {
    let rates = [
        (BitRate::B25K, 25_000),
        (BitRate::B50K, 50_000),
        (BitRate::B100K, 100_000),
        (BitRate::B125K, 125_000),
        (BitRate::B250K, 250_000),
        (BitRate::B500K, 500_000),
        (BitRate::B800K, 800_000),
        (BitRate::B1M, 1_000_000),
    ];
    for (rate, expected) in rates {
        assert_eq!(rate.bits_per_second(), expected);
    }
    assert_eq!(TimingConfig::default().bit_rate, BitRate::B1M);
}
