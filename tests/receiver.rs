//! Receiver task driven against the in-memory TWAI driver.
mod helpers;

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use embassy_time::Duration;
use helpers::{MockError, MockTimer, MockTwaiDriver};
use korri_listen::protocol::listen_only::{
    handoff::Handoff,
    receiver::{EndReason, FnSink, FrameRecord, NullSink, Receiver, ReceiverConfig},
};
use korri_listen::protocol::transport::{
    can_id::{FrameKind, ID_MASTER_PING, ID_MASTER_STOP_CMD, ID_SLAVE_DATA},
    traits::can_driver::CanDriver,
};
use static_cell::StaticCell;
use tokio::time::{timeout, Instant};

fn config(budget: Option<usize>, delay_ms: u64) -> ReceiverConfig {
    ReceiverConfig {
        receive_delay: Duration::from_millis(delay_ms),
        frame_budget: budget,
    }
}

fn started_pair() -> (MockTwaiDriver, helpers::HostBus) {
    let (mut driver, host) = MockTwaiDriver::create_pair();
    driver.install(&Default::default()).unwrap();
    driver.start().unwrap();
    (driver, host)
}

#[tokio::test]
/// Nothing is read from the bus before the start hand-off.
async fn test_waits_for_start_handoff() {
    let (mut driver, host) = started_pair();
    host.send_standard(ID_MASTER_PING, &[0x01]);

    let handoff = Handoff::new();
    let receiver = Receiver::new(config(Some(1), 0));
    let mut timer = MockTimer;

    let blocked = timeout(
        std::time::Duration::from_millis(50),
        receiver.run(&mut driver, &mut timer, &handoff, &mut NullSink),
    )
    .await;
    assert!(blocked.is_err(), "receiver ran without the start hand-off");

    handoff.give_start();
    let summary = receiver
        .run(&mut driver, &mut timer, &handoff, &mut NullSink)
        .await;
    assert_eq!(summary.frames, 1);
    assert_eq!(summary.end, EndReason::BudgetReached);
}

#[tokio::test]
/// Each frame is turned into an id / big-endian value / Base64 record.
async fn test_records_frames_until_budget() {
    let (mut driver, host) = started_pair();
    host.send_standard(ID_MASTER_PING, &[]);
    host.send_standard(ID_SLAVE_DATA, b"Hello");
    host.send_standard(ID_MASTER_STOP_CMD, &[0x4D, 0x61, 0x6E]);
    host.send_standard(ID_SLAVE_DATA, &[0xFF]);

    let handoff = Handoff::new();
    handoff.give_start();
    let receiver = Receiver::new(config(Some(3), 0));

    let mut records: Vec<FrameRecord> = Vec::new();
    let mut sink = FnSink(|record: &FrameRecord| records.push(*record));
    let summary = receiver
        .run(&mut driver, &mut MockTimer, &handoff, &mut sink)
        .await;

    assert_eq!(summary.frames, 3);
    assert_eq!(summary.end, EndReason::BudgetReached);
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].id, 0x0A2);
    assert_eq!(records[0].kind, FrameKind::MasterPing);
    assert_eq!(records[0].text, "");

    assert_eq!(records[1].kind, FrameKind::SlaveData);
    assert_eq!(records[1].dlc, 5);
    assert_eq!(records[1].value, 0x48_65_6C_6C_6F);
    assert_eq!(records[1].text, "SGVsbG8=");

    assert_eq!(records[2].text, "TWFu");
    assert_eq!(
        records[2].to_string(),
        format!("Id: 160, Msg: {}, Base64: TWFu", 0x4D616E_u64)
    );

    assert_eq!(summary.by_kind.get(FrameKind::SlaveData), 1);
    assert_eq!(summary.by_kind.total(), 3);

    // Completion is handed back before returning.
    timeout(std::time::Duration::from_millis(10), handoff.take_done())
        .await
        .expect("done hand-off missing");
}

#[tokio::test]
/// A stop request interrupts a receiver idling on an empty bus.
async fn test_stop_request_ends_idle_receiver() {
    let (mut driver, _host) = started_pair();
    let handoff = Handoff::new();
    handoff.give_start();
    let receiver = Receiver::new(config(None, 0));

    let mut timer = MockTimer;
    let mut sink = NullSink;
    let (summary, ()) = tokio::join!(
        receiver.run(&mut driver, &mut timer, &handoff, &mut sink),
        async {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            handoff.request_stop();
        }
    );

    assert_eq!(summary.frames, 0);
    assert_eq!(summary.end, EndReason::StopRequested);
}

#[tokio::test]
/// A stop requested while pacing is honoured before the next receive.
async fn test_stop_during_receive_delay() {
    let (mut driver, host) = started_pair();
    for _ in 0..4 {
        host.send_standard(ID_SLAVE_DATA, &[0x00]);
    }
    let handoff = Handoff::new();
    handoff.give_start();
    let receiver = Receiver::new(config(None, 40));

    let mut timer = MockTimer;
    let mut sink = NullSink;
    let (summary, ()) = tokio::join!(
        receiver.run(&mut driver, &mut timer, &handoff, &mut sink),
        async {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            handoff.request_stop();
        }
    );

    assert_eq!(summary.frames, 1);
    assert_eq!(summary.end, EndReason::StopRequested);
}

#[tokio::test]
/// Frames queued before the host hangs up are still delivered, then the bus
/// error ends the run.
async fn test_bus_error_ends_run() {
    let (mut driver, mut host) = started_pair();
    host.send_standard(ID_MASTER_PING, &[0x01, 0x02]);
    host.close();

    let handoff = Handoff::new();
    handoff.give_start();
    let summary = Receiver::new(config(None, 0))
        .run(&mut driver, &mut MockTimer, &handoff, &mut NullSink)
        .await;

    assert_eq!(summary.frames, 1);
    assert_eq!(summary.end, EndReason::Bus(MockError::Closed));
}

#[tokio::test]
/// The receiver pauses after each frame.
async fn test_receive_delay_paces_frames() {
    let (mut driver, host) = started_pair();
    host.send_standard(ID_SLAVE_DATA, &[0x01]);
    host.send_standard(ID_SLAVE_DATA, &[0x02]);

    let handoff = Handoff::new();
    handoff.give_start();
    let receiver = Receiver::new(config(Some(2), 30));

    let started = Instant::now();
    let summary = receiver
        .run(&mut driver, &mut MockTimer, &handoff, &mut NullSink)
        .await;

    assert_eq!(summary.frames, 2);
    assert!(started.elapsed() >= std::time::Duration::from_millis(60));
}

#[tokio::test]
/// Records forwarded through a channel; overflow is dropped, not awaited.
async fn test_channel_sink_drops_on_overflow() {
    static RECORDS: StaticCell<Channel<CriticalSectionRawMutex, FrameRecord, 2>> = StaticCell::new();
    let records = RECORDS.init(Channel::new());

    let (mut driver, host) = started_pair();
    host.send_standard(ID_MASTER_PING, &[0x01]);
    host.send_standard(ID_SLAVE_DATA, &[0x02]);
    host.send_standard(ID_SLAVE_DATA, &[0x03]);

    let handoff = Handoff::new();
    handoff.give_start();
    let mut sender = records.sender();
    let summary = Receiver::new(config(Some(3), 0))
        .run(&mut driver, &mut MockTimer, &handoff, &mut sender)
        .await;

    assert_eq!(summary.frames, 3);
    let first = records.try_receive().unwrap();
    let second = records.try_receive().unwrap();
    assert_eq!(first.kind, FrameKind::MasterPing);
    assert_eq!(second.value, 0x02);
    assert!(records.try_receive().is_err());
}

#[tokio::test]
/// The receiver refuses to read from a stopped controller.
async fn test_stopped_driver_reports_error() {
    let (mut driver, _host) = MockTwaiDriver::create_pair();
    let handoff = Handoff::new();
    handoff.give_start();
    let summary = Receiver::new(config(None, 0))
        .run(&mut driver, &mut MockTimer, &handoff, &mut NullSink)
        .await;
    assert_eq!(summary.end, EndReason::Bus(MockError::NotStarted));
}

#[tokio::test]
/// The record's DLC never exceeds the payload it carries.
async fn test_record_dlc_clamped_to_payload() {
    let (mut driver, host) = started_pair();
    let mut frame = korri_listen::protocol::transport::can_frame::CanFrame::standard(
        ID_SLAVE_DATA,
        &[0x01; 8],
    )
    .unwrap();
    frame.len = 15;
    host.send(frame);

    let handoff = Handoff::new();
    handoff.give_start();
    let mut records: Vec<FrameRecord> = Vec::new();
    let mut sink = FnSink(|record: &FrameRecord| records.push(*record));
    Receiver::new(config(Some(1), 0))
        .run(&mut driver, &mut MockTimer, &handoff, &mut sink)
        .await;

    assert_eq!(records[0].dlc, 8);
    assert_eq!(records[0].text, "AQEBAQEBAQE=");
}
