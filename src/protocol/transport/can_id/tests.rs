//! Unit tests for identifier classification and per-kind counters.
use super::*;
use embedded_can::{ExtendedId, StandardId};

//==================================================================================FRAME_KIND
#[test]
/// Maps each example identifier onto its role.
fn test_classify_standard_ids() {
    let expected = [
        (0x0A0, FrameKind::MasterStopCmd),
        (0x0A1, FrameKind::MasterStartCmd),
        (0x0A2, FrameKind::MasterPing),
        (0x0B0, FrameKind::SlaveStopResp),
        (0x0B1, FrameKind::SlaveData),
        (0x0B2, FrameKind::SlavePingResp),
        (0x123, FrameKind::Other),
    ];
    for (raw, kind) in expected {
        let id = Id::Standard(StandardId::new(raw).unwrap());
        assert_eq!(FrameKind::classify(id), kind, "raw id {raw:#05x}");
    }
}

#[test]
/// Extended identifiers never belong to the example protocol, even with matching low bits.
fn test_classify_extended_ids() {
    let id = Id::Extended(ExtendedId::new(0x0B1).unwrap());
    assert_eq!(FrameKind::classify(id), FrameKind::Other);
}

#[test]
fn test_raw_id_round_trip() {
    for kind in FrameKind::ALL {
        match kind.raw_id() {
            Some(raw) => assert_eq!(FrameKind::from_raw(raw), kind),
            None => assert_eq!(kind, FrameKind::Other),
        }
    }
}

#[test]
fn test_roles() {
    assert!(FrameKind::MasterPing.is_master());
    assert!(!FrameKind::MasterPing.is_slave());
    assert!(FrameKind::SlaveData.is_slave());
    assert!(!FrameKind::Other.is_master() && !FrameKind::Other.is_slave());
}

#[test]
/// `index` follows the order of `ALL`.
fn test_index_matches_all() {
    for (position, kind) in FrameKind::ALL.iter().enumerate() {
        assert_eq!(kind.index(), position);
    }
}

//==================================================================================KIND_COUNTERS
#[test]
fn test_counters() {
    let mut counters = KindCounters::new();
    counters.record(FrameKind::SlaveData);
    counters.record(FrameKind::SlaveData);
    counters.record(FrameKind::MasterPing);
    assert_eq!(counters.get(FrameKind::SlaveData), 2);
    assert_eq!(counters.get(FrameKind::MasterPing), 1);
    assert_eq!(counters.get(FrameKind::Other), 0);
    assert_eq!(counters.total(), 3);

    let mut merged = KindCounters::new();
    merged.record(FrameKind::Other);
    merged.merge(&counters);
    assert_eq!(merged.total(), 4);
    assert_eq!(merged.get(FrameKind::SlaveData), 2);
}
