//! Identifiers used by the listen-only example network and their
//! classification.
//!
//! The network is made of a master and a slave node exchanging 11-bit
//! standard frames. The listen-only node only observes their traffic:
//!
//! ```text
//! master ── ping (0x0A2) ──────────▶ slave
//! master ◀─ ping response (0x0B2) ── slave
//! master ── start (0x0A1) ─────────▶ slave
//! master ◀─ data (0x0B1) … ───────── slave
//! master ── stop (0x0A0) ──────────▶ slave
//! master ◀─ stop response (0x0B0) ── slave
//! ```
use embedded_can::Id;

// Raw standard identifiers.
pub const ID_MASTER_STOP_CMD: u16 = 0x0A0;
pub const ID_MASTER_START_CMD: u16 = 0x0A1;
pub const ID_MASTER_PING: u16 = 0x0A2;
pub const ID_SLAVE_STOP_RESP: u16 = 0x0B0;
pub const ID_SLAVE_DATA: u16 = 0x0B1;
pub const ID_SLAVE_PING_RESP: u16 = 0x0B2;

//==================================================================================FRAME_KIND
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Role of an observed frame on the example network.
pub enum FrameKind {
    MasterStopCmd,
    MasterStartCmd,
    MasterPing,
    SlaveStopResp,
    SlaveData,
    SlavePingResp,
    /// Any identifier outside the example protocol, including every extended id.
    Other,
}

impl FrameKind {
    /// Number of variants, used to size per-kind counters.
    pub const COUNT: usize = 7;

    /// Every variant, in counter order.
    pub const ALL: [FrameKind; Self::COUNT] = [
        FrameKind::MasterStopCmd,
        FrameKind::MasterStartCmd,
        FrameKind::MasterPing,
        FrameKind::SlaveStopResp,
        FrameKind::SlaveData,
        FrameKind::SlavePingResp,
        FrameKind::Other,
    ];

    /// Classify a CAN identifier.
    pub fn classify(id: Id) -> Self {
        match id {
            Id::Standard(standard) => Self::from_raw(standard.as_raw()),
            Id::Extended(_) => FrameKind::Other,
        }
    }

    /// Classify a raw 11-bit identifier.
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            ID_MASTER_STOP_CMD => FrameKind::MasterStopCmd,
            ID_MASTER_START_CMD => FrameKind::MasterStartCmd,
            ID_MASTER_PING => FrameKind::MasterPing,
            ID_SLAVE_STOP_RESP => FrameKind::SlaveStopResp,
            ID_SLAVE_DATA => FrameKind::SlaveData,
            ID_SLAVE_PING_RESP => FrameKind::SlavePingResp,
            _ => FrameKind::Other,
        }
    }

    /// Standard identifier carried by this kind, `None` for [`FrameKind::Other`].
    pub const fn raw_id(self) -> Option<u16> {
        match self {
            FrameKind::MasterStopCmd => Some(ID_MASTER_STOP_CMD),
            FrameKind::MasterStartCmd => Some(ID_MASTER_START_CMD),
            FrameKind::MasterPing => Some(ID_MASTER_PING),
            FrameKind::SlaveStopResp => Some(ID_SLAVE_STOP_RESP),
            FrameKind::SlaveData => Some(ID_SLAVE_DATA),
            FrameKind::SlavePingResp => Some(ID_SLAVE_PING_RESP),
            FrameKind::Other => None,
        }
    }

    /// Frame sent by the master node.
    pub const fn is_master(self) -> bool {
        matches!(
            self,
            FrameKind::MasterStopCmd | FrameKind::MasterStartCmd | FrameKind::MasterPing
        )
    }

    /// Frame sent by the slave node.
    pub const fn is_slave(self) -> bool {
        matches!(
            self,
            FrameKind::SlaveStopResp | FrameKind::SlaveData | FrameKind::SlavePingResp
        )
    }

    /// Position in [`FrameKind::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

//==================================================================================KIND_COUNTERS
/// Number of frames observed per [`FrameKind`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KindCounters {
    counts: [usize; FrameKind::COUNT],
}

impl KindCounters {
    pub const fn new() -> Self {
        Self {
            counts: [0; FrameKind::COUNT],
        }
    }

    /// Count one more frame of `kind`.
    pub fn record(&mut self, kind: FrameKind) {
        self.counts[kind.index()] += 1;
    }

    /// Frames seen for `kind`.
    pub fn get(&self, kind: FrameKind) -> usize {
        self.counts[kind.index()]
    }

    /// Frames seen across every kind.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Add another set of counters into this one.
    pub fn merge(&mut self, other: &KindCounters) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += theirs;
        }
    }
}

#[cfg(test)]
mod tests;
