//! In-memory representation of a classic CAN (TWAI) data frame.
use embedded_can::{ExtendedId, Frame, Id, StandardId};

use crate::core::MAX_FRAME_PAYLOAD;
use crate::infra::codec::traits::ToBase64;
use crate::protocol::transport::can_id::FrameKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Raw frame as read from the bus.
pub struct CanFrame {
    /// Standard (11-bit) or extended (29-bit) identifier.
    pub id: Id,
    /// Payload buffer. Classic CAN frames always provide eight bytes.
    pub data: [u8; MAX_FRAME_PAYLOAD],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
}

impl CanFrame {
    /// Frame with an 11-bit identifier. `None` when `raw` exceeds 11 bits or
    /// the payload exceeds eight bytes.
    pub fn standard(raw: u16, payload: &[u8]) -> Option<Self> {
        Self::new(StandardId::new(raw)?, payload)
    }

    /// Frame with a 29-bit identifier.
    pub fn extended(raw: u32, payload: &[u8]) -> Option<Self> {
        Self::new(ExtendedId::new(raw)?, payload)
    }

    /// Valid payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len.min(MAX_FRAME_PAYLOAD)]
    }

    /// Numeric identifier, whatever its width.
    pub fn raw_id(&self) -> u32 {
        match self.id {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw(),
        }
    }

    /// Payload folded big-endian into a single integer (first byte most significant).
    ///
    /// An empty payload yields `0`.
    pub fn payload_value(&self) -> u64 {
        self.payload()
            .iter()
            .fold(0u64, |acc, &byte| (acc << 8) | byte as u64)
    }

    /// Role of the frame on the example network.
    pub fn kind(&self) -> FrameKind {
        FrameKind::classify(self.id)
    }
}

impl Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > MAX_FRAME_PAYLOAD {
            return None;
        }
        let mut buffer = [0u8; MAX_FRAME_PAYLOAD];
        buffer[..data.len()].copy_from_slice(data);
        Some(Self {
            id: id.into(),
            data: buffer,
            len: data.len(),
        })
    }

    /// Remote frames are never produced by a listen-only node.
    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        self.payload().len()
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}

impl ToBase64 for CanFrame {
    fn base64_bytes(&self) -> &[u8] {
        self.payload()
    }
}
