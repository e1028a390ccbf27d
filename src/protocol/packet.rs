//! Fixed 12-byte packet codec.
//!
//! Wire format:
//! ```text
//! ┌────────┬─────────┬────────┬──────────────────────────┬──────┐
//! │ len-1  │ address │ opcode │ filler / reserved (8 B)  │ 0x00 │
//! │ [0]=11 │ [1]     │ [2]    │ [3..=10]                 │ [11] │
//! └────────┴─────────┴────────┴──────────────────────────┴──────┘
//! ```
//!
//! The opcode byte is direction-dependent: a [`Command`] on a query, a
//! [`LevelStatus`] on a reply. No checksum is computed here; integrity is
//! the radio link layer's job.

use crate::error::DecodeError;

/// Total frame size on the wire.
pub const PACKET_LEN: usize = 12;

/// Value of byte 0: payload + address length as declared to the link layer.
pub const LENGTH_BYTE: u8 = (PACKET_LEN - 1) as u8;

/// Address of every data packet exchanged by the node pair.
pub const DATA_ADDRESS: u8 = 0x01;

/// Reserved acknowledgment address. Never produced by this firmware.
pub const ACK_ADDRESS: u8 = 0xFF;

/// Query opcode asking the Sense node to sample its switch.
pub const OPERATE_SENSOR: u8 = 1;

/// Reserved payload bytes. Not interpreted, but must round-trip byte-exact
/// for compatibility with deployed nodes.
pub const FILLER: [u8; 8] = [0x30, 0x31, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39];

/// Byte 11.
pub const TERMINATOR: u8 = 0x00;

const OPCODE_INDEX: usize = 2;
const PAYLOAD_RANGE: core::ops::Range<usize> = 3..11;

// ---------------------------------------------------------------------------
// Typed views over the opcode byte
// ---------------------------------------------------------------------------

/// Opcode byte as read on a query (Control → Sense).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    OperateSensor,
    Other(u8),
}

impl From<u8> for Command {
    fn from(raw: u8) -> Self {
        match raw {
            OPERATE_SENSOR => Self::OperateSensor,
            other => Self::Other(other),
        }
    }
}

/// Opcode byte as read on a reply (Sense → Control).
///
/// Any non-zero byte is treated as valid when decoding; encoding always
/// writes exactly 1 or 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    Valid,
    Invalid,
}

impl LevelStatus {
    pub const fn from_flag(raw: u8) -> Self {
        if raw != 0 { Self::Valid } else { Self::Invalid }
    }

    pub const fn flag(self) -> u8 {
        match self {
            Self::Valid => 1,
            Self::Invalid => 0,
        }
    }

    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

// ---------------------------------------------------------------------------
// Packet
// ---------------------------------------------------------------------------

/// Typed view over one 12-byte frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub length: u8,
    pub address: u8,
    pub opcode: u8,
    pub payload: [u8; 8],
    pub terminator: u8,
}

impl Packet {
    /// Build a data packet. Length, address and terminator are fixed.
    pub const fn encode(opcode: u8, payload: [u8; 8]) -> Self {
        Self {
            length: LENGTH_BYTE,
            address: DATA_ADDRESS,
            opcode,
            payload,
            terminator: TERMINATOR,
        }
    }

    /// The level query sent by the Control node.
    pub const fn query() -> Self {
        Self::encode(OPERATE_SENSOR, FILLER)
    }

    /// The reply sent by the Sense node.
    pub const fn reply(status: LevelStatus) -> Self {
        Self::encode(status.flag(), FILLER)
    }

    /// Parse a raw frame. Only the length is checked.
    pub fn decode(frame: &[u8]) -> Result<Self, DecodeError> {
        let bytes: &[u8; PACKET_LEN] = frame
            .try_into()
            .map_err(|_| DecodeError::WrongLength { got: frame.len() })?;

        let mut payload = [0u8; 8];
        payload.copy_from_slice(&bytes[PAYLOAD_RANGE]);

        Ok(Self {
            length: bytes[0],
            address: bytes[1],
            opcode: bytes[OPCODE_INDEX],
            payload,
            terminator: bytes[PACKET_LEN - 1],
        })
    }

    /// Serialise to the wire layout.
    pub fn to_bytes(&self) -> [u8; PACKET_LEN] {
        let mut out = [0u8; PACKET_LEN];
        out[0] = self.length;
        out[1] = self.address;
        out[OPCODE_INDEX] = self.opcode;
        out[PAYLOAD_RANGE].copy_from_slice(&self.payload);
        out[PACKET_LEN - 1] = self.terminator;
        out
    }

    pub fn command(&self) -> Command {
        Command::from(self.opcode)
    }

    pub fn level(&self) -> LevelStatus {
        LevelStatus::from_flag(self.opcode)
    }

    pub fn is_data(&self) -> bool {
        self.address == DATA_ADDRESS
    }

    pub fn is_ack(&self) -> bool {
        self.address == ACK_ADDRESS
    }
}
