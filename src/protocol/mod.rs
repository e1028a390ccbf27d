//! Over-the-air domain protocol shared by both node roles.
//!
//! One schema, two consumers: the Control node builds queries and reads
//! replies, the Sense node does the opposite. Both go through
//! [`packet::Packet`] so the field semantics cannot drift between images.

pub mod packet;

pub use packet::{
    ACK_ADDRESS, Command, DATA_ADDRESS, FILLER, LENGTH_BYTE, LevelStatus, OPERATE_SENSOR,
    PACKET_LEN, Packet, TERMINATOR,
};
