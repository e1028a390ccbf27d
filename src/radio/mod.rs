//! Packet radio boundary.
//!
//! The radio driver itself is external. The core only needs two things
//! from it: a blocking fire-and-forget `send`, and a receive callback
//! that hands over one complete frame. The first is [`RadioTransport`];
//! the second is the `on_packet_received` entry point of the role's link
//! in [`link`].

pub mod link;

pub use link::{ControlLink, SenseLink};

/// Frame-oriented send side of a packet radio.
///
/// Implementations block until the frame has been handed to the radio
/// and report whether that succeeded. There is no delivery guarantee and
/// callers never retry.
pub trait RadioTransport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Transmit one complete frame.
    fn send(&mut self, frame: &[u8]) -> Result<(), Self::Error>;
}

/// Sender filter for a shared broadcast medium.
///
/// A valid reply is byte-identical to a query, so on a broadcast channel a
/// third node's query looks like "level valid" to a waiting Control node.
/// Pinning the partner's address closes that gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerFilter {
    /// Accept frames from any sender.
    Any,
    /// Accept frames only from this MAC.
    Only([u8; 6]),
}

impl PeerFilter {
    pub fn accepts(&self, src: &[u8; 6]) -> bool {
        match self {
            Self::Any => true,
            Self::Only(peer) => peer == src,
        }
    }
}

/// A transport that accepts and discards every frame.
pub struct NullRadio;

impl RadioTransport for NullRadio {
    type Error = ();

    fn send(&mut self, _frame: &[u8]) -> Result<(), ()> {
        Ok(())
    }
}
