//! Fuzz target: `Packet::decode`
//!
//! Arbitrary bytes must never panic the decoder. Anything accepted is
//! exactly one packet long and re-encodes to the same bytes.
//!
//! cargo fuzz run fuzz_packet_decode

#![no_main]

use levelguard::protocol::{PACKET_LEN, Packet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    match Packet::decode(data) {
        Ok(packet) => {
            assert_eq!(data.len(), PACKET_LEN);
            assert_eq!(&packet.to_bytes()[..], data);
            assert_eq!(packet.level().is_valid(), data[2] != 0);
        }
        Err(_) => assert_ne!(data.len(), PACKET_LEN),
    }
});
