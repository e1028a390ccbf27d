//! Fuzz target: both receive handlers
//!
//! Splits the input into frames and feeds them to a Control and a Sense
//! link. Once the slots are drained every frame sits in exactly one
//! counter, and the slots never hold more than one packet.
//!
//! cargo fuzz run fuzz_link_rx

#![no_main]

use levelguard::radio::link::RxOutcome;
use levelguard::radio::{ControlLink, SenseLink};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let control = ControlLink::new();
    let sense = SenseLink::new();
    let mut frames = 0u32;

    // First byte of each chunk is its length.
    let mut rest = data;
    while let Some((&len, tail)) = rest.split_first() {
        let n = (len as usize % 16).min(tail.len());
        let (frame, next) = tail.split_at(n);
        frames += 1;
        let _ = control.on_packet_received(frame);
        // Alternate the Sense main loop between serving and being busy.
        if sense.on_packet_received(frame) == RxOutcome::Queued {
            if frames % 2 == 0 {
                assert!(sense.take_request().is_some());
            } else {
                assert!(sense.drop_overlapping());
            }
        }
        rest = next;
    }

    let _ = control.take_reply();
    assert!(control.take_reply().is_none());

    let c = control.stats();
    assert_eq!(c.accepted + c.dropped(), frames);
    let s = sense.stats();
    assert_eq!(s.accepted + s.dropped(), frames);
});
