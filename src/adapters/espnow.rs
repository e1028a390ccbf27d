//! ESP-NOW packet radio adapter.
//!
//! ESP-NOW gives connectionless, single-frame delivery between ESP32
//! nodes, which is the contract the core expects from its radio: one
//! blocking send, one receive callback per complete frame. Link-layer
//! framing and CRC are handled by the Wi-Fi MAC.
//!
//! The receive callback runs on the Wi-Fi task, so it only forwards the
//! frame into the role's `static` link.
//!
//! With the default broadcast peer every node on the channel is heard,
//! including other Control nodes whose queries read as valid replies.
//! Deployments sharing a channel should pin the partner's MAC, which also
//! filters received frames by sender (see [`PeerFilter`]).

use esp_idf_svc::espnow::{BROADCAST, EspNow, PeerInfo, ReceiveInfo};
use esp_idf_svc::sys::EspError;
use log::{info, warn};

use crate::error::RadioError;
use crate::radio::{PeerFilter, RadioTransport};

pub struct EspNowRadio {
    espnow: EspNow<'static>,
    peer: [u8; 6],
    filter: PeerFilter,
}

impl EspNowRadio {
    /// Take the ESP-NOW driver and register `peer`. `None` broadcasts and
    /// hears every sender. Wi-Fi must already be started.
    pub fn new(peer: Option<[u8; 6]>) -> Result<Self, EspError> {
        let espnow = EspNow::take()?;
        let filter = peer.map_or(PeerFilter::Any, PeerFilter::Only);
        let peer = peer.unwrap_or(BROADCAST);
        espnow.add_peer(PeerInfo {
            peer_addr: peer,
            channel: 0,
            encrypt: false,
            ..Default::default()
        })?;
        info!("ESP-NOW ready, peer {:02X?}", peer);
        Ok(Self {
            espnow,
            peer,
            filter,
        })
    }

    /// Route every frame from an accepted sender to `on_frame` (a link's
    /// `on_packet_received`).
    pub fn on_receive<F>(&self, mut on_frame: F) -> Result<(), EspError>
    where
        F: FnMut(&[u8]) + Send + 'static,
    {
        let filter = self.filter;
        self.espnow
            .register_recv_cb(move |info: &ReceiveInfo, data: &[u8]| {
                if filter.accepts(info.src_addr) {
                    on_frame(data);
                }
            })
    }
}

impl RadioTransport for EspNowRadio {
    type Error = RadioError;

    fn send(&mut self, frame: &[u8]) -> Result<(), RadioError> {
        self.espnow.send(self.peer, frame).map_err(|e| {
            warn!("ESP-NOW send: {}", e);
            RadioError::SendFailed
        })
    }
}
