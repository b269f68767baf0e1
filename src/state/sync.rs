//! Opponent sync.
//!
//! Mirrors this player's status to the peer in a two-player round. Pushes are
//! fire-and-forget: a failed send is logged and the round carries on.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Event name used on the wire for status updates.
pub const DETAILS_SET_EVENT: &str = "details:set";

/// The only datum exchanged with the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerStatus {
    pub is_gameovered: bool,
    pub stars: u32,
}

impl PeerStatus {
    pub fn playing(stars: u32) -> Self {
        Self {
            is_gameovered: false,
            stars,
        }
    }

    pub fn finished(stars: u32) -> Self {
        Self {
            is_gameovered: true,
            stars,
        }
    }
}

/// Wire envelope.
///
/// Serializes as `{"event":"details:set","payload":{"isGameovered":..,"stars":..}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum PeerMessage {
    #[serde(rename = "details:set")]
    DetailsSet(PeerStatus),
}

impl PeerMessage {
    pub fn status(&self) -> PeerStatus {
        match self {
            Self::DetailsSet(status) => *status,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl From<PeerStatus> for PeerMessage {
    fn from(status: PeerStatus) -> Self {
        Self::DetailsSet(status)
    }
}

/// Transport errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("peer channel closed")]
    Closed,
    #[error("failed to encode peer message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("transport error: {0}")]
    Other(String),
}

/// Ordered, reliable message channel to the peer session.
pub trait Transport {
    fn send(&mut self, message: &PeerMessage) -> Result<(), TransportError>;
}

/// Text channel carrying encoded envelopes.
impl Transport for tokio::sync::mpsc::UnboundedSender<String> {
    fn send(&mut self, message: &PeerMessage) -> Result<(), TransportError> {
        let line = message.to_json()?;
        tokio::sync::mpsc::UnboundedSender::send(self, line).map_err(|_| TransportError::Closed)
    }
}

/// Outbound status capability injected into the session machine.
pub trait OpponentSync {
    /// Send `status` to the peer without waiting for acknowledgment.
    fn push_status(&mut self, status: PeerStatus);

    /// Whether pushes reach a peer, i.e. the round is two-player.
    fn is_connected(&self) -> bool;
}

/// Single-player sync: every push is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSync;

impl OpponentSync for NoSync {
    fn push_status(&mut self, _status: PeerStatus) {}

    fn is_connected(&self) -> bool {
        false
    }
}

/// Two-player sync over a [`Transport`].
#[derive(Debug)]
pub struct ChannelSync<T> {
    transport: T,
    sent: u64,
    failed: u64,
}

impl<T: Transport> ChannelSync<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            sent: 0,
            failed: 0,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Pushes handed to the transport successfully.
    pub fn sent_count(&self) -> u64 {
        self.sent
    }

    pub fn failed_count(&self) -> u64 {
        self.failed
    }
}

impl<T: Transport> OpponentSync for ChannelSync<T> {
    fn push_status(&mut self, status: PeerStatus) {
        match self.transport.send(&PeerMessage::from(status)) {
            Ok(()) => {
                self.sent += 1;
                debug!(
                    stars = status.stars,
                    is_gameovered = status.is_gameovered,
                    "pushed status to opponent"
                );
            }
            Err(error) => {
                self.failed += 1;
                warn!(%error, stars = status.stars, "failed to push status to opponent");
            }
        }
    }

    fn is_connected(&self) -> bool {
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every message; fails while `fail` is set.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct RecordingTransport {
        pub sent: Rc<RefCell<Vec<PeerMessage>>>,
        pub fail: Rc<RefCell<bool>>,
    }

    impl Transport for RecordingTransport {
        fn send(&mut self, message: &PeerMessage) -> Result<(), TransportError> {
            if *self.fail.borrow() {
                return Err(TransportError::Other("link down".to_string()));
            }
            self.sent.borrow_mut().push(*message);
            Ok(())
        }
    }

    #[test]
    fn test_wire_format() {
        let message = PeerMessage::from(PeerStatus::finished(7));
        let json: serde_json::Value = serde_json::from_str(&message.to_json().unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "event": DETAILS_SET_EVENT,
                "payload": { "isGameovered": true, "stars": 7 }
            })
        );
    }

    #[test]
    fn test_decode_inbound() {
        let raw = r#"{"event":"details:set","payload":{"isGameovered":false,"stars":3}}"#;
        let message = PeerMessage::from_json(raw).unwrap();
        assert_eq!(message.status(), PeerStatus::playing(3));

        assert!(PeerMessage::from_json(r#"{"event":"chat","payload":{}}"#).is_err());
    }

    #[test]
    fn test_no_sync_is_disconnected() {
        let mut sync = NoSync;
        sync.push_status(PeerStatus::playing(1));
        assert!(!sync.is_connected());
    }

    #[test]
    fn test_channel_sync_pushes() {
        let transport = RecordingTransport::default();
        let mut sync = ChannelSync::new(transport.clone());

        sync.push_status(PeerStatus::playing(3));
        sync.push_status(PeerStatus::finished(5));

        assert!(sync.is_connected());
        assert_eq!(sync.sent_count(), 2);
        assert_eq!(sync.transport().sent.borrow().len(), 2);
        assert_eq!(
            *transport.sent.borrow(),
            vec![
                PeerMessage::DetailsSet(PeerStatus::playing(3)),
                PeerMessage::DetailsSet(PeerStatus::finished(5)),
            ]
        );
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_channel_sync_swallows_failures() {
        let transport = RecordingTransport::default();
        *transport.fail.borrow_mut() = true;
        let mut sync = ChannelSync::new(transport.clone());

        sync.push_status(PeerStatus::playing(3));

        assert_eq!(sync.sent_count(), 0);
        assert_eq!(sync.failed_count(), 1);
        assert!(transport.sent.borrow().is_empty());
        assert!(logs_contain("failed to push status to opponent"));
    }

    #[test]
    fn test_unbounded_sender_transport() {
        let (mut tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
        Transport::send(&mut tx, &PeerMessage::from(PeerStatus::playing(2))).unwrap();

        let line = rx.try_recv().unwrap();
        assert_eq!(
            PeerMessage::from_json(&line).unwrap().status(),
            PeerStatus::playing(2)
        );

        drop(rx);
        let result = Transport::send(&mut tx, &PeerMessage::from(PeerStatus::playing(2)));
        assert!(matches!(result, Err(TransportError::Closed)));
    }
}
