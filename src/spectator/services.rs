//! Services the spectator view coordinates

use glam::Mat4;
use thiserror::Error;

/// Transport failure reported by a networking service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to send {bytes} bytes: {reason}")]
pub struct SendError {
    pub bytes: usize,
    pub reason: String,
}

/// Session discovery and connection
pub trait MatchMakingService {
    /// Attempt to join or host a session
    fn connect(&mut self);

    fn is_connected(&self) -> bool;
}

/// Notification about a remote participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    Connected(String),
    Disconnected(String),
}

/// Tracks participants in the session
pub trait PlayerService {
    /// Player events since the previous poll, in arrival order
    fn poll_events(&mut self) -> Vec<PlayerEvent>;
}

/// Payload received from a remote player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedData {
    pub player_id: String,
    pub payload: Vec<u8>,
}

/// Moves opaque payloads between participants
pub trait NetworkingService {
    fn send_data(&mut self, payload: &[u8]) -> Result<(), SendError>;

    /// Payloads received since the previous poll
    fn poll_received(&mut self) -> Vec<ReceivedData>;
}

/// Resolves a shared spatial origin between devices
pub trait SpatialCoordinateService {
    /// Feed a payload received from `player_id` into the solver
    fn sync(&mut self, player_id: &str, payload: &[u8]);

    /// Local state updates that should be broadcast to other players
    fn poll_state_updates(&mut self) -> Vec<Vec<u8>>;

    /// Transform from the local origin to the shared origin, once resolved
    fn local_origin_to_shared_origin(&self) -> Option<Mat4>;
}

/// Receives player connect/disconnect notifications
pub trait PlayerStateObserver {
    fn player_connected(&mut self, player_id: &str);

    fn player_disconnected(&mut self, player_id: &str);
}
