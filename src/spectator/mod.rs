//! Spectator view: keeps a scene root aligned to a shared spatial origin
//!
//! Each tick the coordinator:
//! - forwards player connect/disconnect notifications to observers
//! - feeds payloads received from other players to the coordinate service
//! - broadcasts local coordinate updates while connected
//! - connects through match-making if needed, then re-anchors the scene root
//!
//! Missing services leave the coordinator inert, mirroring the router.

mod services;

use std::f32::consts::FRAC_PI_2;

use glam::{Mat3, Mat4, Quat, Vec3};
use tracing::{debug, error, info};

pub use services::{
    MatchMakingService, NetworkingService, PlayerEvent, PlayerService, PlayerStateObserver,
    ReceivedData, SendError, SpatialCoordinateService,
};

/// Position and orientation of the scene root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl SceneTransform {
    /// Resting transform applied every tick before alignment
    pub fn resting() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::from_rotation_y(FRAC_PI_2),
        }
    }

    /// Position from the translation column; rotation looking along the
    /// z column with the y column as up
    pub fn from_origin_matrix(matrix: &Mat4) -> Self {
        Self {
            position: matrix.col(3).truncate(),
            rotation: look_rotation(matrix.col(2).truncate(), matrix.col(1).truncate()),
        }
    }
}

/// Rotation whose +Z faces `forward` and +Y leans toward `up`
fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let forward = forward.normalize_or_zero();
    let right = up.cross(forward).normalize_or_zero();
    if forward == Vec3::ZERO || right == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize()
}

/// Collaborators handed to [`SpectatorView::initialize`]
#[derive(Default)]
pub struct SpectatorServices {
    pub match_making: Option<Box<dyn MatchMakingService>>,
    pub players: Option<Box<dyn PlayerService>>,
    pub networking: Option<Box<dyn NetworkingService>>,
    pub spatial_coordinates: Option<Box<dyn SpatialCoordinateService>>,
    pub observers: Vec<Box<dyn PlayerStateObserver>>,
}

impl SpectatorServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match_making(mut self, service: impl MatchMakingService + 'static) -> Self {
        self.match_making = Some(Box::new(service));
        self
    }

    pub fn with_players(mut self, service: impl PlayerService + 'static) -> Self {
        self.players = Some(Box::new(service));
        self
    }

    pub fn with_networking(mut self, service: impl NetworkingService + 'static) -> Self {
        self.networking = Some(Box::new(service));
        self
    }

    pub fn with_spatial_coordinates(
        mut self,
        service: impl SpatialCoordinateService + 'static,
    ) -> Self {
        self.spatial_coordinates = Some(Box::new(service));
        self
    }

    pub fn with_observer(mut self, observer: impl PlayerStateObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }
}

/// All required services, present only when the configuration is valid
struct ResolvedServices {
    match_making: Box<dyn MatchMakingService>,
    players: Box<dyn PlayerService>,
    networking: Box<dyn NetworkingService>,
    spatial_coordinates: Box<dyn SpatialCoordinateService>,
}

/// Shared-origin synchronization coordinator
pub struct SpectatorView {
    services: Option<ResolvedServices>,
    observers: Vec<Box<dyn PlayerStateObserver>>,
    local_origin_to_shared_origin: Mat4,
    scene_root: SceneTransform,
    failed_sends: u64,
}

impl SpectatorView {
    pub fn initialize(services: SpectatorServices) -> Self {
        let SpectatorServices {
            match_making,
            players,
            networking,
            spatial_coordinates,
            observers,
        } = services;

        let services = match (match_making, players, networking, spatial_coordinates) {
            (Some(match_making), Some(players), Some(networking), Some(spatial_coordinates)) => {
                info!(observers = observers.len(), "Spectator view ready");
                Some(ResolvedServices {
                    match_making,
                    players,
                    networking,
                    spatial_coordinates,
                })
            }
            _ => {
                error!("Invalid spectator view configuration, required services are missing");
                None
            }
        };

        Self {
            services,
            observers,
            local_origin_to_shared_origin: Mat4::IDENTITY,
            scene_root: SceneTransform::resting(),
            failed_sends: 0,
        }
    }

    /// False when a required service was missing at initialization
    pub fn is_valid(&self) -> bool {
        self.services.is_some()
    }

    pub fn scene_root(&self) -> SceneTransform {
        self.scene_root
    }

    pub fn local_origin_to_shared_origin(&self) -> Mat4 {
        self.local_origin_to_shared_origin
    }

    /// Number of broadcasts the networking service rejected
    pub fn failed_sends(&self) -> u64 {
        self.failed_sends
    }

    pub fn tick(&mut self) {
        let Some(services) = self.services.as_mut() else {
            return;
        };

        for event in services.players.poll_events() {
            match event {
                PlayerEvent::Connected(player_id) => {
                    info!(%player_id, "Observed new player");
                    for observer in &mut self.observers {
                        observer.player_connected(&player_id);
                    }
                }
                PlayerEvent::Disconnected(player_id) => {
                    info!(%player_id, "Player lost");
                    for observer in &mut self.observers {
                        observer.player_disconnected(&player_id);
                    }
                }
            }
        }

        for data in services.networking.poll_received() {
            services
                .spatial_coordinates
                .sync(&data.player_id, &data.payload);
        }

        for payload in services.spatial_coordinates.poll_state_updates() {
            if !services.match_making.is_connected() {
                continue;
            }
            if let Err(err) = services.networking.send_data(&payload) {
                error!(error = %err, "Networking service failed to send data");
                self.failed_sends += 1;
            }
        }

        self.scene_root = SceneTransform::resting();

        if !services.match_making.is_connected() {
            services.match_making.connect();
            if !services.match_making.is_connected() {
                // No shared anchor logic without a session
                return;
            }
        }

        if let Some(matrix) = services.spatial_coordinates.local_origin_to_shared_origin() {
            self.local_origin_to_shared_origin = matrix;
            self.scene_root = SceneTransform::from_origin_matrix(&matrix);
            debug!(
                position = ?self.scene_root.position,
                rotation = ?self.scene_root.rotation,
                "Updated scene root transform"
            );
        }
    }
}
