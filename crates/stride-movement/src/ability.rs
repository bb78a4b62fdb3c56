//! Per-character ability state and outbound replication events.

use glam::Vec3;
use stride_math::unit_or_zero;

/// Mutable ability state owned by one character's movement component.
///
/// Direction fields are kept unit-length or zero and never NaN; all writes
/// from outside the crate go through the normalizing setters, including
/// values arriving from the network.
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityState {
    /// Teleport is armed and will fire on the next simulated tick.
    pub wants_teleport: bool,
    /// Direction of the pending teleport (unit or zero).
    pub teleport_direction: Vec3,

    /// Wall-run entry is armed and will be consumed on the next tick.
    pub wants_wall_run: bool,
    /// Direction from the character toward the wall: the outward wall
    /// normal, negated (unit or zero).
    pub wall_direction: Vec3,
    /// Velocity direction projected onto the wall plane at entry.
    pub wall_run_movement_direction: Vec3,

    /// Whether the ascend/jump input is held. On the server this is the
    /// last replicated value and is advisory only.
    pub holding_jump: bool,

    /// Current gravity scale; overridden while wall-running.
    pub gravity_scale: f32,
    /// Gravity scale restored when wall-running ends.
    pub default_gravity_scale: f32,
}

impl AbilityState {
    /// Creates a cleared state with the given resting gravity scale.
    pub fn new(default_gravity_scale: f32) -> Self {
        Self {
            wants_teleport: false,
            teleport_direction: Vec3::ZERO,
            wants_wall_run: false,
            wall_direction: Vec3::ZERO,
            wall_run_movement_direction: Vec3::ZERO,
            holding_jump: false,
            gravity_scale: default_gravity_scale,
            default_gravity_scale,
        }
    }

    /// Sets the teleport direction, normalized defensively.
    pub fn set_teleport_direction(&mut self, direction: Vec3) {
        self.teleport_direction = unit_or_zero(direction);
    }

    /// Sets the wall direction, normalized defensively.
    pub fn set_wall_direction(&mut self, direction: Vec3) {
        self.wall_direction = unit_or_zero(direction);
    }

    /// Sets the wall-run movement direction, normalized defensively.
    pub fn set_wall_run_movement_direction(&mut self, direction: Vec3) {
        self.wall_run_movement_direction = unit_or_zero(direction);
    }
}

/// An outbound ability replication event queued by a locally controlled
/// component, drained once per tick and forwarded to the authority as an
/// unreliable, idempotent message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityUpdate {
    /// The direction of a triggered teleport.
    TeleportDirection(Vec3),
    /// The captured wall direction at wall-run entry.
    WallDirection(Vec3),
    /// The captured wall-plane movement direction at wall-run entry.
    WallRunMovementDirection(Vec3),
    /// Change in the held state of the jump input.
    HoldingJump(bool),
}
