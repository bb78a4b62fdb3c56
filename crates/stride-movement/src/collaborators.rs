//! Collaborator interfaces injected into the movement component.
//!
//! The component never talks to an engine singleton; whoever constructs it
//! supplies a collision scene, an input source, and (optionally) a speed
//! modifier capability. This keeps the per-tick state machine a pure
//! function of its inputs, which re-simulation during reconciliation
//! depends on.

use glam::Vec3;

/// Result of a single collision probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Whether the probe struck blocking geometry.
    pub blocking: bool,
    /// World-space impact point (zero if no hit).
    pub point: Vec3,
    /// Surface normal at the impact (unit length, zero if no hit).
    pub normal: Vec3,
}

impl ProbeHit {
    /// A probe that found nothing.
    pub fn miss() -> Self {
        Self {
            blocking: false,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
        }
    }
}

/// Result of a collision-respecting displacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// The translation actually applied after collision resolution.
    pub applied: Vec3,
    /// Whether the character ended the move standing on ground.
    pub grounded: bool,
}

/// Collision queries and safe displacement for one character.
///
/// Implementations are scoped to a single character: probes originate at
/// that character's position and ignore its own collider, and `safe_move`
/// displaces that character without passing through solid geometry.
pub trait CollisionScene {
    /// Casts from the character along `direction` for the character's
    /// lateral radius plus `max_distance`. Read-only; a non-blocking result
    /// means "no wall there".
    fn probe(&self, direction: Vec3, max_distance: f32) -> ProbeHit;

    /// Moves the character by `delta`, sliding along or stopping at solid
    /// geometry, and reports the translation actually applied.
    fn safe_move(&mut self, delta: Vec3) -> MoveOutcome;

    /// Forces the character to `position`, bypassing collision. Used when
    /// rewinding to an authoritative state before replay.
    fn warp(&mut self, position: Vec3);

    /// The character's capsule radius in the ground plane.
    fn lateral_radius(&self) -> f32;
}

/// Per-tick query for the ascend/jump action on a locally controlled
/// character.
pub trait JumpInput {
    /// Whether the jump action is currently held down.
    fn is_jump_held(&self) -> bool;
}

/// Optional capability: entities that modify the baseline max walk speed
/// (aiming down sights, sprinting). Resolved once per tick.
pub trait SpeedModifierSource {
    /// Combined multiplier applied to the baseline max walk speed.
    fn speed_multiplier(&self) -> f32;
}
