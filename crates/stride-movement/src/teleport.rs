//! Directional teleport: instant horizontal displacement along the
//! character's facing.
//!
//! Contributes [`flags::FLAG_WANTS_TELEPORT`](crate::flags::FLAG_WANTS_TELEPORT)
//! and runs at the start of every simulated tick, before any movement-mode
//! physics, regardless of the active mode.

use glam::Vec3;
use stride_math::{horizontal, unit_or_zero};
use tracing::debug;

use crate::ability::AbilityUpdate;
use crate::collaborators::CollisionScene;
use crate::component::MovementComponent;

/// Arms a teleport in the given facing direction.
///
/// On a locally controlled component the direction is captured and queued
/// for replication in the same tick, so the authority never sees the
/// teleport fire before learning its direction.
pub(crate) fn trigger(component: &mut MovementComponent, forward: Vec3) {
    if component.is_locally_controlled() {
        component.ability.set_teleport_direction(forward);
        component.queue_update(AbilityUpdate::TeleportDirection(
            component.ability.teleport_direction,
        ));
    }
    component.ability.wants_teleport = true;
}

/// Executes a pending teleport, if any. Fire-once: the armed flag is
/// cleared before the displacement so a re-run without re-arming is a
/// no-op.
pub(crate) fn execute(component: &mut MovementComponent, scene: &mut dyn CollisionScene) {
    if !component.ability.wants_teleport {
        return;
    }
    component.ability.wants_teleport = false;

    // Horizontal component only; a degenerate direction teleports nowhere.
    let direction = unit_or_zero(horizontal(component.ability.teleport_direction));
    if direction == Vec3::ZERO {
        return;
    }

    let outcome = scene.safe_move(direction * component.config.teleport_distance);
    component.position += outcome.applied;
    debug!(
        applied = ?outcome.applied,
        "teleport executed"
    );
}
