//! Wall-running: reduced-gravity movement along near-vertical walls.
//!
//! Contributes [`flags::FLAG_WANTS_WALL_RUN`](crate::flags::FLAG_WANTS_WALL_RUN)
//! and owns the [`MovementMode::WallRunning`] physics. Entry is triggered by
//! an impact event while airborne with the jump input held; each tick the
//! wall is re-probed and the velocity re-projected onto the wall's tangent
//! plane, and releasing jump launches the character off the wall.

use stride_math::{UP, near_vertical, project_onto_plane, unit_or_zero};
use tracing::debug;

use crate::ability::AbilityUpdate;
use crate::collaborators::{CollisionScene, ProbeHit};
use crate::component::MovementComponent;
use crate::{MovementMode, NetRole};

/// Impact-event hook: arms a wall run when the character is airborne,
/// holding jump, and the struck surface is close enough to vertical
/// (`|dot(up, normal)| <` the configured limit, strictly).
pub(crate) fn try_begin(component: &mut MovementComponent, hit: &ProbeHit) {
    if !component.ability.holding_jump {
        return;
    }
    if component.mode() != MovementMode::Falling {
        return;
    }
    if !near_vertical(hit.normal, component.config.wall_normal_vertical_limit) {
        return;
    }
    begin(component, hit.point - component.position);
}

/// Arms a wall run toward `direction` (character → wall). On a locally
/// controlled component the captured directions are queued for replication
/// in the same tick.
pub(crate) fn begin(component: &mut MovementComponent, direction: glam::Vec3) {
    if component.is_locally_controlled() {
        component.ability.set_wall_direction(direction);
        let tangent = project_onto_plane(component.velocity, component.ability.wall_direction);
        component.ability.set_wall_run_movement_direction(tangent);

        component.queue_update(AbilityUpdate::WallDirection(component.ability.wall_direction));
        component.queue_update(AbilityUpdate::WallRunMovementDirection(
            component.ability.wall_run_movement_direction,
        ));
    }
    component.ability.wants_wall_run = true;
}

/// Consumes a pending wall-run arm at the start of a simulated tick.
/// Fire-once, and only from `Falling`: the custom mode is mutually
/// exclusive with the baseline modes.
pub(crate) fn consume_pending(component: &mut MovementComponent) {
    if !component.ability.wants_wall_run {
        return;
    }
    component.ability.wants_wall_run = false;
    if component.mode() != MovementMode::Falling {
        return;
    }

    component.ability.gravity_scale = component.config.wall_run_gravity_scale;
    component.velocity.y = 0.0;
    component.set_mode(MovementMode::WallRunning);
    debug!(wall_direction = ?component.ability.wall_direction, "wall run started");
}

/// Leaves the wall: restores gravity and falls.
pub(crate) fn stop(component: &mut MovementComponent) {
    component.ability.gravity_scale = component.ability.default_gravity_scale;
    component.set_mode(MovementMode::Falling);
}

/// Per-tick wall-run physics.
///
/// Simulated proxies skip this entirely; their state arrives via
/// replication.
pub(crate) fn phys_wall_running(
    component: &mut MovementComponent,
    scene: &mut dyn CollisionScene,
    dt: f32,
) {
    if component.role() == NetRole::SimulatedProxy {
        return;
    }

    // Releasing jump launches the character away from the wall.
    if !component.ability.holding_jump {
        let jump_direction = unit_or_zero(-component.ability.wall_direction + UP);
        component.velocity += jump_direction * component.config.wall_jump_force;
        stop(component);
        debug!(velocity = ?component.velocity, "wall jump");
        return;
    }

    // Re-probe the wall. If the surface bent too far since last tick
    // (a corner), the run ends; equality with the tolerance stops too.
    let hit = scene.probe(
        component.ability.wall_direction,
        component.config.wall_max_distance,
    );
    let alignment = component.ability.wall_direction.dot(hit.normal).abs();
    if hit.blocking && alignment > component.config.wall_run_corner_variance {
        component.ability.set_wall_direction(-hit.normal);
        let tangent = project_onto_plane(component.velocity, component.ability.wall_direction);
        component.velocity = unit_or_zero(tangent) * component.config.wall_run_speed;

        let outcome = scene.safe_move(component.velocity * dt);
        component.position += outcome.applied;
    } else {
        stop(component);
    }
}

#[cfg(test)]
#[path = "wall_run_tests.rs"]
mod tests;
