//! Kinematic character body and the per-character collision scene.

use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;
use tracing::debug;

use stride_movement::{CollisionScene, MoveOutcome, ProbeHit};

use crate::ArenaPhysics;

/// Capsule half-height of the cylindrical segment (meters).
const CAPSULE_HALF_HEIGHT: f32 = 0.6;
/// Capsule radius (meters).
const CAPSULE_RADIUS: f32 = 0.3;

/// A character's kinematic body, capsule collider, and controller.
///
/// The body is position-based kinematic: the movement layer decides the
/// displacement, Rapier resolves it against geometry.
pub struct CharacterBody {
    /// Handle to the kinematic rigid body.
    pub body_handle: RigidBodyHandle,
    /// Handle to the capsule collider attached to the body.
    pub collider_handle: ColliderHandle,
    /// Rapier's built-in character controller with tuned parameters.
    pub controller: KinematicCharacterController,
}

/// Spawns a character body at `position`.
///
/// The capsule is 1.8m tall (2×0.6 half-height + 2×0.3 radius) with 0.3m
/// radius.
pub fn spawn_character(arena: &mut ArenaPhysics, position: glam::Vec3) -> CharacterBody {
    let body = RigidBodyBuilder::kinematic_position_based()
        .translation(Vector::new(position.x, position.y, position.z))
        .build();
    let body_handle = arena.rigid_body_set.insert(body);

    let collider = ColliderBuilder::capsule_y(CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS)
        .friction(0.0)
        .build();
    let collider_handle =
        arena
            .collider_set
            .insert_with_parent(collider, body_handle, &mut arena.rigid_body_set);

    let controller = KinematicCharacterController {
        max_slope_climb_angle: std::f32::consts::FRAC_PI_4, // 45°
        min_slope_slide_angle: std::f32::consts::FRAC_PI_4,
        autostep: Some(CharacterAutostep {
            max_height: CharacterLength::Absolute(0.5),
            min_width: CharacterLength::Absolute(0.3),
            include_dynamic_bodies: false,
        }),
        snap_to_ground: Some(CharacterLength::Absolute(0.2)),
        offset: CharacterLength::Absolute(0.01),
        ..Default::default()
    };

    CharacterBody {
        body_handle,
        collider_handle,
        controller,
    }
}

/// Per-character view of an arena implementing [`CollisionScene`].
///
/// Borrowed for the duration of one simulation step: probes and moves are
/// scoped to this character's body and exclude its own collider.
pub struct CharacterScene<'a> {
    arena: &'a mut ArenaPhysics,
    body: &'a mut CharacterBody,
    dt: f32,
}

impl<'a> CharacterScene<'a> {
    pub fn new(arena: &'a mut ArenaPhysics, body: &'a mut CharacterBody, dt: f32) -> Self {
        Self { arena, body, dt }
    }

    fn translation(&self) -> Vector {
        self.arena.rigid_body_set[self.body.body_handle].translation()
    }
}

impl CollisionScene for CharacterScene<'_> {
    fn probe(&self, direction: glam::Vec3, max_distance: f32) -> ProbeHit {
        let dir = direction.normalize_or_zero();
        if dir == glam::Vec3::ZERO {
            return ProbeHit::miss();
        }

        let origin = self.translation();
        let ray = Ray::new(origin, Vector::new(dir.x, dir.y, dir.z));
        // The ray starts at the capsule center, so the probe reach includes
        // the character's own radius.
        let max_toi = CAPSULE_RADIUS + max_distance;

        let filter = QueryFilter::new().exclude_rigid_body(self.body.body_handle);
        let query_pipeline = self.arena.broad_phase.as_query_pipeline(
            self.arena.narrow_phase.query_dispatcher(),
            &self.arena.rigid_body_set,
            &self.arena.collider_set,
            filter,
        );

        match query_pipeline.cast_ray_and_get_normal(&ray, max_toi, true) {
            Some((_, intersection)) => {
                let toi = intersection.time_of_impact;
                let point = glam::Vec3::new(
                    origin.x + dir.x * toi,
                    origin.y + dir.y * toi,
                    origin.z + dir.z * toi,
                );
                let normal = glam::Vec3::new(
                    intersection.normal.x,
                    intersection.normal.y,
                    intersection.normal.z,
                );
                ProbeHit {
                    blocking: true,
                    point,
                    normal,
                }
            }
            None => ProbeHit::miss(),
        }
    }

    fn safe_move(&mut self, delta: glam::Vec3) -> MoveOutcome {
        let desired = Vector::new(delta.x, delta.y, delta.z);

        let filter = QueryFilter::new().exclude_rigid_body(self.body.body_handle);
        let query_pipeline = self.arena.broad_phase.as_query_pipeline(
            self.arena.narrow_phase.query_dispatcher(),
            &self.arena.rigid_body_set,
            &self.arena.collider_set,
            filter,
        );

        let character_shape = Capsule::new_y(CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS);
        let body_pos = self.arena.rigid_body_set[self.body.body_handle].position();

        let corrected = self.body.controller.move_shape(
            self.dt,
            &query_pipeline,
            &character_shape,
            body_pos,
            desired,
            |_| {},
        );

        let body = &mut self.arena.rigid_body_set[self.body.body_handle];
        let new_translation = body.translation() + corrected.translation;
        body.set_next_kinematic_translation(new_translation);
        // Commit the kinematic translation so subsequent probes this tick
        // see the moved body.
        self.arena.step();

        MoveOutcome {
            applied: glam::Vec3::new(
                corrected.translation.x,
                corrected.translation.y,
                corrected.translation.z,
            ),
            grounded: corrected.grounded,
        }
    }

    fn warp(&mut self, position: glam::Vec3) {
        let body = &mut self.arena.rigid_body_set[self.body.body_handle];
        let target = Vector::new(position.x, position.y, position.z);
        body.set_translation(target, true);
        body.set_next_kinematic_translation(target);
        debug!(?position, "character warped");
    }

    fn lateral_radius(&self) -> f32 {
        CAPSULE_RADIUS
    }
}
