//! Collision backend for character movement, built on Rapier 3D.
//!
//! [`ArenaPhysics`] owns all Rapier state for one simulation instance (one
//! per server, one per predicting client). [`CharacterScene`] is the
//! per-character view that implements the movement layer's
//! [`CollisionScene`] interface: wall probes via raycasts and safe
//! displacement via Rapier's [`KinematicCharacterController`].

use rapier3d::prelude::*;

mod character;

pub use character::{CharacterBody, CharacterScene, spawn_character};

/// Physics simulation state for one arena instance.
///
/// Both sides of a client/server pair build an identical arena from the
/// same static geometry so that predicted moves and authoritative moves
/// resolve against the same world.
pub struct ArenaPhysics {
    /// World-space gravity vector.
    pub gravity: Vector,
    /// Timestep and solver configuration.
    pub integration_parameters: IntegrationParameters,
    /// The main simulation pipeline.
    pub physics_pipeline: PhysicsPipeline,
    /// Tracks sleeping/awake body islands.
    pub island_manager: IslandManager,
    /// Broad-phase collision detection (also provides query pipeline).
    pub broad_phase: BroadPhaseBvh,
    /// Narrow-phase collision detection (contact manifolds).
    pub narrow_phase: NarrowPhase,
    /// All rigid bodies in the simulation.
    pub rigid_body_set: RigidBodySet,
    /// All colliders in the simulation.
    pub collider_set: ColliderSet,
    /// Impulse-based joints (unused by characters, required by the pipeline).
    pub impulse_joint_set: ImpulseJointSet,
    /// Multibody joints (unused by characters, required by the pipeline).
    pub multibody_joint_set: MultibodyJointSet,
    /// Continuous collision detection solver.
    pub ccd_solver: CCDSolver,
}

impl ArenaPhysics {
    /// Creates an empty arena with gravity `(0, gravity_y, 0)` and a
    /// timestep of `1/60` seconds.
    ///
    /// Gravity here only affects dynamic bodies; characters are kinematic
    /// and integrate their own gravity through the movement component.
    pub fn new(gravity_y: f32) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: 1.0 / 60.0,
            ..Default::default()
        };

        Self {
            gravity: Vector::new(0.0, gravity_y, 0.0),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Advances the simulation by one fixed timestep, committing any
    /// pending kinematic translations.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Adds a fixed cuboid (floor, wall, platform) and returns its
    /// collider handle.
    pub fn add_static_box(
        &mut self,
        center: glam::Vec3,
        half_extents: glam::Vec3,
    ) -> ColliderHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(Vector::new(center.x, center.y, center.z))
            .build();
        let body_handle = self.rigid_body_set.insert(body);
        let collider =
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build();
        self.collider_set
            .insert_with_parent(collider, body_handle, &mut self.rigid_body_set)
    }
}

impl Default for ArenaPhysics {
    fn default() -> Self {
        Self::new(-9.81)
    }
}
