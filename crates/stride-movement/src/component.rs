//! The per-character movement component and its tick loop.

use glam::Vec3;
use stride_config::MovementConfig;
use stride_math::{horizontal, unit_or_zero};

use crate::ability::{AbilityState, AbilityUpdate};
use crate::collaborators::{CollisionScene, JumpInput, ProbeHit, SpeedModifierSource};
use crate::{MovementMode, NetRole, teleport, wall_run};

/// Character movement state machine with custom abilities.
///
/// One instance per character, owned for the character's lifetime. The
/// client's predicted copy and the server's authoritative copy run the same
/// [`simulate`](Self::simulate) step; everything that can differ between
/// them travels through ability replication.
#[derive(Debug, Clone)]
pub struct MovementComponent {
    /// World-space position of the capsule center.
    pub position: Vec3,
    /// Current velocity in m/s.
    pub velocity: Vec3,
    /// Ability state snapshotted into move records each tick.
    pub ability: AbilityState,

    pub(crate) config: MovementConfig,
    mode: MovementMode,
    role: NetRole,
    locally_controlled: bool,
    /// Speed-modifier capability result, resolved once per tick.
    speed_multiplier: f32,
    /// Outbound ability messages queued this tick (locally controlled only).
    outbox: Vec<AbilityUpdate>,
    /// Last jump-held value forwarded to the authority (change gating).
    last_sent_holding_jump: Option<bool>,
}

impl MovementComponent {
    /// Creates a component at `position` with the given tuning and role.
    pub fn new(
        config: MovementConfig,
        role: NetRole,
        locally_controlled: bool,
        position: Vec3,
    ) -> Self {
        let ability = AbilityState::new(config.default_gravity_scale);
        Self {
            position,
            velocity: Vec3::ZERO,
            ability,
            config,
            mode: MovementMode::Falling,
            role,
            locally_controlled,
            speed_multiplier: 1.0,
            outbox: Vec::new(),
            last_sent_holding_jump: None,
        }
    }

    /// The active movement mode.
    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: MovementMode) {
        self.mode = mode;
    }

    /// The component's network role.
    pub fn role(&self) -> NetRole {
        self.role
    }

    /// Whether this instance is driven by local player input.
    pub fn is_locally_controlled(&self) -> bool {
        self.locally_controlled
    }

    /// The movement tuning this component was built with.
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Baseline max walk speed after this tick's resolved modifiers.
    pub fn max_speed(&self) -> f32 {
        self.config.max_walk_speed * self.speed_multiplier
    }

    // --- Ability activation ---

    /// Arms a directional teleport along `forward`. On a predicting client
    /// this also queues the direction for replication; local execution and
    /// the send happen in the same tick.
    pub fn trigger_teleport(&mut self, forward: Vec3) {
        teleport::trigger(self, forward);
    }

    /// Impact-event hook from the collision layer: may arm a wall run if
    /// the entry conditions hold (airborne, jump held, near-vertical
    /// surface).
    pub fn notify_hit(&mut self, hit: &ProbeHit) {
        wall_run::try_begin(self, hit);
    }

    // --- Per-tick pipeline ---

    /// Polls the jump input on a locally controlled character and queues a
    /// replication update when the held state changes.
    pub fn poll_input(&mut self, input: &dyn JumpInput) {
        if !self.locally_controlled {
            return;
        }
        let held = input.is_jump_held();
        self.ability.holding_jump = held;
        if self.last_sent_holding_jump != Some(held) {
            self.last_sent_holding_jump = Some(held);
            self.queue_update(AbilityUpdate::HoldingJump(held));
        }
    }

    /// Resolves the optional speed-modifier capability for this tick.
    pub fn resolve_speed_modifiers(&mut self, modifiers: Option<&dyn SpeedModifierSource>) {
        self.speed_multiplier = modifiers.map_or(1.0, |m| m.speed_multiplier());
    }

    /// This tick's resolved speed multiplier.
    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Restores a previously resolved multiplier. Replays of logged moves
    /// use this; the modifier source that produced the value is gone by
    /// then.
    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier;
    }

    /// One deterministic simulation step: teleport first (any mode), then
    /// pending wall-run entry, then the active mode's physics.
    ///
    /// This is a pure function of (component state, scene geometry, `dt`).
    /// Reconciliation replays call it with re-applied move records, so it
    /// must not read input, queue messages, or touch any other hidden
    /// state.
    pub fn simulate(&mut self, scene: &mut dyn CollisionScene, dt: f32) {
        teleport::execute(self, scene);
        wall_run::consume_pending(self);

        match self.mode {
            MovementMode::Walking => self.phys_walking(scene, dt),
            MovementMode::Falling => self.phys_falling(scene, dt),
            MovementMode::WallRunning => wall_run::phys_wall_running(self, scene, dt),
        }
    }

    /// Convenience: poll input, resolve modifiers, simulate.
    pub fn tick(
        &mut self,
        scene: &mut dyn CollisionScene,
        input: &dyn JumpInput,
        modifiers: Option<&dyn SpeedModifierSource>,
        dt: f32,
    ) {
        self.poll_input(input);
        self.resolve_speed_modifiers(modifiers);
        self.simulate(scene, dt);
    }

    /// Drains the ability messages queued this tick.
    pub fn drain_outbox(&mut self) -> Vec<AbilityUpdate> {
        std::mem::take(&mut self.outbox)
    }

    /// Rewinds to an authoritative state before a replay.
    ///
    /// Resets every input to [`simulate`](Self::simulate): position,
    /// velocity, the movement mode, and the gravity scale the mode
    /// implies. Leaving any of them at their post-prediction values would
    /// make the replay diverge from the original prediction.
    pub fn rewind_to(
        &mut self,
        position: Vec3,
        velocity: Vec3,
        mode: MovementMode,
        scene: &mut dyn CollisionScene,
    ) {
        self.position = position;
        self.velocity = velocity;
        self.mode = mode;
        self.ability.gravity_scale = match mode {
            MovementMode::WallRunning => self.config.wall_run_gravity_scale,
            _ => self.ability.default_gravity_scale,
        };
        scene.warp(position);
    }

    pub(crate) fn queue_update(&mut self, update: AbilityUpdate) {
        if self.locally_controlled {
            self.outbox.push(update);
        }
    }

    // --- Baseline locomotion shims ---
    //
    // The full walking model lives in the baseline layer; these shims
    // integrate gravity and handle ground transitions so the custom modes
    // have something to fall back into.

    fn phys_falling(&mut self, scene: &mut dyn CollisionScene, dt: f32) {
        self.velocity.y += self.config.gravity * self.ability.gravity_scale * dt;
        let outcome = scene.safe_move(self.velocity * dt);
        self.position += outcome.applied;
        if outcome.grounded {
            self.velocity.y = 0.0;
            self.mode = MovementMode::Walking;
        }
    }

    fn phys_walking(&mut self, scene: &mut dyn CollisionScene, dt: f32) {
        let mut planar = horizontal(self.velocity);
        let max = self.max_speed();
        if planar.length() > max {
            planar = unit_or_zero(planar) * max;
        }
        self.velocity = planar;

        if self.ability.holding_jump {
            self.velocity.y = self.config.jump_impulse;
            self.mode = MovementMode::Falling;
            let outcome = scene.safe_move(self.velocity * dt);
            self.position += outcome.applied;
            return;
        }

        let outcome = scene.safe_move(self.velocity * dt);
        self.position += outcome.applied;
        if !outcome.grounded {
            self.mode = MovementMode::Falling;
        }
    }
}
