//! Server reconciliation: corrects client prediction when the server's
//! authoritative state diverges from the locally predicted state.
//!
//! When an authoritative update arrives for a tick, the client compares it
//! against the predicted state it logged for the same tick. If they differ
//! (or the tick was merged away), the client rewinds to the server state
//! and replays all unacknowledged move records through the same simulation
//! step that produced the original prediction.

use glam::Vec3;
use tracing::debug;

use stride_movement::flags;
use stride_movement::{CollisionScene, MovementComponent, MovementMode};

use crate::move_log::MoveLog;

/// Positions closer than this (meters) count as a confirmed prediction.
pub const POSITION_EPSILON: f32 = 1e-3;

// ---------------------------------------------------------------------------
// AuthoritativeSnapshot
// ---------------------------------------------------------------------------

/// Server-authoritative post-move state for one acknowledged tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuthoritativeSnapshot {
    /// The client tick this snapshot acknowledges.
    pub tick: u64,
    /// Authoritative position.
    pub position: Vec3,
    /// Authoritative velocity.
    pub velocity: Vec3,
    /// Ability flag byte after the server simulated the move.
    pub flags: u8,
    /// Movement mode after the server simulated the move.
    pub mode: MovementMode,
}

impl From<&stride_net::AuthoritativeState> for AuthoritativeSnapshot {
    fn from(msg: &stride_net::AuthoritativeState) -> Self {
        Self {
            tick: msg.tick,
            position: Vec3::new(msg.pos_x, msg.pos_y, msg.pos_z),
            velocity: Vec3::new(msg.vel_x, msg.vel_y, msg.vel_z),
            flags: msg.flags,
            mode: MovementMode::from_bits(msg.mode),
        }
    }
}

/// Returns `true` if a predicted position agrees with the authoritative one
/// within [`POSITION_EPSILON`].
pub fn positions_match(predicted: Vec3, authoritative: Vec3) -> bool {
    (predicted - authoritative).length_squared() <= POSITION_EPSILON * POSITION_EPSILON
}

// ---------------------------------------------------------------------------
// reconcile
// ---------------------------------------------------------------------------

/// Result of a reconciliation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconciliationResult {
    /// Whether a rewind-and-replay correction was applied.
    pub corrected: bool,
    /// The component's position after reconciliation.
    pub position: Vec3,
    /// The component's velocity after reconciliation.
    pub velocity: Vec3,
}

/// Reconciles a predicting client against an authoritative snapshot.
///
/// 1. Finds the predicted entry for the snapshot's tick in the log.
/// 2. If the predicted position matches, discards confirmed entries — done.
/// 3. Otherwise rewinds the component (and its collision body) to the
///    server state and replays every unacknowledged record through
///    [`MovementComponent::simulate`], refreshing each entry's predicted
///    outcome along the way.
///
/// Replay purity: `simulate` reads only the component, the scene, and `dt`,
/// so replaying produces exactly what a first-time prediction would have.
pub fn reconcile(
    component: &mut MovementComponent,
    scene: &mut dyn CollisionScene,
    log: &mut MoveLog,
    snapshot: &AuthoritativeSnapshot,
    dt: f32,
) -> ReconciliationResult {
    let confirmed = log
        .entry_at(snapshot.tick)
        .is_some_and(|e| positions_match(e.position, snapshot.position));

    log.acknowledge(snapshot.tick);

    if confirmed {
        return ReconciliationResult {
            corrected: false,
            position: component.position,
            velocity: component.velocity,
        };
    }

    debug!(
        tick = snapshot.tick,
        predicted = ?component.position,
        authoritative = ?snapshot.position,
        replaying = log.len(),
        "prediction correction"
    );

    component.rewind_to(snapshot.position, snapshot.velocity, snapshot.mode, scene);
    flags::apply(&mut component.ability, snapshot.flags);

    for entry in log.entries_mut() {
        entry.record.apply(component);
        component.simulate(scene, dt);
        entry.position = component.position;
        entry.velocity = component.velocity;
    }

    ReconciliationResult {
        corrected: true,
        position: component.position,
        velocity: component.velocity,
    }
}
