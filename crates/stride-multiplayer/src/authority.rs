//! Server-authoritative character state and tick scheduling.
//!
//! The server owns the canonical [`MovementComponent`] for every connected
//! character. Clients replicate ability intents in (§[`crate::replication`])
//! and receive authoritative post-move snapshots back.

use bevy_ecs::prelude::*;

use stride_movement::MovementComponent;

/// Default server tick rate in Hz.
pub const DEFAULT_TICK_RATE: u32 = 60;

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

/// A networked character: player identity plus its movement state.
#[derive(Component)]
pub struct Character {
    /// Player identifier (stable for the session).
    pub player_id: u64,
    /// The character's movement component.
    pub movement: MovementComponent,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons an inbound replication message may be rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplicationError {
    /// The target component is not the authoritative copy. Letting a
    /// non-authoritative instance accept remote mutations corrupts
    /// reconciliation, so this is rejected rather than ignored.
    #[error("player {0}: target component is not authoritative")]
    NotAuthoritative(u64),

    /// No character with that player ID exists in the arena.
    #[error("unknown player {0}")]
    UnknownPlayer(u64),

    /// The message type is not valid in this direction.
    #[error("message not applicable on the authority")]
    NotInbound,
}

// ---------------------------------------------------------------------------
// AuthoritativeArena
// ---------------------------------------------------------------------------

/// The server's canonical character set. Wraps a Bevy ECS [`World`] and
/// provides lookup by player ID.
pub struct AuthoritativeArena {
    /// The ECS world holding all authoritative characters.
    world: World,
    /// Monotonically increasing tick counter.
    tick: u64,
}

impl AuthoritativeArena {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        Self {
            world: World::new(),
            tick: 0,
        }
    }

    /// Returns the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advances the tick counter by one.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }

    /// Spawns a character entity. Returns the ECS [`Entity`] handle.
    pub fn spawn_character(&mut self, character: Character) -> Entity {
        self.world.spawn(character).id()
    }

    /// Looks up a character by player ID.
    pub fn find_character(&self, player_id: u64) -> Option<&Character> {
        // SAFETY: query requires &mut World in bevy 0.15 but we only read.
        // We cast away mutability; this is safe because we don't modify anything.
        let world_ptr = &self.world as *const World as *mut World;
        unsafe {
            let mut query = (*world_ptr).query::<&Character>();
            query.iter(&*world_ptr).find(|c| c.player_id == player_id)
        }
    }

    /// Mutably looks up a character by player ID.
    pub fn find_character_mut(&mut self, player_id: u64) -> Option<&mut Character> {
        let world_ptr = &mut self.world as *mut World;
        unsafe {
            let mut query = (*world_ptr).query::<&mut Character>();
            for c in query.iter_mut(&mut *world_ptr) {
                if c.player_id == player_id {
                    return Some(c.into_inner());
                }
            }
        }
        None
    }

    /// Returns the number of characters in the arena.
    pub fn character_count(&self) -> usize {
        let world_ptr = &self.world as *const World as *mut World;
        unsafe {
            let mut query = (*world_ptr).query::<&Character>();
            query.iter(&*world_ptr).count()
        }
    }

    /// Returns a mutable reference to the inner ECS [`World`].
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for AuthoritativeArena {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// TickSchedule
// ---------------------------------------------------------------------------

/// Fixed-rate tick scheduler for a simulation loop.
///
/// Accumulates real elapsed time and yields discrete ticks at the
/// configured rate.
pub struct TickSchedule {
    accumulator_secs: f64,
    tick_duration_secs: f64,
    total_ticks: u64,
}

impl TickSchedule {
    /// Creates a schedule at the default 60 Hz tick rate.
    pub fn new() -> Self {
        Self::with_tick_rate(DEFAULT_TICK_RATE)
    }

    /// Creates a schedule with a custom tick rate.
    pub fn with_tick_rate(hz: u32) -> Self {
        Self {
            accumulator_secs: 0.0,
            tick_duration_secs: 1.0 / hz as f64,
            total_ticks: 0,
        }
    }

    /// Duration of one tick in seconds.
    pub fn tick_duration_secs(&self) -> f64 {
        self.tick_duration_secs
    }

    /// Accumulates elapsed time and returns the number of ticks to process.
    pub fn accumulate(&mut self, dt_secs: f64) -> u32 {
        self.accumulator_secs += dt_secs;
        let mut ticks = 0u32;
        while self.accumulator_secs >= self.tick_duration_secs {
            self.accumulator_secs -= self.tick_duration_secs;
            self.total_ticks += 1;
            ticks += 1;
        }
        ticks
    }

    /// Returns the total number of ticks processed since creation.
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use stride_config::MovementConfig;
    use stride_movement::NetRole;

    fn server_character(player_id: u64) -> Character {
        Character {
            player_id,
            movement: MovementComponent::new(
                MovementConfig::default(),
                NetRole::Authority,
                false,
                Vec3::ZERO,
            ),
        }
    }

    #[test]
    fn test_spawn_and_lookup() {
        let mut arena = AuthoritativeArena::new();
        arena.spawn_character(server_character(1));
        arena.spawn_character(server_character(2));

        assert_eq!(arena.character_count(), 2);
        assert_eq!(arena.find_character(2).unwrap().player_id, 2);
        assert!(arena.find_character(3).is_none());
    }

    #[test]
    fn test_mutable_lookup_updates_state() {
        let mut arena = AuthoritativeArena::new();
        arena.spawn_character(server_character(1));

        arena.find_character_mut(1).unwrap().movement.position = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(
            arena.find_character(1).unwrap().movement.position,
            Vec3::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn test_tick_schedule_accumulates_fixed_steps() {
        let mut schedule = TickSchedule::with_tick_rate(60);
        assert_eq!(schedule.accumulate(1.0 / 120.0), 0);
        assert_eq!(schedule.accumulate(1.0 / 120.0), 1);
        assert_eq!(schedule.accumulate(0.1), 6);
        assert_eq!(schedule.total_ticks(), 7);
    }
}
