//! Client-side log of predicted moves awaiting server acknowledgment.
//!
//! Each predicted tick captures the ability state into a compact
//! [`MoveRecord`] before simulation consumes the one-shot flags, together
//! with the predicted post-move position and velocity. Reconciliation
//! replays unacknowledged records after a server correction.

use std::collections::VecDeque;

use glam::Vec3;

use stride_movement::flags;
use stride_movement::{CollisionScene, MovementComponent};

/// Default maximum number of logged moves (~2 s at 60 Hz).
pub const DEFAULT_LOG_CAPACITY: usize = 128;

// ---------------------------------------------------------------------------
// MoveRecord
// ---------------------------------------------------------------------------

/// Compact snapshot of the ability state for one predicted move.
///
/// The flag byte uses the shared compressed-flag encoding; the direction
/// vectors carry the full values the flags refer to. Applying a record
/// overwrites every captured field, so applying it twice is harmless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveRecord {
    /// Compressed ability flag byte.
    pub flags: u8,
    /// Teleport direction at capture time.
    pub teleport_direction: Vec3,
    /// Wall direction at capture time.
    pub wall_direction: Vec3,
    /// Wall-run movement direction at capture time.
    pub wall_run_movement_direction: Vec3,
    /// Resolved speed multiplier at capture time. Replays restore it; the
    /// modifier source it came from is not consulted again.
    pub speed_multiplier: f32,
}

impl MoveRecord {
    /// Captures the component's ability state. Must run *before* the tick
    /// is simulated: simulation consumes the one-shot "wants" flags.
    pub fn capture(component: &MovementComponent) -> Self {
        Self {
            flags: flags::compress(&component.ability),
            teleport_direction: component.ability.teleport_direction,
            wall_direction: component.ability.wall_direction,
            wall_run_movement_direction: component.ability.wall_run_movement_direction,
            speed_multiplier: component.speed_multiplier(),
        }
    }

    /// Writes the record back into the component's ability state, re-arming
    /// the one-shot flags for a replay.
    pub fn apply(&self, component: &mut MovementComponent) {
        flags::apply(&mut component.ability, self.flags);
        component.ability.teleport_direction = self.teleport_direction;
        component.ability.wall_direction = self.wall_direction;
        component.ability.wall_run_movement_direction = self.wall_run_movement_direction;
        component.set_speed_multiplier(self.speed_multiplier);
    }

    /// Two records may merge only when their flag bytes and speed
    /// multipliers are identical: merging must never swallow a transition
    /// the replay has to reproduce.
    pub fn can_merge_with(&self, other: &MoveRecord) -> bool {
        self.flags == other.flags && self.speed_multiplier == other.speed_multiplier
    }
}

// ---------------------------------------------------------------------------
// PredictedEntry
// ---------------------------------------------------------------------------

/// One logged move: the record that was applied, the tick it belongs to,
/// and the predicted state after simulating it.
#[derive(Debug, Clone)]
pub struct PredictedEntry {
    /// Client tick at which this move was predicted.
    pub tick: u64,
    /// The captured ability record.
    pub record: MoveRecord,
    /// Predicted position *after* simulating this move.
    pub position: Vec3,
    /// Predicted velocity *after* simulating this move.
    pub velocity: Vec3,
}

// ---------------------------------------------------------------------------
// MoveLog
// ---------------------------------------------------------------------------

/// Bounded log of [`PredictedEntry`] items, ordered by tick.
pub struct MoveLog {
    entries: VecDeque<PredictedEntry>,
    max_size: usize,
}

impl MoveLog {
    /// Creates a log with the given maximum capacity.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Pushes a predicted move. A run of moves with identical flag bytes
    /// collapses into the newest entry; otherwise the oldest entry is
    /// evicted at capacity.
    pub fn push(&mut self, entry: PredictedEntry) {
        if let Some(last) = self.entries.back_mut()
            && last.record.can_merge_with(&entry.record)
        {
            *last = entry;
            return;
        }
        if self.entries.len() >= self.max_size {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Discards all entries with tick ≤ `tick` (server has confirmed them).
    pub fn acknowledge(&mut self, tick: u64) {
        while self.entries.front().is_some_and(|e| e.tick <= tick) {
            self.entries.pop_front();
        }
    }

    /// Returns the entry predicted for exactly `tick`, if still logged.
    pub fn entry_at(&self, tick: u64) -> Option<&PredictedEntry> {
        self.entries.iter().find(|e| e.tick == tick)
    }

    /// Returns an iterator over entries with tick > `tick`.
    pub fn entries_after(&self, tick: u64) -> impl Iterator<Item = &PredictedEntry> {
        self.entries.iter().filter(move |e| e.tick > tick)
    }

    /// Mutable access to all logged entries, oldest first.
    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut PredictedEntry> {
        self.entries.iter_mut()
    }

    /// Returns the number of logged entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MoveLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Prediction step
// ---------------------------------------------------------------------------

/// Runs one tick of client-side prediction: captures the ability record,
/// simulates the move, and logs the predicted outcome.
///
/// Input polling and speed-modifier resolution are the caller's
/// responsibility; they must happen before the capture so the record sees
/// this tick's intents.
pub fn client_prediction_step(
    component: &mut MovementComponent,
    scene: &mut dyn CollisionScene,
    log: &mut MoveLog,
    tick: u64,
    dt: f32,
) {
    let record = MoveRecord::capture(component);
    component.simulate(scene, dt);
    log.push(PredictedEntry {
        tick,
        record,
        position: component.position,
        velocity: component.velocity,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_config::MovementConfig;
    use stride_movement::{MoveOutcome, NetRole, ProbeHit, SpeedModifierSource};

    struct OpenScene;

    impl CollisionScene for OpenScene {
        fn probe(&self, _direction: Vec3, _max_distance: f32) -> ProbeHit {
            ProbeHit::miss()
        }

        fn safe_move(&mut self, delta: Vec3) -> MoveOutcome {
            MoveOutcome {
                applied: delta,
                grounded: false,
            }
        }

        fn warp(&mut self, _position: Vec3) {}

        fn lateral_radius(&self) -> f32 {
            0.3
        }
    }

    fn client() -> MovementComponent {
        MovementComponent::new(
            MovementConfig::default(),
            NetRole::AutonomousProxy,
            true,
            Vec3::new(0.0, 2.0, 0.0),
        )
    }

    fn idle_entry(tick: u64) -> PredictedEntry {
        PredictedEntry {
            tick,
            record: MoveRecord {
                flags: 0,
                teleport_direction: Vec3::ZERO,
                wall_direction: Vec3::ZERO,
                wall_run_movement_direction: Vec3::ZERO,
                speed_multiplier: 1.0,
            },
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
        }
    }

    #[test]
    fn test_capture_before_simulate_preserves_wants_flags() {
        let mut c = client();
        c.trigger_teleport(Vec3::new(0.0, 0.0, 1.0));

        let record = MoveRecord::capture(&c);
        assert_ne!(record.flags & stride_movement::flags::FLAG_WANTS_TELEPORT, 0);

        let mut scene = OpenScene;
        c.simulate(&mut scene, 1.0 / 60.0);
        assert!(!c.ability.wants_teleport);

        // Applying the record re-arms the teleport for replay.
        record.apply(&mut c);
        assert!(c.ability.wants_teleport);
        assert_eq!(c.ability.teleport_direction, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_identical_flag_runs_merge() {
        let mut log = MoveLog::new(8);
        log.push(idle_entry(1));
        log.push(idle_entry(2));
        log.push(idle_entry(3));
        assert_eq!(log.len(), 1);
        assert_eq!(log.entry_at(3).unwrap().tick, 3);
    }

    #[test]
    fn test_differing_flags_never_merge() {
        let mut log = MoveLog::new(8);
        log.push(idle_entry(1));
        let mut armed = idle_entry(2);
        armed.record.flags = stride_movement::flags::FLAG_WANTS_TELEPORT;
        log.push(armed);
        assert_eq!(log.len(), 2);
    }

    struct Sprinting;

    impl SpeedModifierSource for Sprinting {
        fn speed_multiplier(&self) -> f32 {
            1.5
        }
    }

    #[test]
    fn test_record_restores_resolved_speed_multiplier() {
        let mut c = client();
        c.resolve_speed_modifiers(Some(&Sprinting));
        let record = MoveRecord::capture(&c);

        // The modifier source is gone by replay time.
        c.resolve_speed_modifiers(None);
        assert_eq!(c.speed_multiplier(), 1.0);

        record.apply(&mut c);
        assert_eq!(c.speed_multiplier(), 1.5);
    }

    #[test]
    fn test_differing_multipliers_never_merge() {
        let mut log = MoveLog::new(8);
        log.push(idle_entry(1));
        let mut sprinting = idle_entry(2);
        sprinting.record.speed_multiplier = 1.5;
        log.push(sprinting);
        assert_eq!(log.len(), 2);
        assert_eq!(log.entry_at(1).unwrap().record.speed_multiplier, 1.0);
    }

    #[test]
    fn test_acknowledge_discards_confirmed_ticks() {
        let mut log = MoveLog::new(8);
        for tick in 1..=4 {
            let mut e = idle_entry(tick);
            // Distinct flag bytes so nothing merges.
            e.record.flags = tick as u8;
            log.push(e);
        }
        log.acknowledge(2);
        assert_eq!(log.len(), 2);
        assert!(log.entry_at(2).is_none());
        assert_eq!(log.entries_after(0).count(), 2);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut log = MoveLog::new(2);
        for tick in 1..=3 {
            let mut e = idle_entry(tick);
            e.record.flags = tick as u8;
            log.push(e);
        }
        assert_eq!(log.len(), 2);
        assert!(log.entry_at(1).is_none());
        assert!(log.entry_at(3).is_some());
    }

    #[test]
    fn test_prediction_step_logs_post_move_state() {
        let mut c = client();
        let mut scene = OpenScene;
        let mut log = MoveLog::default();

        c.trigger_teleport(Vec3::new(1.0, 0.0, 0.0));
        client_prediction_step(&mut c, &mut scene, &mut log, 10, 1.0 / 60.0);

        let entry = log.entry_at(10).unwrap();
        assert_eq!(entry.position, c.position);
        assert_ne!(
            entry.record.flags & stride_movement::flags::FLAG_WANTS_TELEPORT,
            0
        );
    }
}
