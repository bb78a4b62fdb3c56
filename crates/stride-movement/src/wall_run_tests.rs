use super::*;
use crate::MovementMode;
use crate::NetRole;
use crate::collaborators::{CollisionScene, MoveOutcome, ProbeHit};
use crate::component::MovementComponent;
use glam::Vec3;
use stride_config::MovementConfig;

const DT: f32 = 1.0 / 60.0;

/// Scene whose wall probe always reports the configured hit.
struct WallScene {
    hit: ProbeHit,
}

impl WallScene {
    fn with_normal(normal: Vec3) -> Self {
        Self {
            hit: ProbeHit {
                blocking: true,
                point: Vec3::new(0.5, 1.0, 0.0),
                normal,
            },
        }
    }

    fn missing() -> Self {
        Self {
            hit: ProbeHit::miss(),
        }
    }
}

impl CollisionScene for WallScene {
    fn probe(&self, _direction: Vec3, _max_distance: f32) -> ProbeHit {
        self.hit
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

fn airborne(holding_jump: bool) -> MovementComponent {
    let mut c = MovementComponent::new(
        MovementConfig::default(),
        NetRole::AutonomousProxy,
        true,
        Vec3::new(0.0, 2.0, 0.0),
    );
    c.ability.holding_jump = holding_jump;
    c.velocity = Vec3::new(0.0, -1.0, 4.0);
    c
}

/// Puts a component straight into an active wall run along +X.
fn running_on_wall() -> MovementComponent {
    let mut c = airborne(true);
    c.ability.set_wall_direction(Vec3::new(1.0, 0.0, 0.0));
    c.ability.wants_wall_run = true;
    consume_pending(&mut c);
    assert_eq!(c.mode(), MovementMode::WallRunning);
    c
}

#[test]
fn test_entry_on_vertical_wall_while_airborne() {
    let mut c = airborne(true);
    let hit = ProbeHit {
        blocking: true,
        point: Vec3::new(0.5, 2.0, 0.0),
        normal: Vec3::new(-1.0, 0.0, 0.0),
    };

    try_begin(&mut c, &hit);
    assert!(c.ability.wants_wall_run);

    consume_pending(&mut c);
    assert_eq!(c.mode(), MovementMode::WallRunning);
    assert_eq!(c.ability.gravity_scale, c.config.wall_run_gravity_scale);
    assert_eq!(c.velocity.y, 0.0);
}

#[test]
fn test_entry_rejects_normal_at_vertical_limit() {
    // |up . normal| == 0.1 exactly: the strict comparison must reject it.
    let mut c = airborne(true);
    let y = 0.1_f32;
    let x = (1.0 - y * y).sqrt();
    let hit = ProbeHit {
        blocking: true,
        point: Vec3::new(0.5, 2.0, 0.0),
        normal: Vec3::new(x, y, 0.0),
    };

    try_begin(&mut c, &hit);
    assert!(!c.ability.wants_wall_run);
}

#[test]
fn test_entry_requires_jump_held() {
    let mut c = airborne(false);
    let hit = ProbeHit {
        blocking: true,
        point: Vec3::new(0.5, 2.0, 0.0),
        normal: Vec3::new(-1.0, 0.0, 0.0),
    };

    try_begin(&mut c, &hit);
    assert!(!c.ability.wants_wall_run);
}

#[test]
fn test_entry_requires_airborne() {
    let mut c = airborne(true);
    c.set_mode(MovementMode::Walking);
    let hit = ProbeHit {
        blocking: true,
        point: Vec3::new(0.5, 2.0, 0.0),
        normal: Vec3::new(-1.0, 0.0, 0.0),
    };

    try_begin(&mut c, &hit);
    assert!(!c.ability.wants_wall_run);
}

#[test]
fn test_pending_entry_ignored_while_grounded() {
    let mut c = airborne(true);
    c.set_mode(MovementMode::Walking);
    c.ability.wants_wall_run = true;

    consume_pending(&mut c);
    assert_eq!(c.mode(), MovementMode::Walking);
    assert!(!c.ability.wants_wall_run);
}

#[test]
fn test_velocity_follows_wall_tangent_at_run_speed() {
    let mut c = running_on_wall();
    let mut scene = WallScene::with_normal(Vec3::new(-1.0, 0.0, 0.0));
    c.velocity = Vec3::new(2.0, 0.0, 3.0);

    phys_wall_running(&mut c, &mut scene, DT);

    assert_eq!(c.mode(), MovementMode::WallRunning);
    let speed = c.config.wall_run_speed;
    assert!((c.velocity.length() - speed).abs() < 1e-3);
    // Tangent to the wall: no component along the (flipped) wall direction.
    assert!(c.velocity.dot(c.ability.wall_direction).abs() < 1e-3);
}

#[test]
fn test_corner_within_variance_continues_on_new_normal() {
    let mut c = running_on_wall();
    // Slightly turned wall, still well aligned with the run direction.
    let normal = Vec3::new(-0.99, 0.0, 0.14107).normalize();
    let mut scene = WallScene::with_normal(normal);
    c.velocity = Vec3::new(0.0, 0.0, 5.0);

    phys_wall_running(&mut c, &mut scene, DT);

    assert_eq!(c.mode(), MovementMode::WallRunning);
    assert!((c.ability.wall_direction + normal).length() < 1e-4);
}

#[test]
fn test_corner_at_variance_threshold_stops() {
    let mut c = running_on_wall();
    // |wall_dir . normal| lands exactly on the variance threshold; the run
    // must end rather than continue around the corner.
    let variance = c.config.wall_run_corner_variance;
    let x = -variance;
    let z = (1.0 - variance * variance).sqrt();
    let mut scene = WallScene::with_normal(Vec3::new(x, 0.0, z));

    phys_wall_running(&mut c, &mut scene, DT);

    assert_eq!(c.mode(), MovementMode::Falling);
    assert_eq!(c.ability.gravity_scale, c.config.default_gravity_scale);
}

#[test]
fn test_losing_the_wall_stops_the_run() {
    let mut c = running_on_wall();
    let mut scene = WallScene::missing();

    phys_wall_running(&mut c, &mut scene, DT);

    assert_eq!(c.mode(), MovementMode::Falling);
}

#[test]
fn test_releasing_jump_launches_off_the_wall() {
    let mut c = running_on_wall();
    c.ability.holding_jump = false;
    c.velocity = Vec3::ZERO;
    let mut scene = WallScene::with_normal(Vec3::new(-1.0, 0.0, 0.0));

    phys_wall_running(&mut c, &mut scene, DT);

    assert_eq!(c.mode(), MovementMode::Falling);
    assert_eq!(c.ability.gravity_scale, c.config.default_gravity_scale);

    // Impulse points away from the wall and upward.
    let expected =
        (Vec3::new(-1.0, 0.0, 0.0) + Vec3::Y).normalize() * c.config.wall_jump_force;
    assert!((c.velocity - expected).length() < 1e-4);
}

#[test]
fn test_simulated_proxy_skips_wall_run_physics() {
    let mut c = MovementComponent::new(
        MovementConfig::default(),
        NetRole::SimulatedProxy,
        false,
        Vec3::new(0.0, 2.0, 0.0),
    );
    c.ability.holding_jump = true;
    c.ability.set_wall_direction(Vec3::new(1.0, 0.0, 0.0));
    c.ability.wants_wall_run = true;
    consume_pending(&mut c);

    let before = c.position;
    let mut scene = WallScene::with_normal(Vec3::new(-1.0, 0.0, 0.0));
    phys_wall_running(&mut c, &mut scene, DT);

    // Proxies take replicated state instead of local wall-run physics.
    assert_eq!(c.position, before);
    assert_eq!(c.mode(), MovementMode::WallRunning);
}
