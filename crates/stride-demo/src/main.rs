//! Lockstep demo of client prediction and server reconciliation.
//!
//! Runs a predicting client and an authoritative server side by side in one
//! process, each with its own physics arena built from identical geometry.
//! A scripted player teleports into a wall, jumps, wall-runs, jumps off,
//! and teleports again — with the second teleport's direction message
//! deliberately dropped to show the server using a stale direction and the
//! client reconciling back onto the authoritative path.
//!
//! Configuration is loaded from `config.ron` when `--config <dir>` is given
//! and can be overridden via CLI flags.

use clap::Parser;
use glam::Vec3;
use tracing::{info, warn};

use stride_config::{CliArgs, Config};
use stride_movement::{CollisionScene, JumpInput, MovementComponent, MovementMode, NetRole};
use stride_multiplayer::{
    AuthoritativeArena, AuthoritativeSnapshot, Character, MoveLog, TickSchedule,
    apply_inbound, client_prediction_step, encode_updates, move_update, reconcile,
};
use stride_net::{Message, deserialize_message, serialize_message};
use stride_physics::{ArenaPhysics, CharacterBody, CharacterScene, spawn_character};

/// The single demo player.
const PLAYER_ID: u64 = 1;

/// Total simulated ticks (~8 s at 60 Hz).
const TOTAL_TICKS: u64 = 480;

/// Simulated render-frame duration fed to the tick schedule. Deliberately
/// not a multiple of the tick duration so frames yield 0, 1, or 2 ticks.
const FRAME_DT_SECS: f64 = 1.0 / 48.0;

/// Scripted jump-hold window: jump off the ground, wall-run, then release
/// to launch off the wall.
const JUMP_HELD_TICKS: std::ops::Range<u64> = 120..150;

/// Tick of the first teleport (into the wall).
const FIRST_TELEPORT_TICK: u64 = 60;

/// Tick of the second teleport, whose direction message is dropped.
const DROPPED_TELEPORT_TICK: u64 = 240;

struct ScriptedJump(bool);

impl JumpInput for ScriptedJump {
    fn is_jump_held(&self) -> bool {
        self.0
    }
}

/// Builds one arena instance: a flat floor and a tall wall whose west face
/// sits at x = 4.5. Client and server each get an identical copy.
fn build_arena(gravity_y: f32) -> ArenaPhysics {
    let mut arena = ArenaPhysics::new(gravity_y);
    arena.add_static_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0));
    arena.add_static_box(Vec3::new(5.0, 5.0, 0.0), Vec3::new(0.5, 5.0, 50.0));
    arena.step();
    arena
}

struct ClientSide {
    arena: ArenaPhysics,
    body: CharacterBody,
    component: MovementComponent,
    log: MoveLog,
}

struct ServerSide {
    arena: ArenaPhysics,
    body: CharacterBody,
    players: AuthoritativeArena,
}

fn main() {
    let args = CliArgs::parse();
    let mut config = match &args.config {
        Some(dir) => Config::load_or_create(dir).unwrap_or_else(|err| {
            eprintln!("config error: {err}; using defaults");
            Config::default()
        }),
        None => Config::default(),
    };
    config.apply_cli_overrides(&args);
    stride_log::init_logging(None, Some(&config));

    let dt = 1.0 / config.network.tick_rate as f32;
    let spawn_pos = Vec3::new(0.0, 2.0, 0.0);

    let mut client = {
        let mut arena = build_arena(config.movement.gravity);
        let body = spawn_character(&mut arena, spawn_pos);
        ClientSide {
            arena,
            body,
            component: MovementComponent::new(
                config.movement.clone(),
                NetRole::AutonomousProxy,
                true,
                spawn_pos,
            ),
            log: MoveLog::new(config.network.move_log_capacity),
        }
    };

    let mut server = {
        let mut arena = build_arena(config.movement.gravity);
        let body = spawn_character(&mut arena, spawn_pos);
        let mut players = AuthoritativeArena::new();
        players.spawn_character(Character {
            player_id: PLAYER_ID,
            movement: MovementComponent::new(
                config.movement.clone(),
                NetRole::Authority,
                false,
                spawn_pos,
            ),
        });
        ServerSide {
            arena,
            body,
            players,
        }
    };

    info!(
        tick_rate = config.network.tick_rate,
        ticks = TOTAL_TICKS,
        "starting lockstep client/server demo"
    );

    let mut schedule = TickSchedule::with_tick_rate(config.network.tick_rate);
    let mut corrections = 0u32;
    let mut tick = 0u64;

    while tick < TOTAL_TICKS {
        for _ in 0..schedule.accumulate(FRAME_DT_SECS) {
            tick += 1;
            run_tick(&mut client, &mut server, &config, tick, dt, &mut corrections);
            if tick % 60 == 0 {
                info!(
                    tick,
                    position = ?client.component.position,
                    mode = ?client.component.mode(),
                    "client state"
                );
            }
        }
    }

    let server_pos = server
        .players
        .find_character(PLAYER_ID)
        .expect("demo player exists")
        .movement
        .position;
    let drift = (client.component.position - server_pos).length();
    info!(
        client = ?client.component.position,
        server = ?server_pos,
        drift,
        corrections,
        "demo finished"
    );
    if drift < 1e-3 {
        info!("client and server converged");
    } else {
        warn!(drift, "client and server did not converge");
    }
}

fn run_tick(
    client: &mut ClientSide,
    server: &mut ServerSide,
    config: &Config,
    tick: u64,
    dt: f32,
    corrections: &mut u32,
) {
    // --- Client: input, scripted abilities, impact events ---
    let jump = ScriptedJump(JUMP_HELD_TICKS.contains(&tick));
    client.component.poll_input(&jump);
    client.component.resolve_speed_modifiers(None);

    if tick == FIRST_TELEPORT_TICK {
        info!(tick, "teleporting toward the wall");
        client.component.trigger_teleport(Vec3::X);
    }
    if tick == DROPPED_TELEPORT_TICK {
        info!(tick, "teleporting away (direction message will be lost)");
        client.component.trigger_teleport(Vec3::new(0.0, 0.0, -1.0));
    }

    // Impact-event stand-in: while airborne, probe toward the wall and feed
    // any hit to the component so it can arm a wall run.
    if client.component.mode() == MovementMode::Falling {
        let scene = CharacterScene::new(&mut client.arena, &mut client.body, dt);
        let hit = scene.probe(Vec3::X, config.movement.wall_max_distance);
        if hit.blocking {
            client.component.notify_hit(&hit);
        }
    }

    // --- Client: predict ---
    {
        let mut scene = CharacterScene::new(&mut client.arena, &mut client.body, dt);
        client_prediction_step(&mut client.component, &mut scene, &mut client.log, tick, dt);
    }

    // --- Client → server: flag byte + ability messages ---
    let record_flags = client
        .log
        .entry_at(tick)
        .map(|e| e.record.flags)
        .unwrap_or_default();
    let mut outbound = vec![move_update(PLAYER_ID, tick, record_flags)];
    outbound.extend(encode_updates(
        PLAYER_ID,
        &client.component.drain_outbox(),
    ));
    if tick == DROPPED_TELEPORT_TICK {
        // Simulated packet loss on the unreliable channel.
        outbound.retain(|m| !matches!(m, Message::TeleportDirection(_)));
    }

    let wire: Vec<Vec<u8>> = outbound
        .iter()
        .filter_map(|m| serialize_message(m).ok())
        .collect();

    // --- Server: apply inbound, simulate, snapshot ---
    for bytes in &wire {
        match deserialize_message(bytes) {
            Ok(msg) => {
                if let Err(err) = apply_inbound(&mut server.players, &msg) {
                    warn!(tick, %err, "rejected inbound message");
                }
            }
            Err(err) => warn!(tick, %err, "undecodable message"),
        }
    }

    server.players.advance_tick();
    let character = server
        .players
        .find_character_mut(PLAYER_ID)
        .expect("demo player exists");
    {
        let mut scene = CharacterScene::new(&mut server.arena, &mut server.body, dt);
        character.movement.simulate(&mut scene, dt);
    }
    let snapshot_msg =
        stride_multiplayer::snapshot_message(PLAYER_ID, tick, &character.movement);

    // --- Server → client: reconcile ---
    let Ok(bytes) = serialize_message(&snapshot_msg) else {
        return;
    };
    if let Ok(Message::AuthoritativeState(state)) = deserialize_message(&bytes) {
        let snapshot = AuthoritativeSnapshot::from(&state);
        let mut scene = CharacterScene::new(&mut client.arena, &mut client.body, dt);
        let result = reconcile(
            &mut client.component,
            &mut scene,
            &mut client.log,
            &snapshot,
            dt,
        );
        if result.corrected {
            *corrections += 1;
            info!(tick, position = ?result.position, "applied server correction");
        }
    }
}
