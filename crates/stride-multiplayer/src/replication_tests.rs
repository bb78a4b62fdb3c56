use super::*;
use crate::authority::Character;
use stride_config::MovementConfig;
use stride_net::{deserialize_message, serialize_message};

fn arena_with_player(player_id: u64, role: NetRole) -> AuthoritativeArena {
    let mut arena = AuthoritativeArena::new();
    arena.spawn_character(Character {
        player_id,
        movement: MovementComponent::new(MovementConfig::default(), role, false, Vec3::ZERO),
    });
    arena
}

#[test]
fn test_encode_updates_maps_every_variant() {
    let updates = [
        AbilityUpdate::TeleportDirection(Vec3::X),
        AbilityUpdate::WallDirection(Vec3::Z),
        AbilityUpdate::WallRunMovementDirection(Vec3::new(0.0, 0.0, -1.0)),
        AbilityUpdate::HoldingJump(true),
    ];
    let messages = encode_updates(7, &updates);
    assert_eq!(messages.len(), 4);
    assert!(matches!(
        &messages[0],
        Message::TeleportDirection(DirectionUpdate { player_id: 7, x, .. }) if *x == 1.0
    ));
    assert!(matches!(
        &messages[3],
        Message::HoldingJump(HoldingJump { player_id: 7, held: true })
    ));
}

#[test]
fn test_inbound_direction_overwrites_ability_state() {
    let mut arena = arena_with_player(1, NetRole::Authority);

    let msg = Message::TeleportDirection(DirectionUpdate {
        player_id: 1,
        x: 0.0,
        y: 0.0,
        z: 2.0,
    });
    apply_inbound(&mut arena, &msg).unwrap();

    // Inbound vectors are normalized defensively.
    let ability = &arena.find_character(1).unwrap().movement.ability;
    assert_eq!(ability.teleport_direction, Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn test_inbound_is_idempotent() {
    let mut arena = arena_with_player(1, NetRole::Authority);
    let msg = Message::WallDirection(DirectionUpdate {
        player_id: 1,
        x: -1.0,
        y: 0.0,
        z: 0.0,
    });

    apply_inbound(&mut arena, &msg).unwrap();
    let first = arena.find_character(1).unwrap().movement.ability.clone();
    apply_inbound(&mut arena, &msg).unwrap();
    let second = arena.find_character(1).unwrap().movement.ability.clone();
    assert_eq!(first, second);
}

#[test]
fn test_move_update_flags_arm_abilities() {
    let mut arena = arena_with_player(1, NetRole::Authority);

    let mut client = MovementComponent::new(
        MovementConfig::default(),
        NetRole::AutonomousProxy,
        true,
        Vec3::ZERO,
    );
    client.trigger_teleport(Vec3::X);

    let msg = move_update(1, 5, flags::compress(&client.ability));
    apply_inbound(&mut arena, &msg).unwrap();

    let ability = &arena.find_character(1).unwrap().movement.ability;
    assert!(ability.wants_teleport);
    assert!(!ability.wants_wall_run);
}

#[test]
fn test_non_authoritative_target_is_rejected() {
    let mut arena = arena_with_player(1, NetRole::SimulatedProxy);
    let msg = Message::HoldingJump(HoldingJump {
        player_id: 1,
        held: true,
    });
    assert_eq!(
        apply_inbound(&mut arena, &msg),
        Err(ReplicationError::NotAuthoritative(1))
    );
}

#[test]
fn test_unknown_player_is_rejected() {
    let mut arena = arena_with_player(1, NetRole::Authority);
    let msg = Message::HoldingJump(HoldingJump {
        player_id: 99,
        held: true,
    });
    assert_eq!(
        apply_inbound(&mut arena, &msg),
        Err(ReplicationError::UnknownPlayer(99))
    );
}

#[test]
fn test_snapshot_not_accepted_inbound() {
    let mut arena = arena_with_player(1, NetRole::Authority);
    let component = arena.find_character(1).unwrap().movement.clone();
    let msg = snapshot_message(1, 3, &component);
    assert_eq!(
        apply_inbound(&mut arena, &msg),
        Err(ReplicationError::NotInbound)
    );
}

#[test]
fn test_outbound_messages_survive_the_wire() {
    let client = MovementComponent::new(
        MovementConfig::default(),
        NetRole::AutonomousProxy,
        true,
        Vec3::new(1.0, 2.0, 3.0),
    );

    for msg in [
        move_update(1, 7, flags::compress(&client.ability)),
        snapshot_message(1, 7, &client),
    ] {
        let bytes = serialize_message(&msg).unwrap();
        assert_eq!(deserialize_message(&bytes).unwrap(), msg);
    }
}
