//! Ability replication: encoding outbound intents and applying inbound
//! ones on the authority.
//!
//! Direction vectors and the jump-hold flag travel as standalone unreliable
//! messages; the one-shot "wants" flags ride inside the regular
//! [`MoveUpdate`](stride_net::MoveUpdate) flag byte. Every message carries a
//! full value, so duplicates and reordering are harmless: the receiver just
//! overwrites the corresponding ability field.

use glam::Vec3;
use tracing::trace;

use stride_movement::flags;
use stride_movement::{AbilityUpdate, MovementComponent, NetRole};
use stride_net::{AuthoritativeState, DirectionUpdate, HoldingJump, Message, MoveUpdate};

use crate::authority::{AuthoritativeArena, ReplicationError};

// ---------------------------------------------------------------------------
// Outbound (client side)
// ---------------------------------------------------------------------------

fn direction_update(player_id: u64, direction: Vec3) -> DirectionUpdate {
    DirectionUpdate {
        player_id,
        x: direction.x,
        y: direction.y,
        z: direction.z,
    }
}

/// Encodes the ability updates a component queued this tick.
pub fn encode_updates(player_id: u64, updates: &[AbilityUpdate]) -> Vec<Message> {
    updates
        .iter()
        .map(|update| match *update {
            AbilityUpdate::TeleportDirection(d) => {
                Message::TeleportDirection(direction_update(player_id, d))
            }
            AbilityUpdate::WallDirection(d) => {
                Message::WallDirection(direction_update(player_id, d))
            }
            AbilityUpdate::WallRunMovementDirection(d) => {
                Message::WallRunMovementDirection(direction_update(player_id, d))
            }
            AbilityUpdate::HoldingJump(held) => {
                Message::HoldingJump(HoldingJump { player_id, held })
            }
        })
        .collect()
}

/// Builds the per-tick move update carrying the compressed flag byte.
///
/// The flag byte comes from the move record captured *before* simulation
/// consumed the one-shot flags, not from the component's current state.
pub fn move_update(player_id: u64, tick: u64, flags: u8) -> Message {
    Message::MoveUpdate(MoveUpdate {
        player_id,
        tick,
        flags,
    })
}

// ---------------------------------------------------------------------------
// Outbound (server side)
// ---------------------------------------------------------------------------

/// Builds the authoritative post-move snapshot for one acknowledged tick.
pub fn snapshot_message(player_id: u64, tick: u64, component: &MovementComponent) -> Message {
    Message::AuthoritativeState(AuthoritativeState {
        player_id,
        tick,
        pos_x: component.position.x,
        pos_y: component.position.y,
        pos_z: component.position.z,
        vel_x: component.velocity.x,
        vel_y: component.velocity.y,
        vel_z: component.velocity.z,
        flags: flags::compress(&component.ability),
        mode: component.mode().to_bits(),
    })
}

// ---------------------------------------------------------------------------
// Inbound (server side)
// ---------------------------------------------------------------------------

/// Applies one inbound client message to the authoritative arena.
///
/// Direction vectors are accepted as-is after defensive normalization; no
/// authoritative correctness check is performed. The target component must
/// be the authoritative copy.
pub fn apply_inbound(arena: &mut AuthoritativeArena, msg: &Message) -> Result<(), ReplicationError> {
    let player_id = match msg {
        Message::MoveUpdate(m) => m.player_id,
        Message::TeleportDirection(d)
        | Message::WallDirection(d)
        | Message::WallRunMovementDirection(d) => d.player_id,
        Message::HoldingJump(h) => h.player_id,
        Message::AuthoritativeState(_) => return Err(ReplicationError::NotInbound),
    };

    let character = arena
        .find_character_mut(player_id)
        .ok_or(ReplicationError::UnknownPlayer(player_id))?;
    if character.movement.role() != NetRole::Authority {
        return Err(ReplicationError::NotAuthoritative(player_id));
    }

    let ability = &mut character.movement.ability;
    match msg {
        Message::MoveUpdate(m) => flags::apply(ability, m.flags),
        Message::TeleportDirection(d) => {
            ability.set_teleport_direction(Vec3::new(d.x, d.y, d.z));
        }
        Message::WallDirection(d) => {
            ability.set_wall_direction(Vec3::new(d.x, d.y, d.z));
        }
        Message::WallRunMovementDirection(d) => {
            ability.set_wall_run_movement_direction(Vec3::new(d.x, d.y, d.z));
        }
        Message::HoldingJump(h) => ability.holding_jump = h.held,
        Message::AuthoritativeState(_) => unreachable!(),
    }

    trace!(player_id, ?msg, "applied inbound ability message");
    Ok(())
}

#[cfg(test)]
#[path = "replication_tests.rs"]
mod tests;
