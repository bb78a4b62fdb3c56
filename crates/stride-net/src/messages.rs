//! Network message types and serialization.
//!
//! All messages are serialized with [`postcard`] and prefixed with a protocol
//! version byte. Use [`serialize_message`] and [`deserialize_message`] for
//! encoding/decoding.
//!
//! Ability messages ([`Message::TeleportDirection`] and friends) are designed
//! for an unreliable channel: each one carries the full value rather than a
//! delta, so applying the same message twice is harmless and losing one only
//! means the receiver keeps a stale value until the next send.

use serde::{Deserialize, Serialize};

/// Current wire-protocol version. Prepended to every serialized message.
pub const PROTOCOL_VERSION: u8 = 1;

// ---------------------------------------------------------------------------
// Top-level enum
// ---------------------------------------------------------------------------

/// Top-level network message. The enum discriminant is the type tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Message {
    // --- Client → server ---
    /// Compressed ability flags for one predicted move.
    MoveUpdate(MoveUpdate),
    /// Requested teleport direction (world space, unit length).
    TeleportDirection(DirectionUpdate),
    /// Character-to-wall direction captured at wall-run entry.
    WallDirection(DirectionUpdate),
    /// Movement direction along the wall captured at wall-run entry.
    WallRunMovementDirection(DirectionUpdate),
    /// Jump-hold state change.
    HoldingJump(HoldingJump),

    // --- Server → client ---
    /// Authoritative post-move state for one acknowledged tick.
    AuthoritativeState(AuthoritativeState),
}

// ---------------------------------------------------------------------------
// Payload structs
// ---------------------------------------------------------------------------

/// Compressed ability flags for one predicted move.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoveUpdate {
    /// Player identifier.
    pub player_id: u64,
    /// Client tick the move was predicted on.
    pub tick: u64,
    /// Compressed ability flag byte.
    pub flags: u8,
}

/// A replicated world-space direction, sent as three floats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DirectionUpdate {
    /// Player identifier.
    pub player_id: u64,
    /// Direction X component.
    pub x: f32,
    /// Direction Y component.
    pub y: f32,
    /// Direction Z component.
    pub z: f32,
}

/// Jump-hold state change. Sent only when the held state flips.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HoldingJump {
    /// Player identifier.
    pub player_id: u64,
    /// Whether the jump action is held.
    pub held: bool,
}

/// Authoritative post-move state for one acknowledged tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AuthoritativeState {
    /// Player identifier.
    pub player_id: u64,
    /// Client tick this state acknowledges.
    pub tick: u64,
    /// Position X.
    pub pos_x: f32,
    /// Position Y.
    pub pos_y: f32,
    /// Position Z.
    pub pos_z: f32,
    /// Velocity X.
    pub vel_x: f32,
    /// Velocity Y.
    pub vel_y: f32,
    /// Velocity Z.
    pub vel_z: f32,
    /// Ability flag byte after the server simulated the move.
    pub flags: u8,
    /// Movement mode byte after the server simulated the move. Clients
    /// rewind into this mode before replaying unacknowledged moves.
    pub mode: u8,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during message deserialization.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The payload was empty (no version byte).
    #[error("empty payload — no version byte")]
    EmptyPayload,

    /// The version byte does not match [`PROTOCOL_VERSION`].
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u8),

    /// Postcard deserialization failed.
    #[error("deserialization error: {0}")]
    Postcard(#[from] postcard::Error),
}

// ---------------------------------------------------------------------------
// Serialization helpers
// ---------------------------------------------------------------------------

/// Serialize a [`Message`] into a versioned binary payload.
///
/// Wire format: `[version: u8] [postcard-encoded Message]`
pub fn serialize_message(msg: &Message) -> Result<Vec<u8>, postcard::Error> {
    let body = postcard::to_allocvec(msg)?;
    let mut out = Vec::with_capacity(1 + body.len());
    out.push(PROTOCOL_VERSION);
    out.extend_from_slice(&body);
    Ok(out)
}

/// Deserialize a versioned binary payload into a [`Message`].
///
/// Returns an error if the version is unsupported or the payload is malformed.
pub fn deserialize_message(data: &[u8]) -> Result<Message, MessageError> {
    if data.is_empty() {
        return Err(MessageError::EmptyPayload);
    }

    let version = data[0];
    if version != PROTOCOL_VERSION {
        return Err(MessageError::UnsupportedVersion(version));
    }

    let msg = postcard::from_bytes(&data[1..])?;
    Ok(msg)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
