//! Wire protocol for movement replication.
//!
//! Defines the message set exchanged between a predicting client and the
//! authoritative server, with [`postcard`] serialization behind a protocol
//! version byte.

pub mod messages;

pub use messages::{
    AuthoritativeState, DirectionUpdate, HoldingJump, Message, MessageError, MoveUpdate,
    PROTOCOL_VERSION, deserialize_message, serialize_message,
};
