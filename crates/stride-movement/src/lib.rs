//! Client-predicted character movement with custom abilities.
//!
//! The [`MovementComponent`] extends a kinematic character baseline with two
//! abilities — directional teleport and wall-running — and exposes the
//! deterministic [`MovementComponent::simulate`] step that both a predicting
//! client and the authoritative server run over identical inputs. Ability
//! intents are packed into a compressed flag byte ([`flags`]) and direction
//! vectors travel as fire-and-forget [`AbilityUpdate`] events; both sides
//! must observe bit-exact movement decisions for reconciliation to converge.
//!
//! External engine services (collision queries, input polling, speed
//! modifiers) are injected as trait objects ([`collaborators`]) so the state
//! machine is testable without a live physics scene.

mod ability;
mod collaborators;
mod component;
pub mod flags;
mod teleport;
mod wall_run;

pub use ability::{AbilityState, AbilityUpdate};
pub use collaborators::{CollisionScene, JumpInput, MoveOutcome, ProbeHit, SpeedModifierSource};
pub use component::MovementComponent;

/// Movement modes of the character state machine.
///
/// `Walking` and `Falling` belong to the baseline; `WallRunning` is the
/// custom mode owned by this crate. Exactly one mode is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementMode {
    /// Grounded baseline locomotion.
    Walking,
    /// Airborne baseline locomotion (gravity applies).
    #[default]
    Falling,
    /// Running along a near-vertical wall under reduced gravity.
    WallRunning,
}

impl MovementMode {
    /// Compact wire encoding of the mode.
    pub fn to_bits(self) -> u8 {
        match self {
            MovementMode::Walking => 0,
            MovementMode::Falling => 1,
            MovementMode::WallRunning => 2,
        }
    }

    /// Decodes a wire byte. Unknown values fall back to `Falling`, the
    /// mode every component starts in.
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            0 => MovementMode::Walking,
            2 => MovementMode::WallRunning,
            _ => MovementMode::Falling,
        }
    }
}

/// Network role of a movement component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetRole {
    /// The server's canonical copy; accepts inbound ability replication.
    Authority,
    /// A predicting client's own character; simulates optimistically and
    /// forwards ability triggers to the authority.
    AutonomousProxy,
    /// Someone else's character viewed remotely; custom physics is skipped
    /// and state arrives purely via replication.
    SimulatedProxy,
}
