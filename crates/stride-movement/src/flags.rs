//! Compressed move flags: one byte of ability intents per movement update.
//!
//! Bit assignments are part of the wire contract and must stay stable for
//! the lifetime of a network session; reassigning a used bit is a
//! protocol-breaking change. Bits 0 and 1 belong to the custom abilities,
//! bits 2..7 are reserved for the baseline locomotion (bit 2 currently
//! carries its jump-held state).

use crate::ability::AbilityState;

/// Bit 0: a teleport is armed for this move.
pub const FLAG_WANTS_TELEPORT: u8 = 1 << 0;
/// Bit 1: wall-run entry is armed for this move.
pub const FLAG_WANTS_WALL_RUN: u8 = 1 << 1;
/// Bit 2 (baseline-reserved region): the jump input is held.
pub const FLAG_JUMP_HELD: u8 = 1 << 2;

/// Mask of the bits reserved for the baseline locomotion protocol.
pub const BASELINE_MASK: u8 = !(FLAG_WANTS_TELEPORT | FLAG_WANTS_WALL_RUN);

/// Packs ability intents into the compressed flag byte.
pub fn compress(state: &AbilityState) -> u8 {
    let mut flags = 0u8;
    if state.wants_teleport {
        flags |= FLAG_WANTS_TELEPORT;
    }
    if state.wants_wall_run {
        flags |= FLAG_WANTS_WALL_RUN;
    }
    if state.holding_jump {
        flags |= FLAG_JUMP_HELD;
    }
    flags
}

/// Unpacks a compressed flag byte into ability intents. The inverse of
/// [`compress`]; applied when a movement update arrives on the authority
/// and when a saved move is re-applied during replay.
pub fn apply(state: &mut AbilityState, flags: u8) {
    state.wants_teleport = flags & FLAG_WANTS_TELEPORT != 0;
    state.wants_wall_run = flags & FLAG_WANTS_WALL_RUN != 0;
    state.holding_jump = flags & FLAG_JUMP_HELD != 0;
}
