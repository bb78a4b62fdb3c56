//! Client prediction, server reconciliation, and ability replication for
//! character movement.
//!
//! The predicting client and the authoritative server run the same
//! deterministic movement simulation. The client logs each predicted move
//! ([`move_log`]), the server acknowledges ticks with authoritative state,
//! and [`reconciliation`] rewinds and replays when they disagree. Ability
//! directions travel over the unreliable message set in [`replication`].

pub mod authority;
pub mod move_log;
pub mod reconciliation;
pub mod replication;

pub use authority::{AuthoritativeArena, Character, ReplicationError, TickSchedule};
pub use move_log::{MoveLog, MoveRecord, PredictedEntry, client_prediction_step};
pub use reconciliation::{AuthoritativeSnapshot, ReconciliationResult, reconcile};
pub use replication::{apply_inbound, encode_updates, move_update, snapshot_message};
