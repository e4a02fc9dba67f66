//! Monitoring engine: counters, the decision state machine, and the
//! periodic cycle that binds probes to switch actions.
//!
//! # Cycle Data Flow
//!
//! ```text
//! HealthProbe ──bool──▶ ServerState counters
//!                             │
//!                             ▼
//! SwitchGateway::refresh ──▶ decision step ──▶ disable / claim / enable
//! ```
//!
//! # Coordination
//!
//! Several monitor processes may manage the same switch. They coordinate
//! through the port comment field: a disable is announced with
//! [`FAIL_MARKER`]; recovery is claimed with [`PREPARING_MARKER`] and acted
//! on only when the claim is still in place two cycles later. Comment
//! writes are last-writer-wins on the switch, so the protocol is best
//! effort; the conservative outcome of a lost race is a port that stays
//! disabled until the next agreement.

pub mod coordinator;
pub mod state;

pub use coordinator::{FailoverCoordinator, FAIL_MARKER, PREPARING_MARKER};
pub use state::ServerState;
