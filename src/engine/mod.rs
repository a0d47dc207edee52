//! Pure computation engine(s) over flow graph snapshots.
//!
//! Nothing here performs I/O or keeps state between calls; every function
//! takes the full snapshot it needs and returns a fresh result.

pub mod projector;
pub mod reachability;
pub mod sequencer;

pub use projector::{collect_predecessors, project, BalanceSheet};
pub use reachability::{ids_for_ranks, mark_downstream};
pub use sequencer::{compute_sequence, position_order, Sequence, SequenceError, ROW_TOLERANCE};
