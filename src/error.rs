//! Simulation error taxonomy.
//!
//! Every variant here signals a caller logic error, not a runtime condition:
//! the simulation is deterministic given a seed and touches no unreliable
//! external resource. Errors propagate synchronously with `?` and abort the
//! whole Monte Carlo run — nothing retries, nothing is suppressed.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// A ticket value a box cannot hold: zero, or a layout that is not a
    /// permutation of `1..=box_count`.
    #[error("invalid ticket value")]
    InvalidValue,

    /// The box at `index` was already open. Enforced by `Room::open` only —
    /// the box itself stays idempotent on its flag.
    #[error("box #{index} already opened")]
    AlreadyOpened { index: u32 },

    /// `index` is outside the room's `1..=box_count` range.
    #[error("box index {index} out of range 1..={box_count}")]
    IndexOutOfRange { index: u32, box_count: u32 },

    /// The random strategy was asked to pick from a fully opened room.
    #[error("no unopened boxes remain")]
    NoUnopenedBoxes,

    /// A Monte Carlo estimate over zero episodes has no defined probability.
    #[error("monte carlo estimate requires at least one sample")]
    NoSamples,
}
