//! Prisoner search strategies.
//!
//! A strategy is a stateless rule for picking the next box to open: blind
//! uniform search, or following the chain of revealed tickets. The kind is
//! fixed at construction and dispatched by `match` — strategies carry no
//! state of their own and operate purely on the room handed to them.

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;

use crate::error::SimError;
use crate::room::Room;

/// Strategy kind — determines how the next box index is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Uniform choice among the still-sealed boxes.
    Random,
    /// Open the box whose index equals the last revealed ticket
    /// (the prisoner's own number on the first attempt).
    Follower,
}

impl Strategy {
    /// Parse a strategy from a CLI spec string.
    ///
    /// Supported specs: `"random"`, `"follower"`.
    pub fn from_spec(spec: &str) -> Result<Self, String> {
        match spec {
            "random" => Ok(Strategy::Random),
            "follower" => Ok(Strategy::Follower),
            other => Err(format!(
                "Unknown strategy spec: '{}'. Expected: random, follower",
                other
            )),
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Random => "random",
            Strategy::Follower => "follower",
        }
    }

    /// Open one box and return the revealed ticket.
    ///
    /// `current_value` is the ticket revealed by the previous attempt, or the
    /// prisoner's own number on the first attempt. Random ignores it; Follower
    /// treats it as the next index to probe. Room errors propagate untouched.
    pub fn reveal(
        &self,
        room: &mut Room,
        current_value: u32,
        rng: &mut SmallRng,
    ) -> Result<u32, SimError> {
        match self {
            Strategy::Random => {
                let unopened = room.unopened_indices();
                let &index = unopened.choose(rng).ok_or(SimError::NoUnopenedBoxes)?;
                room.open(index)
            }
            Strategy::Follower => room.open(current_value),
        }
    }
}
