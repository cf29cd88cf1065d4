//! # Prisoners — 100 Prisoners Problem Monte Carlo Simulator
//!
//! Simulates the classic riddle: a room holds 100 numbered boxes hiding a
//! random permutation of tickets 1–100, and each of 100 prisoners may open at
//! most 50 boxes to find their own number. The prisoners all walk free only
//! if every single one succeeds. Blind random search wins with probability
//! (1/2)^100; the loop-following strategy — open your own box, then the box
//! named by each revealed ticket — wins whenever no permutation cycle is
//! longer than 50, roughly 31.18% of the time.
//!
//! | Piece | Module | Description |
//! |-------|--------|-------------|
//! | Room state | [`room`] | Ticket boxes, random permutation, open/reseal bookkeeping |
//! | Strategies | [`strategy`] | `Random` and `Follower` box-picking rules |
//! | Simulation | [`simulation`] | Trial/episode loop, Monte Carlo estimators, statistics |
//! | Calibration | [`constants`] | Problem dimensions and the closed-form success probability |
//!
//! Randomness is always injected: every shuffle and uniform choice draws from
//! a caller-seeded `SmallRng`, so a seed fully determines a run. The parallel
//! estimator gives each episode its own seed-derived stream.

pub mod constants;
pub mod env_config;
pub mod error;
pub mod room;
pub mod simulation;
pub mod strategy;
