//! Trial/episode loop and the Monte Carlo estimator.
//!
//! One *trial* gives a single prisoner their budget of box opens under the
//! chosen strategy. One *episode* runs every prisoner in ascending order
//! against a shared room, resealing boxes between prisoners and
//! short-circuiting on the first failure. The estimator repeats independent
//! episodes, each on a freshly shuffled room, and reports the success
//! fraction.
//!
//! ## Parallelism
//!
//! Episodes share no state, so [`estimate_batch`] fans them out over rayon:
//! episode `i` derives its own `SmallRng` from `seed.wrapping_add(i)` and
//! owns its room outright. [`estimate`] is the sequential reference — one
//! RNG stream drives every shuffle and choice, which some tests rely on.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::Instant;

use crate::constants::{ATTEMPT_LIMIT, BOX_COUNT};
use crate::error::SimError;
use crate::room::Room;
use crate::strategy::Strategy;

/// Problem dimensions, explicit rather than hard-coded.
///
/// `attempt_limit` is deliberately independent of `box_count` — the classic
/// puzzle happens to use half the box count, but nothing below derives one
/// from the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimConfig {
    pub box_count: u32,
    pub attempt_limit: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            box_count: BOX_COUNT,
            attempt_limit: ATTEMPT_LIMIT,
        }
    }
}

/// Outcome of a single prisoner's trial.
#[derive(Clone, Copy, Debug)]
pub struct TrialResult {
    /// Whether the prisoner revealed their own number in time.
    pub found: bool,
    /// Boxes opened before stopping (equals the attempt limit on failure).
    pub attempts: u32,
}

/// Outcome of one full episode.
#[derive(Clone, Copy, Debug)]
pub struct EpisodeRecord {
    pub success: bool,
    /// Prisoners who found their number before the episode ended.
    pub prisoners_passed: u32,
    /// Total box opens across all trials of the episode.
    pub boxes_opened: u64,
}

/// Aggregate result of a Monte Carlo run.
#[derive(Debug)]
pub struct EstimateResult {
    pub records: Vec<EpisodeRecord>,
    pub successes: usize,
    pub samples: usize,
    pub probability: f64,
    pub elapsed: std::time::Duration,
}

/// Run one prisoner's trial against the shared room.
///
/// Starts from the prisoner's own number and reveals until that number
/// appears or the attempt budget runs out. Boxes opened by earlier prisoners
/// are resealed by the episode, not here.
pub fn run_trial(
    room: &mut Room,
    strategy: Strategy,
    prisoner_number: u32,
    config: &SimConfig,
    rng: &mut SmallRng,
) -> Result<TrialResult, SimError> {
    let mut current = prisoner_number;
    for attempt in 1..=config.attempt_limit {
        let revealed = strategy.reveal(room, current, rng)?;
        if revealed == prisoner_number {
            return Ok(TrialResult {
                found: true,
                attempts: attempt,
            });
        }
        current = revealed;
    }
    Ok(TrialResult {
        found: false,
        attempts: config.attempt_limit,
    })
}

/// Run every prisoner in ascending order against the shared room.
///
/// Short-circuits on the first failed trial; later prisoners never run.
/// Boxes are resealed after each successful trial, so a successful episode
/// leaves the room fully sealed.
pub fn run_episode(
    room: &mut Room,
    strategy: Strategy,
    config: &SimConfig,
    rng: &mut SmallRng,
) -> Result<EpisodeRecord, SimError> {
    let mut boxes_opened = 0u64;
    for prisoner in 1..=config.box_count {
        let trial = run_trial(room, strategy, prisoner, config, rng)?;
        boxes_opened += trial.attempts as u64;
        if !trial.found {
            return Ok(EpisodeRecord {
                success: false,
                prisoners_passed: prisoner - 1,
                boxes_opened,
            });
        }
        room.close_all();
    }
    Ok(EpisodeRecord {
        success: true,
        prisoners_passed: config.box_count,
        boxes_opened,
    })
}

/// Sequential estimator: one RNG stream drives every shuffle and choice.
pub fn estimate(
    config: &SimConfig,
    strategy: Strategy,
    num_samples: usize,
    seed: u64,
) -> Result<EstimateResult, SimError> {
    if num_samples == 0 {
        return Err(SimError::NoSamples);
    }
    let start = Instant::now();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(num_samples);
    for _ in 0..num_samples {
        let mut room = Room::shuffled(config.box_count, &mut rng);
        records.push(run_episode(&mut room, strategy, config, &mut rng)?);
    }
    Ok(summarize(records, start.elapsed()))
}

/// Parallel estimator: episode `i` derives its own RNG from `seed + i`, so
/// no pseudo-random stream is shared across workers.
pub fn estimate_batch(
    config: &SimConfig,
    strategy: Strategy,
    num_samples: usize,
    seed: u64,
) -> Result<EstimateResult, SimError> {
    if num_samples == 0 {
        return Err(SimError::NoSamples);
    }
    let start = Instant::now();
    let records: Vec<EpisodeRecord> = (0..num_samples)
        .into_par_iter()
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            let mut room = Room::shuffled(config.box_count, &mut rng);
            run_episode(&mut room, strategy, config, &mut rng)
        })
        .collect::<Result<_, _>>()?;
    Ok(summarize(records, start.elapsed()))
}

fn summarize(records: Vec<EpisodeRecord>, elapsed: std::time::Duration) -> EstimateResult {
    let samples = records.len();
    let successes = records.iter().filter(|r| r.success).count();
    EstimateResult {
        probability: successes as f64 / samples as f64,
        successes,
        samples,
        records,
        elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Layout with a single cycle through every box: box `i` holds `i + 1`,
    /// the last box holds 1. Every prisoner's cycle has length `n`.
    fn full_cycle_layout(n: u32) -> Room {
        let values: Vec<u32> = (1..=n).map(|i| if i == n { 1 } else { i + 1 }).collect();
        Room::with_layout(values).unwrap()
    }

    /// Identity layout: box `i` holds `i`. Every trial succeeds in one open.
    fn identity_layout(n: u32) -> Room {
        Room::with_layout((1..=n).collect()).unwrap()
    }

    #[test]
    fn test_trial_follows_cycle_to_own_number() {
        // Boxes [2, 3, 1, 4, 5]: prisoner 1's cycle is 1 → 2 → 3 → 1.
        let config = SimConfig {
            box_count: 5,
            attempt_limit: 3,
        };
        let mut room = Room::with_layout(vec![2, 3, 1, 4, 5]).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let trial = run_trial(&mut room, Strategy::Follower, 1, &config, &mut rng).unwrap();
        assert!(trial.found);
        assert_eq!(trial.attempts, 3);
    }

    #[test]
    fn test_trial_fails_when_cycle_exceeds_budget() {
        let config = SimConfig {
            box_count: 5,
            attempt_limit: 2,
        };
        let mut room = Room::with_layout(vec![2, 3, 1, 4, 5]).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let trial = run_trial(&mut room, Strategy::Follower, 1, &config, &mut rng).unwrap();
        assert!(!trial.found);
        assert_eq!(trial.attempts, 2);
    }

    #[test]
    fn test_follower_never_revisits_within_a_trial() {
        // Worst case: one 100-cycle. Fifty opens walk fifty distinct boxes,
        // so the already-opened guard must stay silent.
        let config = SimConfig::default();
        let mut room = full_cycle_layout(100);
        let mut rng = SmallRng::seed_from_u64(42);
        let trial = run_trial(&mut room, Strategy::Follower, 1, &config, &mut rng).unwrap();
        assert!(!trial.found);
        assert_eq!(room.count_opened(), 50);
    }

    #[test]
    fn test_follower_closes_cycle_exactly_at_own_number() {
        // With a full budget the same walk ends on the prisoner's own ticket
        // at open #100 — still no revisit.
        let config = SimConfig {
            box_count: 100,
            attempt_limit: 100,
        };
        let mut room = full_cycle_layout(100);
        let mut rng = SmallRng::seed_from_u64(42);
        let trial = run_trial(&mut room, Strategy::Follower, 1, &config, &mut rng).unwrap();
        assert!(trial.found);
        assert_eq!(trial.attempts, 100);
    }

    #[test]
    fn test_episode_short_circuits_on_first_failure() {
        let config = SimConfig::default();
        let mut room = full_cycle_layout(100);
        let mut rng = SmallRng::seed_from_u64(42);
        let record = run_episode(&mut room, Strategy::Follower, &config, &mut rng).unwrap();
        assert!(!record.success);
        assert_eq!(record.prisoners_passed, 0);
        assert_eq!(record.boxes_opened, 50);
    }

    #[test]
    fn test_episode_identity_layout_all_pass() {
        let config = SimConfig::default();
        let mut room = identity_layout(100);
        let mut rng = SmallRng::seed_from_u64(42);
        let record = run_episode(&mut room, Strategy::Follower, &config, &mut rng).unwrap();
        assert!(record.success);
        assert_eq!(record.prisoners_passed, 100);
        assert_eq!(record.boxes_opened, 100);
        // Reseal runs after every successful trial, the last included.
        assert_eq!(room.count_opened(), 0);
    }

    #[test]
    fn test_estimate_single_sample_forced_success() {
        // One box, one attempt: the follower always succeeds immediately.
        let config = SimConfig {
            box_count: 1,
            attempt_limit: 1,
        };
        let result = estimate(&config, Strategy::Follower, 1, 42).unwrap();
        assert_eq!(result.probability, 1.0);
        assert_eq!(result.successes, 1);
    }

    #[test]
    fn test_estimate_single_sample_forced_failure() {
        // Zero attempt budget: every trial fails before its first open.
        let config = SimConfig {
            box_count: 100,
            attempt_limit: 0,
        };
        let result = estimate(&config, Strategy::Follower, 1, 42).unwrap();
        assert_eq!(result.probability, 0.0);
        assert_eq!(result.successes, 0);
        assert_eq!(result.records[0].boxes_opened, 0);
    }

    #[test]
    fn test_estimate_rejects_zero_samples() {
        let config = SimConfig::default();
        assert_eq!(
            estimate(&config, Strategy::Follower, 0, 42).unwrap_err(),
            SimError::NoSamples
        );
        assert_eq!(
            estimate_batch(&config, Strategy::Follower, 0, 42).unwrap_err(),
            SimError::NoSamples
        );
    }

    #[test]
    fn test_estimate_deterministic_for_seed() {
        let config = SimConfig::default();
        let a = estimate(&config, Strategy::Follower, 200, 123).unwrap();
        let b = estimate(&config, Strategy::Follower, 200, 123).unwrap();
        assert_eq!(a.successes, b.successes);
    }

    #[test]
    fn test_estimate_batch_deterministic_for_seed() {
        let config = SimConfig::default();
        let a = estimate_batch(&config, Strategy::Follower, 200, 123).unwrap();
        let b = estimate_batch(&config, Strategy::Follower, 200, 123).unwrap();
        assert_eq!(a.successes, b.successes);
        let passed_a: Vec<u32> = a.records.iter().map(|r| r.prisoners_passed).collect();
        let passed_b: Vec<u32> = b.records.iter().map(|r| r.prisoners_passed).collect();
        assert_eq!(passed_a, passed_b);
    }

    #[test]
    fn test_probability_is_success_fraction() {
        let config = SimConfig::default();
        let result = estimate_batch(&config, Strategy::Follower, 500, 42).unwrap();
        assert_eq!(result.samples, 500);
        assert_eq!(
            result.probability,
            result.successes as f64 / result.samples as f64
        );
        assert!(result.probability >= 0.0 && result.probability <= 1.0);
    }
}
