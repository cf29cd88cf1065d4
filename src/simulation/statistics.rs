//! Statistics aggregation from episode records.
//!
//! Turns the raw `EpisodeRecord` data of a Monte Carlo run into a
//! JSON-serializable summary: success rate against the closed-form baseline
//! (when one exists for the configured dimensions), distribution summaries,
//! and a histogram of how far episodes got before failing.

use serde::Serialize;

use crate::constants::theoretical_success_probability;
use crate::simulation::engine::{EpisodeRecord, SimConfig};
use crate::strategy::Strategy;

/// Width of the prisoners-passed histogram bins.
const HISTOGRAM_BIN_WIDTH: u32 = 10;

// ── Top-level statistics ────────────────────────────────────────────

#[derive(Serialize)]
pub struct RunStatistics {
    pub num_episodes: u64,
    pub seed: u64,
    pub strategy: String,
    pub box_count: u32,
    pub attempt_limit: u32,
    pub successes: u64,
    pub success_rate: f64,
    /// Closed-form success probability for the follower strategy at these
    /// dimensions; absent for the random strategy or short attempt budgets.
    pub expected_rate: Option<f64>,
    pub prisoners_passed: DistributionSummary,
    pub boxes_opened: DistributionSummary,
    /// Episodes binned by how many prisoners passed before the episode
    /// ended. Successful episodes land in the final bin.
    pub prisoners_passed_histogram: Vec<HistogramBin>,
}

#[derive(Serialize)]
pub struct DistributionSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub min: u64,
    pub max: u64,
}

#[derive(Serialize)]
pub struct HistogramBin {
    pub lower: u32,
    /// Exclusive upper bound.
    pub upper: u32,
    pub count: u64,
}

// ── Aggregation ─────────────────────────────────────────────────────

fn summarize_values(values: &[u64]) -> DistributionSummary {
    let n = values.len() as f64;
    let sum: f64 = values.iter().map(|&v| v as f64).sum();
    let mean = sum / n;
    let variance: f64 = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    DistributionSummary {
        mean,
        std_dev: variance.sqrt(),
        min: values.iter().copied().min().unwrap_or(0),
        max: values.iter().copied().max().unwrap_or(0),
    }
}

/// Aggregate statistics from a slice of episode records.
pub fn aggregate_statistics(
    records: &[EpisodeRecord],
    config: &SimConfig,
    strategy: Strategy,
    seed: u64,
) -> RunStatistics {
    let num_episodes = records.len() as u64;
    let successes = records.iter().filter(|r| r.success).count() as u64;

    let passed: Vec<u64> = records.iter().map(|r| r.prisoners_passed as u64).collect();
    let opened: Vec<u64> = records.iter().map(|r| r.boxes_opened).collect();

    // Bins of width 10 over 0..=box_count; the final bin holds the episodes
    // where every prisoner passed.
    let num_bins = (config.box_count / HISTOGRAM_BIN_WIDTH + 1) as usize;
    let mut counts = vec![0u64; num_bins];
    for &p in &passed {
        let bin = (p as u32 / HISTOGRAM_BIN_WIDTH) as usize;
        counts[bin.min(num_bins - 1)] += 1;
    }
    let histogram: Vec<HistogramBin> = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: i as u32 * HISTOGRAM_BIN_WIDTH,
            upper: (i as u32 + 1) * HISTOGRAM_BIN_WIDTH,
            count,
        })
        .collect();

    let expected_rate = match strategy {
        Strategy::Follower => {
            theoretical_success_probability(config.box_count, config.attempt_limit)
        }
        Strategy::Random => None,
    };

    RunStatistics {
        num_episodes,
        seed,
        strategy: strategy.name().to_string(),
        box_count: config.box_count,
        attempt_limit: config.attempt_limit,
        successes,
        success_rate: successes as f64 / num_episodes as f64,
        expected_rate,
        prisoners_passed: summarize_values(&passed),
        boxes_opened: summarize_values(&opened),
        prisoners_passed_histogram: histogram,
    }
}

/// Write statistics as pretty-printed JSON, creating parent directories.
pub fn save_statistics(stats: &RunStatistics, path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let json = serde_json::to_string_pretty(stats).expect("Failed to serialize statistics");
    std::fs::write(path, json).expect("Failed to write statistics file");
}
