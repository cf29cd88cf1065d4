use prisoners::constants::{
    theoretical_success_probability, ATTEMPT_LIMIT, BOX_COUNT, DEFAULT_NUM_SAMPLES, DEFAULT_SEED,
};
use prisoners::simulation::{aggregate_statistics, estimate, estimate_batch, save_statistics, SimConfig};
use prisoners::strategy::Strategy;

struct Args {
    num_samples: usize,
    seed: u64,
    strategy: Strategy,
    box_count: u32,
    attempt_limit: u32,
    sequential: bool,
    output: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut num_samples = DEFAULT_NUM_SAMPLES;
    let mut seed = DEFAULT_SEED;
    let mut strategy = Strategy::Follower;
    let mut box_count = BOX_COUNT;
    let mut attempt_limit = ATTEMPT_LIMIT;
    let mut sequential = false;
    let mut output: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--samples" => {
                i += 1;
                if i < args.len() {
                    num_samples = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --samples value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    seed = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --seed value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--strategy" => {
                i += 1;
                if i < args.len() {
                    strategy = Strategy::from_spec(&args[i]).unwrap_or_else(|e| {
                        eprintln!("{}", e);
                        std::process::exit(1);
                    });
                }
            }
            "--boxes" => {
                i += 1;
                if i < args.len() {
                    box_count = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --boxes value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--attempts" => {
                i += 1;
                if i < args.len() {
                    attempt_limit = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --attempts value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--sequential" => {
                sequential = true;
            }
            "--output" => {
                i += 1;
                if i < args.len() {
                    output = Some(args[i].clone());
                }
            }
            "--help" | "-h" => {
                println!(
                    "Usage: prisoners-simulate [--samples N] [--seed S] [--strategy NAME] [--boxes N] [--attempts K] [--sequential] [--output DIR]"
                );
                println!();
                println!("Options:");
                println!(
                    "  --samples N        Number of episodes to simulate (default: {})",
                    DEFAULT_NUM_SAMPLES
                );
                println!("  --seed S           RNG seed (default: {})", DEFAULT_SEED);
                println!("  --strategy NAME    Search strategy: random, follower (default: follower)");
                println!("  --boxes N          Boxes / prisoners per episode (default: {})", BOX_COUNT);
                println!(
                    "  --attempts K       Opens allowed per prisoner (default: {})",
                    ATTEMPT_LIMIT
                );
                println!("  --sequential       Single-threaded run on one RNG stream");
                println!("  --output DIR       Write run_statistics.json to DIR");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!(
                    "Usage: prisoners-simulate [--samples N] [--seed S] [--strategy NAME] [--boxes N] [--attempts K] [--sequential] [--output DIR]"
                );
                std::process::exit(1);
            }
        }
        i += 1;
    }

    Args {
        num_samples,
        seed,
        strategy,
        box_count,
        attempt_limit,
        sequential,
        output,
    }
}

fn main() {
    let args = parse_args();
    let num_threads = prisoners::env_config::init_rayon_threads();

    let config = SimConfig {
        box_count: args.box_count,
        attempt_limit: args.attempt_limit,
    };

    println!(
        "Prisoner Simulation ({} episodes, {} boxes, {} attempts)",
        args.num_samples, config.box_count, config.attempt_limit
    );
    println!("  Strategy:    {}", args.strategy.name());
    if args.sequential {
        println!("  Mode: sequential (single RNG stream)");
    } else {
        println!("  Mode: parallel ({} threads)", num_threads);
    }

    let result = if args.sequential {
        estimate(&config, args.strategy, args.num_samples, args.seed)
    } else {
        estimate_batch(&config, args.strategy, args.num_samples, args.seed)
    };
    let result = result.unwrap_or_else(|e| {
        eprintln!("Simulation failed: {}", e);
        std::process::exit(1);
    });

    let per_episode_us = result.elapsed.as_secs_f64() * 1e6 / result.samples as f64;
    let throughput = result.samples as f64 / result.elapsed.as_secs_f64();

    println!(
        "  Elapsed:     {:.1} ms",
        result.elapsed.as_secs_f64() * 1000.0
    );
    println!("  Per episode: {:.1} \u{00b5}s", per_episode_us);
    println!("  Throughput:  {:.0} episodes/sec", throughput);
    println!();

    if let Some(ref output_dir) = args.output {
        let stats = aggregate_statistics(&result.records, &config, args.strategy, args.seed);
        let json_path = format!("{}/run_statistics.json", output_dir);
        save_statistics(&stats, &json_path);
        println!("  Statistics:  {}", json_path);
        println!();
    }

    println!("Results:");
    println!("  Successes:   {} / {}", result.successes, result.samples);
    let expected = match args.strategy {
        Strategy::Follower => theoretical_success_probability(config.box_count, config.attempt_limit),
        Strategy::Random => None,
    };
    if let Some(expected) = expected {
        println!(
            "  Estimate:    {:.4} (closed form: {:.4}, delta: {:+.4})",
            result.probability,
            expected,
            result.probability - expected
        );
        let se = (expected * (1.0 - expected) / result.samples as f64).sqrt();
        if se > 0.0 {
            let z = (result.probability - expected) / se;
            println!(
                "  Std error:   {:.5}  (z = {:+.2}, |z| < 3.0 expected)",
                se, z
            );
            if z.abs() > 3.5 {
                eprintln!(
                    "WARNING: Estimate deviates from the closed form by {:.1} standard errors — possible bug!",
                    z.abs()
                );
            }
        }
    } else {
        println!("  Estimate:    {:.4}", result.probability);
    }
    println!();
    println!("probability of success: {:.2}%", result.probability * 100.0);
}
