//! Drive a breaker against a randomly failing operation

use clap::Args;
use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use tripwire_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerStats, StateKind};
use tripwire_core::{Error, Result};

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Failures tolerated before the circuit opens
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Milliseconds the circuit stays open before probing
    #[arg(long = "timeout-ms")]
    pub timeout_ms: Option<u64>,

    /// JSON configuration file applied before environment overrides and flags
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Breaker name used in logs
    #[arg(long, default_value = "simulated")]
    pub name: String,

    /// Number of attempts to make
    #[arg(long, default_value = "50")]
    pub calls: usize,

    /// Probability that a protected call fails (0.0 - 1.0)
    #[arg(long, default_value = "0.5", value_parser = parse_probability)]
    pub failure_rate: f64,

    /// Pause between attempts
    #[arg(long = "interval-ms", default_value = "10")]
    pub interval_ms: u64,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_probability(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|e| format!("'{raw}' is not a number: {e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not between 0.0 and 1.0"))
    }
}

/// One observed state change
#[derive(Debug, Clone, Serialize)]
pub struct TransitionRecord {
    pub after_ms: u64,
    pub state: StateKind,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub name: String,
    pub transitions: Vec<TransitionRecord>,
    pub stats: CircuitBreakerStats,
}

/// File, then environment, then flags
pub fn resolve_config(args: &SimulateArgs) -> Result<CircuitBreakerConfig> {
    let mut config = match &args.config {
        Some(path) => CircuitBreakerConfig::from_file(path)?,
        None => CircuitBreakerConfig::default(),
    }
    .apply_env_overrides()?;

    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout = Duration::from_millis(timeout_ms);
    }

    config.validate()?;
    Ok(config)
}

pub async fn run(args: &SimulateArgs, config: CircuitBreakerConfig) -> Result<SimulationReport> {
    let started = Instant::now();
    let transitions = Arc::new(Mutex::new(Vec::new()));

    let breaker = {
        let transitions = Arc::clone(&transitions);
        CircuitBreaker::builder()
            .name(args.name.clone())
            .config(config)
            .listener(move |source: &CircuitBreaker, state: StateKind| {
                let after_ms = started.elapsed().as_millis() as u64;
                info!(breaker = source.name(), %state, after_ms, "State changed");
                transitions.lock().push(TransitionRecord { after_ms, state });
            })
            .build()?
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let interval = Duration::from_millis(args.interval_ms);

    for attempt in 0..args.calls {
        let should_fail = rng.gen_bool(args.failure_rate);
        breaker
            .attempt_call_async(|| async move {
                if should_fail {
                    Err(Error::protected_call(format!("simulated failure #{attempt}")))
                } else {
                    Ok(())
                }
            })
            .await;

        if !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
    }

    let transitions = transitions.lock().clone();
    Ok(SimulationReport {
        name: breaker.name().to_string(),
        transitions,
        stats: breaker.stats(),
    })
}

pub async fn execute(args: SimulateArgs) -> eyre::Result<()> {
    let config = resolve_config(&args)?;
    let report = run(&args, config).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for record in &report.transitions {
        println!("[{:>6}ms] {} -> {}", record.after_ms, report.name, record.state);
    }
    let stats = &report.stats;
    println!();
    println!("breaker:          {}", report.name);
    println!("final state:      {}", stats.state);
    println!("calls:            {}", stats.total_calls);
    println!("  succeeded:      {}", stats.successes);
    println!("  failed:         {}", stats.failed_calls);
    println!("  short-circuited: {}", stats.short_circuited);
    println!("transitions:      {}", stats.transitions);

    Ok(())
}
