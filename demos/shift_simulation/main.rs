use rayon::prelude::*;
use std::env;
use std::time::Instant;

mod shift;

use shift::{run_shift, Aggregate, ShiftConfig, ShiftSummary, SimulationError};

fn flag<T: std::str::FromStr>(args: &[String], name: &str) -> Option<T> {
    args.iter()
        .position(|arg| arg == name)
        .and_then(|index| args.get(index + 1))
        .and_then(|value| value.parse().ok())
}

fn config_from_args() -> ShiftConfig {
    let args: Vec<String> = env::args().collect();
    let mut config = ShiftConfig::default();
    if let Some(runs) = flag(&args, "--runs") {
        config = config.with_runs(runs);
    }
    if let Some(ticks) = flag(&args, "--ticks") {
        config = config.with_ticks(ticks);
    }
    if let Some(seed) = flag(&args, "--seed") {
        config = config.with_seed_base(seed);
    }
    if let Some(probability) = flag(&args, "--arrivals") {
        config = config.with_arrival_probability(probability);
    }
    if let (Some(waiters), Some(cooks)) = (flag(&args, "--waiters"), flag(&args, "--cooks")) {
        config = config.with_staff(waiters, cooks);
    }
    config
}

fn main() -> Result<(), SimulationError> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .format_timestamp(None)
        .init();

    let config = config_from_args();
    println!("Shift simulation");
    println!("  Runs: {} x {} ticks, seeds from {}", config.runs, config.ticks, config.seed_base);
    println!(
        "  Arrivals: p={:.2} per tick, mean party {:.1}",
        config.arrival_probability, config.mean_party_size
    );
    println!(
        "  Layout: tables {:?}, {} waiter(s), {} cook(s)",
        config.table_layout, config.waiters, config.cooks
    );
    println!();

    let started = Instant::now();
    let summaries: Vec<ShiftSummary> = (0..config.runs)
        .into_par_iter()
        .map(|run| run_shift(&config, run))
        .collect::<Result<_, _>>()?;
    let elapsed = started.elapsed();

    for summary in &summaries {
        println!(
            "run {:>2}: {:>3} arrived ({} seated at once), {:>3} visits closed, peak queue {:>2}, revenue {:>9}, gratuity {:>7}, top dish {}",
            summary.run,
            summary.parties_arrived,
            summary.parties_seated_on_arrival,
            summary.visits_closed,
            summary.peak_queue,
            summary.revenue,
            summary.gratuity,
            summary.top_dish.as_deref().unwrap_or("-")
        );
    }

    let aggregate = Aggregate::from_runs(&summaries);
    println!();
    println!("Aggregate over {} run(s) in {:?}:", aggregate.runs, elapsed);
    println!("  Parties arrived: {}", aggregate.parties_arrived);
    println!("  Visits closed:   {}", aggregate.visits_closed);
    println!("  Left waiting:    {}", aggregate.still_waiting);
    println!("  Worst queue:     {}", aggregate.worst_queue);
    println!("  Revenue:         {} (mean {} per run)", aggregate.revenue, aggregate.mean_revenue());
    println!("  Gratuity:        {}", aggregate.gratuity);
    for (dish, wins) in &aggregate.top_dishes {
        println!("  Top dish in {} run(s): {}", wins, dish);
    }
    Ok(())
}
