use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use predprey_core::{ActivationOrder, EnergySplit, RunSummary, SimConfig, World};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderArg {
    Fixed,
    Shuffled,
    SpeciesGrouped,
}

impl From<OrderArg> for ActivationOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Fixed => ActivationOrder::Fixed,
            OrderArg::Shuffled => ActivationOrder::Shuffled,
            OrderArg::SpeciesGrouped => ActivationOrder::SpeciesGrouped,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SplitArg {
    Conserving,
    PerOffspring,
}

impl From<SplitArg> for EnergySplit {
    fn from(arg: SplitArg) -> Self {
        match arg {
            SplitArg::Conserving => EnergySplit::Conserving,
            SplitArg::PerOffspring => EnergySplit::PerOffspring,
        }
    }
}

/// Headless predator-prey benchmark run.
#[derive(Parser, Debug)]
#[command(name = "predprey", version)]
struct Args {
    /// Tick budget.
    #[arg(long)]
    steps: Option<usize>,
    /// Initial prey count.
    #[arg(long)]
    preys: Option<usize>,
    /// Initial predator count.
    #[arg(long)]
    predators: Option<usize>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// JSON config file; command-line flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    activation_order: Option<OrderArg>,
    #[arg(long, value_enum)]
    energy_split: Option<SplitArg>,
    /// Log population counts every N ticks (0 disables progress lines).
    #[arg(long, default_value_t = 100)]
    report_every: usize,
    /// Independent runs with seeds `seed..seed+N`, executed in parallel.
    #[arg(long, default_value_t = 1)]
    replicates: u64,
    /// Print the run reports as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct RunReport {
    seed: u64,
    setup_secs: f64,
    loop_secs: f64,
    ticks_per_sec: f64,
    summary: RunSummary,
}

fn build_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SimConfig::from_json(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(steps) = args.steps {
        config.max_steps = steps;
    }
    if let Some(preys) = args.preys {
        config.nb_prey_init = preys;
    }
    if let Some(predators) = args.predators {
        config.nb_predator_init = predators;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(order) = args.activation_order {
        config.activation_order = order.into();
    }
    if let Some(split) = args.energy_split {
        config.energy_split = split.into();
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Run one simulation to completion in chunks of `report_every` ticks,
/// logging counts after each chunk.
fn run_replicate(config: SimConfig, seed: u64, report_every: usize) -> Result<RunReport> {
    let setup_start = Instant::now();
    let max_steps = config.max_steps;
    let mut world = World::try_new(config, seed).context("building world")?;
    let setup_secs = setup_start.elapsed().as_secs_f64();

    let chunk = if report_every == 0 {
        max_steps
    } else {
        report_every.min(max_steps)
    }
    .min(World::MAX_EXPERIMENT_STEPS);
    let loop_start = Instant::now();
    let mut summary = RunSummary {
        schema_version: 1,
        steps: max_steps,
        steps_executed: 0,
        sample_every: chunk,
        finished: false,
        final_tick: 0,
        final_prey_count: 0,
        final_predator_count: 0,
        births: 0,
        starvation_deaths: 0,
        kills: 0,
        samples: Vec::new(),
    };
    while !world.is_finished() {
        let part = world
            .try_run_experiment(chunk, chunk)
            .context("running simulation")?;
        if report_every > 0 {
            info!(
                seed,
                tick = part.final_tick,
                prey = part.final_prey_count,
                predators = part.final_predator_count,
                "progress"
            );
        }
        summary.steps_executed += part.steps_executed;
        summary.births += part.births;
        summary.starvation_deaths += part.starvation_deaths;
        summary.kills += part.kills;
        summary.finished = part.finished;
        summary.final_tick = part.final_tick;
        summary.final_prey_count = part.final_prey_count;
        summary.final_predator_count = part.final_predator_count;
        summary.samples.extend(part.samples);
    }
    let loop_secs = loop_start.elapsed().as_secs_f64();
    let ticks_per_sec = if loop_secs > 0.0 {
        summary.steps_executed as f64 / loop_secs
    } else {
        0.0
    };

    if summary.final_prey_count == 0 && summary.final_predator_count == 0 {
        info!(seed, tick = summary.final_tick, "all agents died, stopping early");
    }
    Ok(RunReport {
        seed,
        setup_secs,
        loop_secs,
        ticks_per_sec,
        summary,
    })
}

fn print_report(report: &RunReport) {
    println!("=== seed {} ===", report.seed);
    println!("Setup time:  {:.4} s", report.setup_secs);
    println!("Loop time:   {:.4} s", report.loop_secs);
    println!(
        "Throughput:  {:.2} ticks/s over {} ticks",
        report.ticks_per_sec, report.summary.steps_executed
    );
    println!(
        "Final:       prey={} predators={} (births={}, starvations={}, kills={})",
        report.summary.final_prey_count,
        report.summary.final_predator_count,
        report.summary.births,
        report.summary.starvation_deaths,
        report.summary.kills
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    info!(
        steps = config.max_steps,
        width = config.width,
        height = config.height,
        prey = config.nb_prey_init,
        predators = config.nb_predator_init,
        order = ?config.activation_order,
        split = ?config.energy_split,
        replicates = args.replicates,
        "starting benchmark"
    );

    let seeds: Vec<u64> = (0..args.replicates.max(1))
        .map(|i| args.seed.wrapping_add(i))
        .collect();
    let reports = if seeds.len() == 1 {
        vec![run_replicate(config, seeds[0], args.report_every)?]
    } else {
        seeds
            .par_iter()
            .map(|&seed| run_replicate(config.clone(), seed, args.report_every))
            .collect::<Result<Vec<_>>>()?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }
    Ok(())
}
