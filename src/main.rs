use clap::Parser;
use log::{error, info};

use helios_kcode::cli::{Cli, Commands};
use helios_kcode::config::{bare_sphere_scenario, EngineConfig};
use helios_kcode::cycle::{CycleController, CycleType};
use helios_kcode::driver::Driver;
use helios_kcode::io::{bin, json, CriticalityReport, DataPersistence, TallyRecord};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => run_check(&config),
        Commands::Run { config, radius, save } => run(&config, radius, save),
    }
}

fn run_check(config_path: &std::path::Path) -> anyhow::Result<()> {
    use anyhow::Context;
    let config = EngineConfig::load(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    config.validate().with_context(|| "validating config")?;
    println!("config OK: {} particles, {} inactive + {} active cycles, scheduler={:?}",
        config.criticality.particles,
        config.criticality.inactive,
        config.criticality.active,
        config.scheduler_policy()?,
    );
    Ok(())
}

fn run(config_path: &std::path::Path, radius: f64, save: bool) -> anyhow::Result<()> {
    use anyhow::Context;
    let config = EngineConfig::load(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    config.validate().with_context(|| "validating config")?;

    let (world, source) = bare_sphere_scenario(
        radius,
        config.energy_freegas_threshold,
        config.awr_freegas_threshold,
    )
    .with_context(|| "building reference scenario")?;
    let driver = Driver::new(config.scheduler_policy()?);
    let mut controller = CycleController::new(
        &world,
        &source,
        config.seed,
        config.max_rng_per_history,
        config.max_source_samples as u64,
        config.criticality.particles,
    )
    .with_context(|| "initializing fission bank from source")?;

    for _ in 0..config.criticality.inactive {
        let report = controller.run_cycle(&world, &driver, CycleType::Inactive).map_err(|e| {
            error!("inactive cycle {} failed: {e}", controller.cycle());
            e
        })?;
        info!(
            "cycle {} [inactive] keff={:.5} population={}",
            report.cycle, report.keff, report.population
        );
    }

    for _ in 0..config.criticality.active {
        let report = controller.run_cycle(&world, &driver, CycleType::Active).map_err(|e| {
            error!("active cycle {} failed: {e}", controller.cycle());
            e
        })?;
        info!(
            "cycle {} [active] keff={:.5} population={}",
            report.cycle, report.keff, report.population
        );
    }

    let tallies = controller.tallies().report();
    println!();
    println!("final k-eff estimate: {:.6}", controller.keff());
    println!("{:<16}{:>14}{:>14}", "tally", "mean", "stderr");
    for t in &tallies {
        println!("{:<16}{:>14.6}{:>14.6}", t.kind.label(), t.mean, t.stderr);
    }

    if save {
        helios_kcode::io::ensure_data_directories()?;
        let report = CriticalityReport {
            seed: config.seed,
            particles: config.criticality.particles,
            inactive_cycles: config.criticality.inactive,
            active_cycles: config.criticality.active,
            keff: controller.keff(),
            tallies: tallies.into_iter().map(TallyRecord::from).collect(),
        };
        bin::save_file(&report).with_context(|| "saving binary report")?;
        json::export_json(&report).with_context(|| "exporting json report")?;
        info!("saved report to {}", report.binary_path().display());
    }

    Ok(())
}
