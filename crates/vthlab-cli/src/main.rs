//! vthlab command-line interface.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use vthlab_core::sweep::{linear_sweep, nearest_step};
use vthlab_extract::{VthConfig, extract_vth};
use vthlab_raw::read_raw;

mod output;

#[derive(Parser)]
#[command(name = "vthlab")]
#[command(about = "MOSFET threshold-voltage extraction from SPICE sweep results")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract Vgs(th) from a rawfile
    Extract {
        /// Path to the .raw file
        raw: PathBuf,

        /// Target temperature (degC)
        #[arg(long, default_value = "25.0")]
        temperature: f64,

        /// Threshold drain current (A)
        #[arg(long, default_value = "1e-3")]
        current: f64,

        /// First temperature of the .step sweep (degC)
        #[arg(long, default_value = "-55.0")]
        sweep_start: f64,

        /// Last temperature of the .step sweep (degC)
        #[arg(long, default_value = "175.0")]
        sweep_stop: f64,

        /// Temperature increment of the .step sweep (degC)
        #[arg(long, default_value = "10.0")]
        sweep_step: f64,

        /// Print the Vgs/Id curve of the analyzed step
        #[arg(long)]
        curve: bool,
    },

    /// List the traces recorded in a rawfile
    Traces {
        /// Path to the .raw file
        raw: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            raw,
            temperature,
            current,
            sweep_start,
            sweep_stop,
            sweep_step,
            curve,
        } => cmd_extract(
            raw,
            temperature,
            current,
            sweep_start,
            sweep_stop,
            sweep_step,
            curve,
        ),
        Commands::Traces { raw } => cmd_traces(raw),
    }
}

fn cmd_extract(
    raw: PathBuf,
    temperature: f64,
    current: f64,
    sweep_start: f64,
    sweep_stop: f64,
    sweep_step: f64,
    curve: bool,
) -> Result<()> {
    let plot = read_raw(&raw).with_context(|| format!("failed to read {}", raw.display()))?;

    let sweep_values_c = linear_sweep(sweep_start, sweep_stop, sweep_step);
    let step = nearest_step(&sweep_values_c, temperature);
    let step_temp = sweep_values_c.get(step).copied();

    let cfg = VthConfig {
        target_temperature_c: temperature,
        target_current_a: current,
        sweep_values_c,
    };
    let result = extract_vth(&plot.traces, &cfg).context("threshold extraction failed")?;

    println!("Vgs(th) Extraction");
    println!("==================");
    println!();
    println!("Rawfile:  {}", raw.display());
    println!("Plotname: {}", plot.plotname);
    match step_temp {
        Some(t) => println!("Analyzed: step {} of {} (~{} degC)", step, plot.num_steps, t),
        None => println!("Analyzed: step {} of {}", step, plot.num_steps),
    }
    println!("Target:   Id = {:.6e} A", current);
    println!();
    println!("Vgs(th) = {:.6} V", result.threshold_volts);
    println!();

    if curve {
        output::print_curve(&result);
    }
    Ok(())
}

fn cmd_traces(raw: PathBuf) -> Result<()> {
    let plot = read_raw(&raw).with_context(|| format!("failed to read {}", raw.display()))?;

    println!("Rawfile Traces");
    println!("==============");
    println!();
    println!("Title:    {}", plot.title);
    println!("Plotname: {}", plot.plotname);
    println!("Steps:    {}", plot.num_steps);
    println!();
    output::print_traces(&plot.traces);
    Ok(())
}
