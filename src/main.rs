//! Fuel-Burnup Simulator - Main Entry Point
//!
//! Loads a core scenario, applies operator fuel edits and reports the
//! burnup cycle.

use clap::Parser;
use std::process::ExitCode;

use fuel_burnup_lib::{
    fuel_generations, AgeDelta, BurnupEngine, FuelError, FuelManagementSession, Scenario, SimulationResult,
};

/// Operator edit as `row,col,delta` with delta -1 or +1
#[derive(Debug, Clone, Copy)]
struct EditRequest {
    row: usize,
    col: usize,
    delta: AgeDelta,
}

fn parse_edit(value: &str) -> Result<EditRequest, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [row, col, delta] = parts.as_slice() else {
        return Err(format!("expected row,col,delta but got '{value}'"));
    };
    let row = row.parse().map_err(|e| format!("row '{row}': {e}"))?;
    let col = col.parse().map_err(|e| format!("col '{col}': {e}"))?;
    let delta: i32 = delta.parse().map_err(|e| format!("delta '{delta}': {e}"))?;
    let delta = AgeDelta::try_from(delta).map_err(|e| e.to_string())?;
    Ok(EditRequest { row, col, delta })
}

/// Reactor-core fuel-management simulator
#[derive(Parser, Debug)]
#[command(name = "fuel-burnup-simulator")]
#[command(about = "Simulate burnup, power and leakage over one operating cycle", long_about = None)]
struct Args {
    /// Scenario file (JSON list of core layouts)
    #[arg(short, long)]
    scenarios: Option<String>,

    /// Index of the scenario to load
    #[arg(short = 'n', long, default_value_t = 0)]
    scenario: usize,

    /// Fuel edit `row,col,delta` (repeatable, applied in order)
    #[arg(short, long = "edit", value_parser = parse_edit, allow_hyphen_values = true)]
    edits: Vec<EditRequest>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

fn run(args: Args) -> Result<(), FuelError> {
    let scenarios = match &args.scenarios {
        Some(path) => Scenario::load_many_from_file(path)?,
        None => Scenario::load_default(),
    };
    let scenario = scenarios.get(args.scenario).ok_or_else(|| {
        FuelError::Config(format!(
            "scenario index {} out of range ({} available)",
            args.scenario,
            scenarios.len()
        ))
    })?;
    log::info!("Loading scenario '{}'", scenario.name);

    let session = FuelManagementSession::new(scenario.core_layout()?, BurnupEngine::default());

    for edit in &args.edits {
        match session.adjust(edit.row, edit.col, edit.delta) {
            Ok(update) => println!(
                "edit ({}, {}) {:+}: {} slot(s) changed",
                edit.row,
                edit.col,
                edit.delta.as_i32(),
                update.changed.len()
            ),
            Err(e) if e.is_recoverable() => println!("edit ({}, {}) rejected: {e}", edit.row, edit.col),
            Err(e) => return Err(e),
        }
    }

    let result = session.simulate()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&scenario.name, &result, session.engine().config().max_age);
    }
    Ok(())
}

fn print_report(name: &str, result: &SimulationResult, max_age: u8) {
    println!("Scenario: {name}");
    println!("Fuel elements: {}", result.summary.total_fuel_elements);
    for generation in fuel_generations(max_age) {
        let count = result.summary.age_counts.get(&generation.age).copied().unwrap_or(0);
        println!("  {:<8} {count}", generation.label);
    }
    println!();
    println!("{:>6} {:>10} {:>10} {:>10}", "step", "burnup", "peak", "leakage%");
    for (s, step) in result.steps.iter().enumerate() {
        println!(
            "{:>6} {:>10.3} {:>10.3} {:>10.2}",
            s,
            step.burnup,
            step.power_map.max_defined().unwrap_or(0.0),
            step.leakage
        );
    }
    if let Some(peak) = result.peak_power() {
        println!();
        println!("Peak local power over cycle: {peak:.3}");
    }
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit() {
        let edit = parse_edit("2, 3,-1").unwrap();
        assert_eq!((edit.row, edit.col, edit.delta), (2, 3, AgeDelta::Decrease));
        assert_eq!(parse_edit("0,0,+1").unwrap().delta, AgeDelta::Increase);
        assert!(parse_edit("0,0,2").is_err());
        assert!(parse_edit("0,0").is_err());
        assert!(parse_edit("a,0,1").is_err());
    }
}
