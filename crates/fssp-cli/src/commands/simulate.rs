//! Simulate command implementation

use colored::Colorize;

use fssp_core::{RuleTable, Segment, TraceOutcome, simulate_ring};

use crate::error::Result;

/// Run a ring under a table and print every configuration
pub fn run_simulate(table: &str, ring: &str, max_steps: usize) -> Result<()> {
    let table: RuleTable = table.parse()?;
    let ring: Segment = ring.parse()?;

    let trace = simulate_ring(&table, &ring, max_steps);
    for (step, cfg) in trace.configurations.iter().enumerate() {
        println!("{step:>4} {cfg}");
    }
    println!();

    match trace.outcome {
        TraceOutcome::Fired { step } => {
            println!(
                "{} ring of length {} fired at step {}",
                "FIRED".green().bold(),
                ring.len(),
                step
            );
        }
        TraceOutcome::Recurred { step, first_seen } => {
            println!(
                "{} configuration at step {} repeats step {}; the ring never fires",
                "LOOP".red().bold(),
                step,
                first_seen
            );
        }
        TraceOutcome::Unmapped { step } => {
            println!("{} no rule for some window at step {}", "UNMAPPED".red().bold(), step);
        }
        TraceOutcome::StepLimit => {
            println!("{} stopped after {} steps", "LIMIT".yellow().bold(), max_steps);
        }
    }
    if let Some(step) = trace.premature {
        println!("{} some cells fired early at step {}", "WARNING".yellow().bold(), step);
    }
    Ok(())
}
