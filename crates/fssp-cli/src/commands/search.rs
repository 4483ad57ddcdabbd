//! Search command implementations
//!
//! Every search records its solutions in a record file as they are found,
//! so an interrupted run keeps everything printed so far.

use std::path::Path;
use std::time::Instant;

use colored::Colorize;

use fssp_core::{
    Backtracker, ExpRingSearch, ExpRingSearchConfig, Problem, ResultSink, RingSearch,
    RingSearchConfig, RuleTable, RunParams, SearchStats, Symbol, render_symbols,
};
use fssp_fs::RecordFile;

use crate::cli::OutputArgs;
use crate::display_path;
use crate::error::Result;

/// A search cursor whose counters can be reported.
trait Search: Iterator<Item = RuleTable> {
    fn stats(&self) -> SearchStats;
}

impl<P: Problem<Output = RuleTable>> Search for Backtracker<P> {
    fn stats(&self) -> SearchStats {
        Backtracker::stats(self)
    }
}

impl Search for ExpRingSearch {
    fn stats(&self) -> SearchStats {
        ExpRingSearch::stats(self)
    }
}

/// Run the direct ring search
pub fn run_ring(dir: &Path, config: &RingSearchConfig, output: &OutputArgs) -> Result<()> {
    let search = RingSearch::start(config)?;
    record_search(dir, search, config.params(), None, output)
}

/// Run the exponential ring search
pub fn run_exp_ring(dir: &Path, config: &ExpRingSearchConfig, output: &OutputArgs) -> Result<()> {
    let search = ExpRingSearch::new(config)?;
    let working = config.require_all_states.then_some(config.working.as_slice());
    record_search(dir, search, config.params(), working, output)
}

fn record_search<S: Search>(
    dir: &Path,
    mut search: S,
    params: RunParams,
    require_all: Option<&[Symbol]>,
    output: &OutputArgs,
) -> Result<()> {
    let path = output.record_path(dir, params.name());
    let mut sink = RecordFile::create(&path)?;

    println!("{} {}", "=>".blue().bold(), params.name().bold());
    for (key, value) in params.entries() {
        println!("   {} = {}", key.cyan(), value);
    }
    println!("   {} {}", "recording to".dimmed(), display_path(&path));
    println!();

    let started = Instant::now();
    sink.begin(&params)?;
    let mut skipped = 0u64;
    while output.limit.is_none_or(|limit| sink.accepted() < limit) {
        let Some(table) = search.next() else {
            break;
        };
        if require_all.is_some_and(|working| !table.uses_all(working.iter().copied())) {
            skipped += 1;
            let states: Vec<Symbol> = table.states().into_iter().collect();
            println!(
                "{} table leaves a working state unused (states {})",
                "skip".yellow(),
                render_symbols(&states)
            );
            continue;
        }
        let id = sink.accept(&table)?;
        println!("{} {}", "Ruleset".green().bold(), id);
        println!("{table}");
    }
    sink.end()?;

    let stats = search.stats();
    println!();
    println!("elapsed_time = {:.3} secs", started.elapsed().as_secs_f64());
    println!(
        "{} {} recorded, {} skipped; {} nodes, {} contradictions, {} branch points",
        "OK".green().bold(),
        sink.accepted(),
        skipped,
        stats.nodes,
        stats.contradictions,
        stats.branch_points
    );
    Ok(())
}
