//! CLI argument parsing using clap derive

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use fssp_core::{
    EmbedConfig, ExpRingSearchConfig, RingSearchConfig, RuleTable, Segment, Symbol,
    default_rename_pool,
};

use crate::error::Result;

/// fssp - Search for firing squad synchronization rule tables
#[derive(Parser, Debug)]
#[command(name = "fssp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for tables synchronizing rings of several lengths
    ///
    /// Examples:
    ///   fssp ring --lengths 2,4
    ///   fssp ring --lengths 2,4,8 --states QGAB --symmetric --time-optimal
    Ring(RingArgs),

    /// Search for self-renormalizing tables on rings
    ///
    /// Examples:
    ///   fssp exp-ring --base 2 --null 2 --init-len 2 --working RS
    ExpRing(ExpRingArgs),

    /// Check whether a table collapses onto an aggregate table
    ///
    /// Examples:
    ///   fssp embed --table "{'GQQ': 'G', 'QQQ': 'Q'}" --seeds GQQ
    Embed(EmbedArgs),

    /// Run a search described by a TOML, JSON or YAML file
    Run {
        /// Configuration file
        config: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the tables recorded in a record file
    Show {
        /// Record file
        file: PathBuf,

        /// Only show the table with this 1-based id
        #[arg(long)]
        index: Option<usize>,
    },

    /// Simulate a ring under a table
    Simulate {
        /// Table literal
        #[arg(long)]
        table: String,

        /// Initial ring configuration, e.g. GQQQ
        #[arg(long)]
        ring: String,

        /// Stop after this many steps
        #[arg(long, default_value_t = 1000)]
        max_steps: usize,
    },
}

/// Where and how many results to record
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Stop after this many solutions
    #[arg(long)]
    pub limit: Option<u64>,

    /// Record file (default: <name>_<id>.txt in the current directory)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Id used in the default record file name (default: first unused)
    #[arg(long)]
    pub id: Option<u32>,

    /// Also write the run configuration to this file (.toml, .json, .yaml)
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,
}

impl OutputArgs {
    /// Record file for a run named `name`.
    pub fn record_path(&self, dir: &Path, name: &str) -> PathBuf {
        match (&self.out, self.id) {
            (Some(out), _) => out.clone(),
            (None, Some(id)) => fssp_fs::record_path(dir, name, id),
            (None, None) => fssp_fs::next_record_path(dir, name),
        }
    }
}

#[derive(Args, Debug)]
pub struct RingArgs {
    /// Ring lengths, comma separated, synchronized in order
    #[arg(long, value_delimiter = ',', required = true)]
    pub lengths: Vec<usize>,

    /// Non-firing states in the order they are tried (must contain Q)
    #[arg(long, default_value = "QGA")]
    pub states: String,

    /// Initiator state (default: first working state)
    #[arg(long)]
    pub initiator: Option<char>,

    /// Tie every window to its mirror image
    #[arg(long)]
    pub symmetric: bool,

    /// Require a ring of length n to fire at exactly step n
    #[arg(long)]
    pub time_optimal: bool,

    /// Window width when no seed table is given
    #[arg(long)]
    pub width: Option<usize>,

    /// Seed table literal, e.g. an init_ruleset from a record file
    #[arg(long)]
    pub init_table: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ExpRingArgs {
    /// Fine steps per coarse step
    #[arg(long, default_value_t = 2)]
    pub base: usize,

    /// Window width minus one
    #[arg(long, default_value_t = 2)]
    pub null: usize,

    /// Length of the seed ring
    #[arg(long, default_value_t = 4)]
    pub init_len: usize,

    /// Working states; the first is the initiator
    #[arg(long, default_value = "RS")]
    pub working: String,

    /// Seed table literal
    #[arg(long)]
    pub init_table: Option<String>,

    /// Skip tables that leave a working state unused
    #[arg(long)]
    pub require_all_states: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// Base table literal
    #[arg(long)]
    pub table: String,

    /// Seed segments, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub seeds: Vec<String>,

    /// Applications of the base table per aggregate step
    #[arg(long, default_value_t = 1)]
    pub stride: usize,

    /// Base states per aggregate state
    #[arg(long, default_value_t = 1)]
    pub gran: usize,

    #[arg(long, default_value_t = 2)]
    pub base: usize,

    /// Fresh aggregate states, used in order
    #[arg(long)]
    pub rename: Option<String>,

    /// Also write the run configuration to this file (.toml, .json, .yaml)
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,
}

fn parse_table(literal: Option<&str>) -> Result<Option<RuleTable>> {
    Ok(literal.map(str::parse::<RuleTable>).transpose()?)
}

impl RingArgs {
    pub fn to_config(&self) -> Result<RingSearchConfig> {
        Ok(RingSearchConfig {
            lengths: self.lengths.clone(),
            states: Symbol::parse_many(&self.states)?,
            initiator: self.initiator.map(Symbol::new).transpose()?,
            symmetric: self.symmetric,
            time_optimal: self.time_optimal,
            width: self.width,
            init_table: parse_table(self.init_table.as_deref())?,
        })
    }
}

impl ExpRingArgs {
    pub fn to_config(&self) -> Result<ExpRingSearchConfig> {
        Ok(ExpRingSearchConfig {
            base: self.base,
            null: self.null,
            init_len: self.init_len,
            working: Symbol::parse_many(&self.working)?,
            init_table: parse_table(self.init_table.as_deref())?,
            require_all_states: self.require_all_states,
        })
    }
}

impl EmbedArgs {
    pub fn to_config(&self) -> Result<EmbedConfig> {
        let rename = match &self.rename {
            Some(pool) => Symbol::parse_many(pool)?,
            None => default_rename_pool(),
        };
        Ok(EmbedConfig {
            base_table: self.table.parse()?,
            seeds: self
                .seeds
                .iter()
                .map(|s| s.trim().parse::<Segment>())
                .collect::<fssp_core::Result<_>>()?,
            stride: self.stride,
            gran: self.gran,
            base: self.base,
            rename,
        })
    }
}
