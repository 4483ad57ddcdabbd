//! Typed run configurations
//!
//! Each search driver takes one of these. They deserialize from any serde
//! format; symbol lists are written as plain strings (`states = "QGA"`) and
//! tables as their literal form, so configuration files stay hand-editable:
//!
//! ```toml
//! mode = "exp-ring"
//! base = 2
//! null = 2
//! init_len = 4
//! working = "RS"
//! ```

use serde::{Deserialize, Serialize};

use crate::sink::RunParams;
use crate::symbol::render_symbols;
use crate::{RuleTable, Segment, Symbol};

/// Serde adapter for a list of symbols written as one string.
mod symbol_list {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::Symbol;
    use crate::symbol::render_symbols;

    pub fn serialize<S: Serializer>(symbols: &[Symbol], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&render_symbols(symbols))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Symbol>, D::Error> {
        let s = String::deserialize(deserializer)?;
        Symbol::parse_many(&s).map_err(serde::de::Error::custom)
    }
}

fn default_one() -> usize {
    1
}

fn default_base() -> usize {
    2
}

/// Fresh aggregate states offered to the embedder: the capitals except Q and F.
pub fn default_rename_pool() -> Vec<Symbol> {
    ('A'..='Z')
        .filter(|c| !matches!(c, 'Q' | 'F'))
        .filter_map(|c| Symbol::new(c).ok())
        .collect()
}

fn sized(table: Option<&RuleTable>) -> Option<&RuleTable> {
    table.filter(|t| t.is_sized())
}

/// The seed a search starts from, rendered after the quiescent rule is added.
fn seed_param(table: Option<&RuleTable>, width: usize) -> String {
    let mut seed = match sized(table) {
        Some(table) => table.clone(),
        None if width > 0 => RuleTable::new(width),
        None => RuleTable::blank(),
    };
    // A seed that breaks quiescence is rejected when the search starts.
    let _ = seed.ensure_quiescent();
    seed.to_string()
}

/// Direct search for tables synchronizing several ring lengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingSearchConfig {
    /// Ring lengths, synchronized in order.
    pub lengths: Vec<usize>,

    /// Non-firing states in the order they are tried; must contain Q.
    #[serde(with = "symbol_list")]
    pub states: Vec<Symbol>,

    /// Initial state of cell 0; defaults to the first working state.
    #[serde(default)]
    pub initiator: Option<Symbol>,

    /// Tie every window to its mirror image.
    #[serde(default)]
    pub symmetric: bool,

    /// Require a ring of length n to fire at exactly step n.
    #[serde(default)]
    pub time_optimal: bool,

    /// Window width when no seed table is given.
    #[serde(default)]
    pub width: Option<usize>,

    /// Partial table to start from, e.g. a table recorded by an earlier run.
    #[serde(default)]
    pub init_table: Option<RuleTable>,
}

impl RingSearchConfig {
    fn initiator_or_default(&self) -> Option<Symbol> {
        self.initiator.or_else(|| {
            self.states
                .iter()
                .copied()
                .find(|s| !s.is_quiescent() && !s.is_firing())
        })
    }

    /// The seed table, unless it is absent or the empty `{}`.
    pub fn seed_table(&self) -> Option<&RuleTable> {
        sized(self.init_table.as_ref())
    }

    fn width_or_default(&self) -> usize {
        self.seed_table()
            .map(RuleTable::width)
            .or(self.width)
            .unwrap_or(crate::drivers::ring::DEFAULT_WIDTH)
    }

    /// Run name, e.g. `ring_len2_4_QGA_sym`.
    pub fn name(&self) -> String {
        let lengths: Vec<String> = self.lengths.iter().map(ToString::to_string).collect();
        let mut name = format!("ring_len{}_{}", lengths.join("_"), render_symbols(&self.states));
        if self.symmetric {
            name.push_str("_sym");
        }
        if self.time_optimal {
            name.push_str("_opt");
        }
        name
    }

    pub fn params(&self) -> RunParams {
        let lengths: Vec<String> = self.lengths.iter().map(ToString::to_string).collect();
        let mut params = RunParams::new(self.name())
            .with("lengths", format!("[{}]", lengths.join(", ")))
            .with_text("states", render_symbols(&self.states));
        if let Some(initiator) = self.initiator_or_default() {
            params = params.with_text("initiator", initiator);
        }
        params
            .with("symmetric", self.symmetric)
            .with("time_optimal", self.time_optimal)
            .with("width", self.width_or_default())
            .with(
                "init_ruleset",
                seed_param(self.init_table.as_ref(), self.width_or_default()),
            )
    }
}

/// Search for self-renormalizing tables on rings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpRingSearchConfig {
    /// Fine steps per coarse step.
    pub base: usize,

    /// Window width minus one.
    pub null: usize,

    /// Length of the seed ring.
    pub init_len: usize,

    /// Working states; the first one is the initiator.
    #[serde(with = "symbol_list")]
    pub working: Vec<Symbol>,

    #[serde(default)]
    pub init_table: Option<RuleTable>,

    /// Skip solutions that leave a working state unused.
    #[serde(default)]
    pub require_all_states: bool,
}

impl ExpRingSearchConfig {
    /// The seed table, unless it is absent or the empty `{}`.
    pub fn seed_table(&self) -> Option<&RuleTable> {
        sized(self.init_table.as_ref())
    }

    /// Run name, e.g. `base2_null2_init_len4_RS`.
    pub fn name(&self) -> String {
        format!(
            "base{}_null{}_init_len{}_{}",
            self.base,
            self.null,
            self.init_len,
            render_symbols(&self.working)
        )
    }

    pub fn params(&self) -> RunParams {
        RunParams::new(self.name())
            .with("base", self.base)
            .with("null", self.null)
            .with("init_len", self.init_len)
            .with_text("working", render_symbols(&self.working))
            .with("init_ruleset", seed_param(self.init_table.as_ref(), self.null + 1))
    }
}

/// Verification of a fixed table against an aggregate alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// The fixed fine table.
    pub base_table: RuleTable,

    /// Segments whose closure is checked.
    pub seeds: Vec<Segment>,

    /// Applications of the base table per aggregate step.
    #[serde(default = "default_one")]
    pub stride: usize,

    /// Base states per aggregate state.
    #[serde(default = "default_one")]
    pub gran: usize,

    #[serde(default = "default_base")]
    pub base: usize,

    /// Fresh aggregate states, used in order.
    #[serde(with = "symbol_list", default = "default_rename_pool")]
    pub rename: Vec<Symbol>,
}

impl EmbedConfig {
    /// Run name, e.g. `embed_stride1_gran1_base2`.
    pub fn name(&self) -> String {
        format!("embed_stride{}_gran{}_base{}", self.stride, self.gran, self.base)
    }

    pub fn params(&self) -> RunParams {
        let seeds: Vec<String> = self.seeds.iter().map(|s| format!("'{s}'")).collect();
        RunParams::new(self.name())
            .with("stride", self.stride)
            .with("gran", self.gran)
            .with("base", self.base)
            .with("seeds", format!("[{}]", seeds.join(", ")))
            .with_text("rename", render_symbols(&self.rename))
            .with("base_ruleset", &self.base_table)
    }
}

/// A configuration file: one run of any driver, selected by `mode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum RunConfig {
    Ring(RingSearchConfig),
    ExpRing(ExpRingSearchConfig),
    Embed(EmbedConfig),
}

impl RunConfig {
    pub fn name(&self) -> String {
        match self {
            RunConfig::Ring(config) => config.name(),
            RunConfig::ExpRing(config) => config.name(),
            RunConfig::Embed(config) => config.name(),
        }
    }

    pub fn params(&self) -> RunParams {
        match self {
            RunConfig::Ring(config) => config.params(),
            RunConfig::ExpRing(config) => config.params(),
            RunConfig::Embed(config) => config.params(),
        }
    }
}
