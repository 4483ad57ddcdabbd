//! Known solutions, found once and pinned.

use fssp_core::{EmbedConfig, ExpRingSearchConfig, RingSearchConfig, RuleTable, Symbol};

/// First solution of the two-and-four ring search over `QGA`.
pub const RING_2_4_QGA: &str = "{'AQA': 'F', 'AQQ': 'Q', 'GAQ': 'Q', 'GGQ': 'G', 'GQG': 'Q', \
    'GQQ': 'Q', 'QAQ': 'F', 'QGA': 'G', 'QGG': 'Q', 'QGQ': 'A', 'QQG': 'G', 'QQQ': 'Q'}";

/// The only base-2, nullity-3 self-renormalizing table with working state `R`.
pub const EXP_2_3_R: &str = "{'QQQQ': 'Q', 'QQQR': 'R', 'QQRQ': 'Q', 'QQRR': 'R', 'QRQQ': 'Q', \
    'QRQR': 'R', 'QRRQ': 'Q', 'RQQQ': 'R', 'RQQR': 'Q', 'RQRQ': 'R', 'RQRR': 'Q', 'RRQQ': 'R', \
    'RRQR': 'Q', 'RRRR': 'F'}";

/// Parse a table literal, panicking on malformed input.
pub fn table(literal: &str) -> RuleTable {
    literal
        .parse()
        .unwrap_or_else(|e| panic!("bad table literal {literal:?}: {e}"))
}

fn symbols(s: &str) -> Vec<Symbol> {
    Symbol::parse_many(s).unwrap_or_else(|e| panic!("bad symbols {s:?}: {e}"))
}

/// Ring search over `QGA` seeded with `{'QQQ': 'Q'}`.
pub fn ring_config(lengths: &[usize]) -> RingSearchConfig {
    RingSearchConfig {
        lengths: lengths.to_vec(),
        states: symbols("QGA"),
        initiator: None,
        symmetric: false,
        time_optimal: false,
        width: None,
        init_table: Some(RuleTable::quiescent(3)),
    }
}

pub fn exp_ring_config(
    base: usize,
    null: usize,
    init_len: usize,
    working: &str,
) -> ExpRingSearchConfig {
    ExpRingSearchConfig {
        base,
        null,
        init_len,
        working: symbols(working),
        init_table: None,
        require_all_states: false,
    }
}

/// Embedding of [`EXP_2_3_R`] into itself from the given seeds.
pub fn embed_config(seeds: &[&str], stride: usize, gran: usize) -> EmbedConfig {
    EmbedConfig {
        base_table: table(EXP_2_3_R),
        seeds: seeds
            .iter()
            .map(|s| s.parse().unwrap_or_else(|e| panic!("bad seed {s:?}: {e}")))
            .collect(),
        stride,
        gran,
        base: 2,
        rename: symbols("ABCDEFGH"),
    }
}
