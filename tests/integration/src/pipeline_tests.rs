//! Cross-driver flows: configuration files, searches, verification and simulation.

use fssp_core::{
    Embedder, ExpRingSearch, RingSearch, RunConfig, Segment, TraceOutcome, Verification,
    simulate_ring,
};
use fssp_fs::ConfigStore;
use fssp_test_utils::fixtures::{EXP_2_3_R, embed_config, exp_ring_config, ring_config, table};
use fssp_test_utils::workspace::TestDir;
use pretty_assertions::assert_eq;

#[test]
fn renormalizing_search_result_embeds() {
    let found: Vec<_> = ExpRingSearch::new(&exp_ring_config(2, 3, 2, "R")).unwrap().collect();
    assert_eq!(found, vec![table(EXP_2_3_R)]);

    let mut config = embed_config(&["RQQQ"], 1, 1);
    config.base_table = found[0].clone();
    let Verification::Embedded(embedding) = Embedder::new(&config).unwrap().verify().unwrap() else {
        panic!("search result should embed");
    };
    assert_eq!(embedding.table, table("{'AQQQ': 'A', 'QQQQ': 'Q'}"));
}

#[test]
fn found_table_synchronizes_its_ring() {
    let found: Vec<_> = ExpRingSearch::new(&exp_ring_config(2, 2, 2, "RS")).unwrap().collect();
    assert_eq!(found.len(), 1);
    assert!(found[0].uses_all("RS".chars().map(|c| fssp_core::Symbol::new(c).unwrap())));

    let trace = simulate_ring(&found[0], &"RQ".parse().unwrap(), 10);
    let configurations: Vec<String> = trace.configurations.iter().map(Segment::to_string).collect();
    assert_eq!(configurations, vec!["RQ", "SS", "FF"]);
    assert_eq!(trace.outcome, TraceOutcome::Fired { step: 2 });
    assert!(trace.synchronized());
}

#[test]
fn ring_solutions_fire_every_length_on_replay() {
    let config = ring_config(&[2, 4]);
    for found in RingSearch::start(&config).unwrap().take(5) {
        for cfg in ["GQ", "GQQQ"] {
            let trace = simulate_ring(&found, &cfg.parse().unwrap(), 100);
            assert!(trace.synchronized(), "{cfg} under {found}: {:?}", trace.outcome);
        }
    }
}

#[test]
fn saved_config_runs_the_same_search() {
    let dir = TestDir::new();
    let mut ring = ring_config(&[2]);
    ring.time_optimal = true;
    let config = RunConfig::Ring(ring);

    for file in ["run.toml", "run.json", "run.yaml"] {
        let path = dir.path(file);
        ConfigStore::new().save(&path, &config).unwrap();
        let loaded: RunConfig = ConfigStore::new().load(&path).unwrap();
        assert_eq!(loaded, config, "{file}");

        let RunConfig::Ring(ring) = loaded else {
            panic!("mode lost in {file}");
        };
        assert_eq!(RingSearch::start(&ring).unwrap().count(), 6, "{file}");
    }
}
