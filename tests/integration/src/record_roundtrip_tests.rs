//! Searches written through a record file and read back.

use std::fmt::Debug;

use fssp_core::{ResultSink, RingSearch, RuleTable, RunParams};
use fssp_fs::{RecordFile, load_records, record_path};
use fssp_test_utils::fixtures::{RING_2_4_QGA, ring_config, table};
use fssp_test_utils::sink::MemorySink;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn drain<S>(tables: impl Iterator<Item = RuleTable>, params: &RunParams, sink: &mut S) -> u64
where
    S: ResultSink,
    S::Error: Debug,
{
    sink.begin(params).unwrap();
    let mut last = 0;
    for table in tables {
        last = sink.accept(&table).unwrap();
    }
    sink.end().unwrap();
    last
}

#[test]
fn record_file_matches_memory_sink() {
    let temp = TempDir::new().unwrap();
    let config = ring_config(&[2]);
    let params = config.params();

    let mut memory = MemorySink::new();
    assert_eq!(drain(RingSearch::start(&config).unwrap(), &params, &mut memory), 64);

    let path = record_path(temp.path(), params.name(), 1);
    let mut file = RecordFile::create(&path).unwrap();
    assert_eq!(drain(RingSearch::start(&config).unwrap(), &params, &mut file), 64);
    drop(file);

    let log = load_records(&path).unwrap();
    assert!(log.complete);
    assert_eq!(log.name(), "ring_len2_QGA");
    assert_eq!(log.params.get("lengths"), Some("[2]"));
    assert_eq!(log.tables, memory.tables);
}

#[test]
fn interrupted_run_keeps_accepted_tables() {
    let temp = TempDir::new().unwrap();
    let config = ring_config(&[2, 4]);
    let path = temp.path().join("interrupted.txt");

    let mut sink = RecordFile::create(&path).unwrap();
    sink.begin(&config.params()).unwrap();
    let mut search = RingSearch::start(&config).unwrap();
    let first = search.next().unwrap();
    sink.accept(&first).unwrap();
    // Killed before end().
    drop(sink);

    let log = load_records(&path).unwrap();
    assert!(!log.complete);
    assert_eq!(log.tables, vec![first]);
    assert_eq!(log.tables[0], table(RING_2_4_QGA));
}

#[test]
fn recorded_seed_resumes_the_search() {
    let temp = TempDir::new().unwrap();
    let mut config = ring_config(&[2, 4]);
    config.init_table = Some(table(RING_2_4_QGA));

    let path = temp.path().join("seeded.txt");
    let mut sink = RecordFile::create(&path).unwrap();
    drain(RingSearch::start(&config).unwrap(), &config.params(), &mut sink);
    drop(sink);

    let log = load_records(&path).unwrap();
    let seed = log.init_table().unwrap();
    assert_eq!(seed, Some(table(RING_2_4_QGA)));

    // A seed already synchronizing every length leaves nothing to choose.
    let mut resumed = ring_config(&[2, 4]);
    resumed.init_table = seed;
    let mut search = RingSearch::start(&resumed).unwrap();
    let tables: Vec<RuleTable> = search.by_ref().collect();
    assert_eq!(tables, vec![table(RING_2_4_QGA)]);
    assert_eq!(search.stats().branch_points, 0);
    assert_eq!(log.tables, tables);
}

#[test]
fn second_writer_is_locked_out() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("locked.txt");
    let _first = RecordFile::create(&path).unwrap();
    assert!(matches!(RecordFile::create(&path), Err(fssp_fs::Error::LockFailed { .. })));
}
