use fssp_core::{ResultSink, RuleTable, RunParams};
use fssp_fs::{Error, INIT_TABLE_KEY, RecordFile, load_records, record_path};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

fn table(literal: &str) -> RuleTable {
    literal.parse().unwrap()
}

fn params(init: &RuleTable) -> RunParams {
    RunParams::new("ring_len2_4_QGA")
        .with("lengths", "[2, 4]")
        .with_text("states", "QGA")
        .with(INIT_TABLE_KEY, init)
}

#[test]
fn complete_run_reads_back() {
    let temp = TempDir::new().unwrap();
    let path = record_path(temp.path(), "ring_len2_4_QGA", 1);
    let init = RuleTable::quiescent(3);
    let tables = vec![
        table("{'AQA': 'F', 'GQQ': 'A', 'QQQ': 'Q'}"),
        table("{'GQG': 'F', 'QGQ': 'F', 'QQQ': 'Q'}"),
    ];

    let mut sink = RecordFile::create(&path).unwrap();
    sink.begin(&params(&init)).unwrap();
    let ids: Vec<u64> = tables.iter().map(|t| sink.accept(t).unwrap()).collect();
    sink.end().unwrap();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(sink.accepted(), 2);

    let log = load_records(&path).unwrap();
    assert!(log.complete);
    assert_eq!(log.name(), "ring_len2_4_QGA");
    assert_eq!(log.params.get("states"), Some("'QGA'"));
    assert_eq!(log.params.get("lengths"), Some("[2, 4]"));
    assert_eq!(log.init_table().unwrap(), Some(init));
    assert_eq!(log.tables, tables);
}

#[test]
fn each_table_is_on_disk_when_accept_returns() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("run.txt");
    let mut sink = RecordFile::create(&path).unwrap();
    sink.begin(&params(&RuleTable::quiescent(3))).unwrap();

    for n in 1..=3 {
        sink.accept(&RuleTable::quiescent(3)).unwrap();
        let log = load_records(&path).unwrap();
        assert_eq!(log.tables.len(), n);
        assert!(!log.complete);
    }
}

#[test]
fn concurrent_writer_is_refused() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("run.txt");
    let mut sink = RecordFile::create(&path).unwrap();
    sink.begin(&params(&RuleTable::quiescent(3))).unwrap();

    let err = RecordFile::create(&path).unwrap_err();
    assert!(matches!(err, Error::LockFailed { .. }));
    assert!(fs::read_to_string(&path).unwrap().contains("rulesets=["));
}

#[test]
fn end_closes_the_sink() {
    let temp = TempDir::new().unwrap();
    let mut sink = RecordFile::create(temp.path().join("run.txt")).unwrap();
    sink.begin(&params(&RuleTable::quiescent(3))).unwrap();
    sink.end().unwrap();
    let err = sink.accept(&RuleTable::quiescent(3)).unwrap_err();
    assert!(matches!(err, Error::SinkState { state: "closed", .. }));
}

#[test]
fn bad_init_table_surfaces_as_core_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("run.txt");
    fs::write(
        &path,
        "run = dict(\ninit_ruleset={'QQQ': 'Q', 'QQ': 'Q'},\nrulesets=[\n]\n)\n",
    )
    .unwrap();
    let log = load_records(&path).unwrap();
    assert!(log.complete);
    assert!(matches!(log.init_table(), Err(Error::Core(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn recorded_tables_survive_reload(
        images in proptest::collection::vec(
            proptest::sample::select(vec!['Q', 'G', 'A', 'F']),
            1..6,
        )
    ) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("run.txt");
        let windows = ["AAA", "AQG", "GGQ", "QGA", "QQG", "QQQ"];
        let literal: Vec<String> = windows
            .iter()
            .zip(&images)
            .map(|(w, s)| format!("'{w}': '{s}'"))
            .collect();
        let recorded = table(&format!("{{{}}}", literal.join(", ")));

        let mut sink = RecordFile::create(&path).unwrap();
        sink.begin(&RunParams::new("prop")).unwrap();
        sink.accept(&recorded).unwrap();
        sink.end().unwrap();

        let log = load_records(&path).unwrap();
        prop_assert_eq!(log.tables, vec![recorded]);
    }
}
