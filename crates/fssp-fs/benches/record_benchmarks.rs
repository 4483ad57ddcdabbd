use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fssp_core::{ResultSink, RuleTable, RunParams};
use fssp_fs::{RecordFile, load_records};
use tempfile::tempdir;

fn table() -> RuleTable {
    "{'AQA': 'F', 'AQQ': 'Q', 'GAQ': 'Q', 'GGQ': 'G', 'GQG': 'Q', 'GQQ': 'Q', \
     'QAQ': 'F', 'QGA': 'G', 'QGG': 'Q', 'QGQ': 'A', 'QQG': 'G', 'QQQ': 'Q'}"
        .parse()
        .unwrap()
}

fn accept_benchmark(c: &mut Criterion) {
    c.bench_function("RecordFile::accept (synced)", |b| {
        let dir = tempdir().unwrap();
        let mut sink = RecordFile::create(dir.path().join("bench.txt")).unwrap();
        sink.begin(&RunParams::new("bench")).unwrap();
        let table = table();

        b.iter(|| sink.accept(black_box(&table)).unwrap())
    });
}

fn load_benchmark(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bench.txt");
    let mut sink = RecordFile::create(&path).unwrap();
    sink.begin(&RunParams::new("bench")).unwrap();
    for _ in 0..200 {
        sink.accept(&table()).unwrap();
    }
    sink.end().unwrap();

    c.bench_function("load_records (200 tables)", |b| {
        b.iter(|| load_records(black_box(&path)).unwrap().tables.len())
    });
}

criterion_group!(benches, accept_benchmark, load_benchmark);
criterion_main!(benches);
