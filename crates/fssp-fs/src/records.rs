//! Record files: the durable log of a search run
//!
//! A record file names the run, lists its parameters and then one rule table
//! literal per line, in discovery order:
//!
//! ```text
//! base2_null2_init_len2_RS = dict(
//! base=2,
//! null=2,
//! init_len=2,
//! working='RS',
//! init_ruleset={'QQQ': 'Q'},
//! rulesets=[
//! {'QQQ': 'Q', 'QQR': 'R', ...},
//! ]
//! )
//! ```
//!
//! Every table line is synced before the search continues, so a run killed
//! at any point leaves a file that [`load_records`] still reads: only the
//! closing `]` and `)` are missing.

use std::fs::File;
use std::path::{Path, PathBuf};

use fssp_core::{ResultSink, RuleTable, RunParams};

use crate::{Error, Result, io};

const HEADER_SUFFIX: &str = " = dict(";
const TABLES_OPEN: &str = "rulesets=[";
const TABLES_CLOSE: &str = "]";
const TRAILER: &str = ")";

/// Key under which the seed table of a run is recorded.
pub const INIT_TABLE_KEY: &str = "init_ruleset";

/// Default location of a run's record file: `<dir>/<name>_<id>.txt`.
pub fn record_path(dir: &Path, name: &str, id: u32) -> PathBuf {
    dir.join(format!("{name}_{id}.txt"))
}

/// The first `record_path` in `dir` that does not exist yet, counting from 1.
pub fn next_record_path(dir: &Path, name: &str) -> PathBuf {
    (1..)
        .map(|id| record_path(dir, name, id))
        .find(|path| !path.exists())
        .unwrap_or_else(|| record_path(dir, name, 0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    Created,
    Open,
    Closed,
}

/// [`ResultSink`] writing a record file.
///
/// The file is locked for the lifetime of the sink; a second writer on the
/// same path fails with [`Error::LockFailed`].
#[derive(Debug)]
pub struct RecordFile {
    path: PathBuf,
    file: File,
    accepted: u64,
    state: SinkState,
}

impl RecordFile {
    /// Create (or truncate) the record file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or is locked by
    /// another writer.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = io::create_locked(&path)?;
        tracing::debug!(path = %path.display(), "record file created");
        Ok(Self {
            path,
            file,
            accepted: 0,
            state: SinkState::Created,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tables accepted so far.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    fn expect_state(&self, expected: SinkState) -> Result<()> {
        if self.state == expected {
            return Ok(());
        }
        let state = match self.state {
            SinkState::Created => "not started",
            SinkState::Open => "already started",
            SinkState::Closed => "closed",
        };
        Err(Error::SinkState {
            path: self.path.clone(),
            state,
        })
    }

    fn write(&mut self, content: &str) -> Result<()> {
        io::append_synced(&mut self.file, &self.path, content.as_bytes())
    }
}

impl ResultSink for RecordFile {
    type Error = Error;

    fn begin(&mut self, params: &RunParams) -> Result<()> {
        self.expect_state(SinkState::Created)?;
        let mut header = format!("{}{HEADER_SUFFIX}\n", params.name());
        for (key, value) in params.entries() {
            header.push_str(&format!("{key}={value},\n"));
        }
        header.push_str(&format!("started='{}',\n", chrono::Utc::now().to_rfc3339()));
        header.push_str(TABLES_OPEN);
        header.push('\n');
        self.write(&header)?;
        self.state = SinkState::Open;
        Ok(())
    }

    fn accept(&mut self, table: &RuleTable) -> Result<u64> {
        self.expect_state(SinkState::Open)?;
        self.write(&format!("{table},\n"))?;
        self.accepted += 1;
        tracing::debug!(id = self.accepted, path = %self.path.display(), "table recorded");
        Ok(self.accepted)
    }

    fn end(&mut self) -> Result<()> {
        self.expect_state(SinkState::Open)?;
        self.write(&format!("{TABLES_CLOSE}\n{TRAILER}\n"))?;
        self.state = SinkState::Closed;
        Ok(())
    }
}

/// A record file read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLog {
    pub params: RunParams,
    pub tables: Vec<RuleTable>,
    /// False when the run was interrupted before its trailer was written.
    pub complete: bool,
}

impl RecordLog {
    pub fn name(&self) -> &str {
        self.params.name()
    }

    /// The seed table the run started from, if it was recorded.
    pub fn init_table(&self) -> Result<Option<RuleTable>> {
        match self.params.get(INIT_TABLE_KEY) {
            Some(literal) => Ok(Some(literal.parse()?)),
            None => Ok(None),
        }
    }
}

/// Read a record file written by [`RecordFile`].
///
/// A file cut short by an interrupted run is accepted: the tables written so
/// far are returned with [`RecordLog::complete`] unset. A trailing line
/// without its newline was never synced as a whole and is dropped.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a record file.
pub fn load_records(path: &Path) -> Result<RecordLog> {
    let content = io::read_text(path)?;
    let malformed = |line: usize, message: String| Error::RecordFormat {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut lines: Vec<&str> = content.split('\n').collect();
    // Everything after the last newline is either empty or a torn write.
    if let Some(torn) = lines.pop().filter(|l| !l.is_empty()) {
        tracing::warn!(path = %path.display(), line = torn, "dropping partially written line");
    }
    let mut lines = lines.into_iter().enumerate().map(|(i, l)| (i + 1, l.trim_end_matches('\r')));

    let (_, first) = lines
        .next()
        .ok_or_else(|| malformed(1, "file is empty".to_string()))?;
    let name = first
        .strip_suffix(HEADER_SUFFIX)
        .ok_or_else(|| malformed(1, format!("expected '<name>{HEADER_SUFFIX}'")))?;
    let mut params = RunParams::new(name);

    let mut tables_started = false;
    for (number, line) in lines.by_ref() {
        if line == TABLES_OPEN {
            tables_started = true;
            break;
        }
        let entry = line.strip_suffix(',').unwrap_or(line);
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| malformed(number, format!("expected 'key=value', got {line:?}")))?;
        params = params.with(key.trim(), value.trim());
    }

    let mut tables = Vec::new();
    let mut complete = false;
    if tables_started {
        for (number, line) in lines.by_ref() {
            if line == TABLES_CLOSE {
                complete = true;
                break;
            }
            let literal = line.strip_suffix(',').unwrap_or(line);
            let table: RuleTable = literal
                .parse()
                .map_err(|e: fssp_core::Error| malformed(number, e.to_string()))?;
            tables.push(table);
        }
    }
    if complete {
        match lines.next() {
            Some((_, TRAILER)) => {}
            Some((number, line)) => {
                return Err(malformed(number, format!("expected ')', got {line:?}")));
            }
            None => complete = false,
        }
    }

    if !complete {
        tracing::warn!(
            path = %path.display(),
            tables = tables.len(),
            "record file has no trailer; the run was interrupted"
        );
    }
    Ok(RecordLog {
        params,
        tables,
        complete,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn params() -> RunParams {
        RunParams::new("base2_null2_init_len2_RS")
            .with("base", 2)
            .with_text("working", "RS")
            .with(INIT_TABLE_KEY, RuleTable::quiescent(3))
    }

    #[test]
    fn header_lists_parameters_in_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("run.txt");
        let mut sink = RecordFile::create(&path).unwrap();
        sink.begin(&params()).unwrap();
        sink.end().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "base2_null2_init_len2_RS = dict(");
        assert_eq!(lines[1], "base=2,");
        assert_eq!(lines[2], "working='RS',");
        assert_eq!(lines[3], "init_ruleset={'QQQ': 'Q'},");
        assert!(lines[4].starts_with("started='"));
        assert_eq!(&lines[5..], &["rulesets=[", "]", ")"]);
    }

    #[test]
    fn accept_requires_begin() {
        let temp = TempDir::new().unwrap();
        let mut sink = RecordFile::create(temp.path().join("run.txt")).unwrap();
        let err = sink.accept(&RuleTable::quiescent(3)).unwrap_err();
        assert!(matches!(err, Error::SinkState { state: "not started", .. }));
        sink.begin(&params()).unwrap();
        assert!(sink.begin(&params()).is_err());
    }

    #[test]
    fn missing_trailer_is_tolerated() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("run.txt");
        let mut sink = RecordFile::create(&path).unwrap();
        sink.begin(&params()).unwrap();
        sink.accept(&"{'GQQ': 'A', 'QQQ': 'Q'}".parse().unwrap()).unwrap();
        drop(sink);

        let log = load_records(&path).unwrap();
        assert!(!log.complete);
        assert_eq!(log.tables.len(), 1);
    }

    #[test]
    fn torn_last_line_is_dropped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("run.txt");
        fs::write(&path, "run = dict(\nrulesets=[\n{'QQQ': 'Q'},\n{'QQQ': ").unwrap();
        let log = load_records(&path).unwrap();
        assert_eq!(log.tables, vec![RuleTable::quiescent(3)]);
        assert_eq!(log.name(), "run");
        assert!(!log.complete);
    }

    #[test]
    fn garbage_is_rejected_with_line_number() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("run.txt");
        fs::write(&path, "run = dict(\nrulesets=[\n{'QQQ': 'Q'},\nnot a table,\n").unwrap();
        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, Error::RecordFormat { line: 4, .. }), "got {err:?}");

        fs::write(&path, "hello\n").unwrap();
        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, Error::RecordFormat { line: 1, .. }));
    }

    #[test]
    fn next_record_path_skips_existing_ids() {
        let temp = TempDir::new().unwrap();
        fs::write(record_path(temp.path(), "run", 1), "").unwrap();
        assert_eq!(next_record_path(temp.path(), "run"), temp.path().join("run_2.txt"));
    }
}
