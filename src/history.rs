//! Append-only detection history kept as a small CSV file.

use crate::error::{FryCountError, Result};
use chrono::{Local, NaiveDateTime, Timelike};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_HISTORY_PATH: &str = "detection_results/lele_detection_history.csv";
pub const HEADER: &str = "ID,Timestamp,Detected Lele Count";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One logged detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: u64,
    pub timestamp: NaiveDateTime,
    pub count: usize,
}

impl HistoryEntry {
    fn to_csv_row(&self) -> String {
        format!("{},{},{}", self.id, self.timestamp.format(TIMESTAMP_FORMAT), self.count)
    }

    fn parse(line: &str, line_no: usize) -> Result<Self> {
        let bad = |what: &str| FryCountError::History(format!("line {}: {}: {:?}", line_no, what, line));

        let mut fields = line.split(',');
        let (Some(id), Some(ts), Some(count), None) = (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(bad("expected 3 fields"));
        };

        Ok(Self {
            id: id.trim().parse().map_err(|_| bad("bad ID"))?,
            timestamp: NaiveDateTime::parse_from_str(ts.trim(), TIMESTAMP_FORMAT).map_err(|_| bad("bad timestamp"))?,
            count: count.trim().parse().map_err(|_| bad("bad count"))?,
        })
    }
}

/// Handle on a history file. The file is created lazily on first append.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_PATH)
    }
}

impl HistoryLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows in file order. A missing file is an empty history.
    pub fn read(&self) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.path)?;
        let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

        match lines.next() {
            Some((_, header)) if header.trim() == HEADER => {}
            Some((i, _)) => {
                return Err(FryCountError::History(format!(
                    "line {}: unexpected header in {}",
                    i + 1,
                    self.path.display()
                )))
            }
            None => return Ok(Vec::new()),
        }

        lines.map(|(i, line)| HistoryEntry::parse(line, i + 1)).collect()
    }

    /// Log `count` stamped with the current local time.
    pub fn append(&self, count: usize) -> Result<HistoryEntry> {
        self.append_at(count, Local::now().naive_local())
    }

    /// Log `count` with an explicit timestamp. IDs start at 1 and follow
    /// the last logged ID.
    pub fn append_at(&self, count: usize, timestamp: NaiveDateTime) -> Result<HistoryEntry> {
        let existing = self.read()?;
        let id = existing.last().map(|e| e.id + 1).unwrap_or(1);
        let entry = HistoryEntry {
            id,
            // the file keeps whole seconds only
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            count,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let needs_header = existing.is_empty() && std::fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        if needs_header {
            writeln!(file, "{}", HEADER)?;
        }
        writeln!(file, "{}", entry.to_csv_row())?;

        log::info!("History #{}: {} fry -> {}", entry.id, entry.count, self.path.display());
        Ok(entry)
    }
}
