//! Where finished sessions record their score.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct ScoreRecord {
    pub player_name: String,
    pub total_earnings: f64,
}

impl ScoreRecord {
    /// `name,earnings`, one record per line.
    pub fn to_line(&self) -> String {
        format!("{},{:.2}", self.player_name, self.total_earnings)
    }
}

pub trait ScoreSink {
    fn record(&mut self, score: &ScoreRecord) -> io::Result<()>;
}

/// Appends to a scores file, creating it on first use.
#[derive(Clone, Debug)]
pub struct FileScoreSink {
    path: PathBuf,
}

impl FileScoreSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileScoreSink { path: path.into() }
    }
}

impl ScoreSink for FileScoreSink {
    fn record(&mut self, score: &ScoreRecord) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", score.to_line())
    }
}

/// Keeps records in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryScoreSink {
    pub records: Vec<ScoreRecord>,
}

impl ScoreSink for MemoryScoreSink {
    fn record(&mut self, score: &ScoreRecord) -> io::Result<()> {
        self.records.push(score.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_appends_lines() {
        let path = std::env::temp_dir().join(format!("shadow_taxi_scores_{}.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let mut sink = FileScoreSink::new(&path);
        sink.record(&ScoreRecord { player_name: "ana".into(), total_earnings: 46.0 }).unwrap();
        sink.record(&ScoreRecord { player_name: "bo".into(), total_earnings: 12.5 }).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "ana,46.00\nbo,12.50\n");
        let _ = std::fs::remove_file(&path);
    }
}
