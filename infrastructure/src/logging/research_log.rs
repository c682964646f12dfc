//! JSONL writer for research events.
//!
//! Each [`ResearchEvent`] becomes one JSON line carrying its payload plus
//! `type` and `timestamp`. The file is opened in append mode so a log can
//! span several sessions.

use scholia_application::{ResearchEvent, ResearchLogger};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Research trail writer, one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every event and on `Drop`.
pub struct JsonlResearchLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlResearchLogger {
    /// Open (or create) the log at `path`, creating parent directories.
    ///
    /// Returns `None` if the file cannot be opened; research then runs
    /// without a trail.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create research log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open research log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: ResearchEvent) -> serde_json::Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        match event.payload {
            serde_json::Value::Object(mut map) => {
                map.insert("type".to_string(), event.event_type.into());
                map.insert("timestamp".to_string(), timestamp.into());
                serde_json::Value::Object(map)
            }
            other => serde_json::json!({
                "type": event.event_type,
                "timestamp": timestamp,
                "data": other,
            }),
        }
    }
}

impl ResearchLogger for JsonlResearchLogger {
    fn log(&self, event: ResearchEvent) {
        let Ok(line) = serde_json::to_string(&Self::record(event)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
                warn!("Research log write failed: {}", e);
            }
        }
    }
}

impl Drop for JsonlResearchLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_events_become_typed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("research.jsonl");
        let logger = JsonlResearchLogger::open(&path).unwrap();

        logger.log(ResearchEvent::new(
            "queries_planned",
            serde_json::json!({ "iteration": 1, "queries": [{"query": "virtue"}] }),
        ));
        logger.log(ResearchEvent::new(
            "assessment",
            serde_json::json!({ "satisfied": false, "feedback": "More Kant" }),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "queries_planned");
        assert_eq!(lines[0]["queries"][0]["query"], "virtue");
        assert_eq!(lines[1]["type"], "assessment");
        assert_eq!(lines[1]["feedback"], "More Kant");
        assert!(lines.iter().all(|l| l["timestamp"].is_string()));
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("research.jsonl");

        for _ in 0..2 {
            let logger = JsonlResearchLogger::open(&path).unwrap();
            logger.log(ResearchEvent::new("response_composed", serde_json::json!({})));
        }

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("research.jsonl");
        let logger = JsonlResearchLogger::open(&path).unwrap();

        logger.log(ResearchEvent::new("note", serde_json::json!("plain")));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "note");
        assert_eq!(lines[0]["data"], "plain");
    }
}
