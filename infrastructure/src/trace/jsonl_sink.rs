//! JSONL file writer for transition events.
//!
//! Each [`TransitionEvent`] is serialized as a single JSON line and
//! appended via a buffered writer. Thread-safe through a `Mutex`;
//! flushed per event so a crash loses at most the line being written.

use council_application::{TransitionEvent, TransitionSink};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Transition sink appending one JSON object per line.
pub struct JsonlTransitionSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTransitionSink {
    /// Open (or create) the trace file, creating parent directories.
    ///
    /// Returns `None` when the file cannot be opened; tracing is never
    /// worth failing a run over.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create trace directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open trace file {}: {}", path.display(), e);
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
}

impl TransitionSink for JsonlTransitionSink {
    fn record(&self, event: &TransitionEvent) {
        let Ok(line) = serde_json::to_string(event) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlTransitionSink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::WorkflowStage;

    #[test]
    fn writes_one_parseable_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace").join("transitions.jsonl");
        let sink = JsonlTransitionSink::open(&path).unwrap();

        sink.record(&TransitionEvent::now(
            "run-1",
            WorkflowStage::Sanitizing,
            WorkflowStage::Parsing,
            0,
        ));
        sink.record(&TransitionEvent::now(
            "run-1",
            WorkflowStage::Parsing,
            WorkflowStage::Analyzing,
            0,
        ));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: TransitionEvent = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.to_stage, WorkflowStage::Parsing);
    }

    #[test]
    fn reopening_appends_instead_of_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transitions.jsonl");

        for _ in 0..2 {
            let sink = JsonlTransitionSink::open(&path).unwrap();
            sink.record(&TransitionEvent::now(
                "run-1",
                WorkflowStage::Sanitizing,
                WorkflowStage::Parsing,
                0,
            ));
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
