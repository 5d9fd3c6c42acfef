//! Mutation journal: an append-only record of every mutation, written
//! under the registry lock. A mutation stream is monotonic, so a plain
//! `OpenOptions::append` handle is enough — there is never a partial
//! record to roll back to.

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Serialize)]
pub struct MutationRecord {
    pub when: u64,
    pub action: String,
    pub person_guid: String,
    pub machine_guid: String,
    pub url: String,
    pub extra: String,
}

/// Invoked under the registry lock after a mutation commits. Must not
/// block for long — it runs inside the single coarse-grained critical
/// section.
pub trait MutationSink: Send + Sync {
    fn record(&self, record: &MutationRecord);
}

/// Default sink: discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl MutationSink for NullSink {
    fn record(&self, _record: &MutationRecord) {}
}

/// Appends one JSON line per mutation to a file, creating parent
/// directories as needed. I/O errors are logged, not propagated — a
/// journaling failure must never unwind a request that otherwise
/// succeeded.
pub struct JsonlFileSink {
    path: PathBuf,
    file: Mutex<std::fs::File>,
}

impl JsonlFileSink {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }
}

impl MutationSink for JsonlFileSink {
    fn record(&self, record: &MutationRecord) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "failed to encode mutation record");
                return;
            }
        };

        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "mutation sink mutex poisoned");
                return;
            }
        };

        if let Err(err) = writeln!(file, "{line}") {
            tracing::warn!(path = %self.path.display(), %err, "failed to append mutation record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn null_sink_discards_records() {
        let sink = NullSink;
        sink.record(&MutationRecord {
            when: 1,
            action: "access".into(),
            person_guid: "p".into(),
            machine_guid: "m".into(),
            url: "http://a/".into(),
            extra: String::new(),
        });
    }

    #[test]
    fn jsonl_sink_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mutations.jsonl");
        let sink = JsonlFileSink::open(&path).unwrap();

        sink.record(&MutationRecord {
            when: 1000,
            action: "access".into(),
            person_guid: "p1".into(),
            machine_guid: "m1".into(),
            url: "http://a/".into(),
            extra: String::new(),
        });
        sink.record(&MutationRecord {
            when: 2000,
            action: "delete".into(),
            person_guid: "p1".into(),
            machine_guid: "m1".into(),
            url: "http://a/".into(),
            extra: String::new(),
        });

        let mut contents = String::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.lines().next().unwrap().contains("\"action\":\"access\""));
    }

    #[test]
    fn jsonl_sink_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("mutations.jsonl");
        let sink = JsonlFileSink::open(&path).unwrap();
        sink.record(&MutationRecord {
            when: 1,
            action: "access".into(),
            person_guid: "p".into(),
            machine_guid: "m".into(),
            url: "http://a/".into(),
            extra: String::new(),
        });
        assert!(path.exists());
    }
}
