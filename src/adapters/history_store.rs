use crate::domain::model::HistoryEntry;
use crate::domain::ports::HistoryStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

pub const DEFAULT_HISTORY_DIR: &str = ".history";

const FILE_PREFIX: &str = "history_";
const FILE_SUFFIX: &str = ".jsonl";

/// One JSON object per line, one file per calendar day.
#[derive(Debug, Clone)]
pub struct JsonlHistoryStore {
    dir: PathBuf,
}

impl JsonlHistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File an entry is appended to, named after the entry's local date.
    pub fn file_for(&self, entry: &HistoryEntry) -> PathBuf {
        self.dir.join(format!(
            "{}{}{}",
            FILE_PREFIX,
            entry.timestamp.format("%Y%m%d"),
            FILE_SUFFIX
        ))
    }

    async fn history_files(&self) -> Result<Vec<PathBuf>> {
        let mut reader = match fs::read_dir(&self.dir).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("History folder {} does not exist yet", self.dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(item) = reader.next_entry().await? {
            let name = item.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX) {
                files.push(item.path());
            }
        }
        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl HistoryStore for JsonlHistoryStore {
    async fn append(&self, entry: &HistoryEntry) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;

        let path = self.file_for(entry);
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!("Appended history entry to {}", path.display());
        Ok(())
    }

    async fn load(&self) -> Result<Vec<HistoryEntry>> {
        let mut entries = Vec::new();

        for path in self.history_files().await? {
            // Lines that are not UTF-8 count as malformed.
            let content = fs::read(&path).await?;
            for (idx, line) in content.split(|b| *b == b'\n').enumerate() {
                if line.trim_ascii().is_empty() {
                    continue;
                }
                match serde_json::from_slice::<HistoryEntry>(line) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => tracing::warn!(
                        "Skipping malformed line {} in {}: {}",
                        idx + 1,
                        path.display(),
                        e
                    ),
                }
            }
        }

        tracing::debug!("Loaded {} history entries from {}", entries.len(), self.dir.display());
        Ok(entries)
    }
}
