// Persisted previous-sample file. One file per monitored host; each save
// replaces the whole file (write to a temp file in the same dir, then rename).
//
// Callers must not run two checks for the same host concurrently: the file
// is read once at cycle start and written once at the end, without locking.

mod blob;

use crate::error::{CheckError, Result};
use crate::models::{Sample, SampleCollection};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::instrument;
use wincode::{SchemaRead, SchemaWrite};

#[derive(Debug, Clone, PartialEq, Eq, SchemaRead, SchemaWrite)]
struct SampleFile {
    host: String,
    saved_at: u64,
    samples: Vec<Sample>,
}

pub struct SampleStore {
    path: PathBuf,
}

impl SampleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/<host>.samples`, with path separators in the host label replaced.
    pub fn for_host(dir: impl AsRef<Path>, host: &str) -> Self {
        let file = format!("{}.samples", host.replace(['/', '\\'], "_"));
        Self::new(dir.as_ref().join(file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when there is no file yet (first run).
    #[instrument(skip(self), fields(store = "samples", operation = "load", path = %self.path.display()))]
    pub fn load(&self) -> Result<Option<SampleCollection>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no previous sample file");
                return Ok(None);
            }
            Err(e) => return Err(CheckError::storage(&self.path, e)),
        };
        let payload = blob::versioned_payload(&bytes, blob::FILE_VERSION).ok_or_else(|| {
            CheckError::storage(
                &self.path,
                format!(
                    "unsupported sample file version {}",
                    blob::file_version(&bytes)
                ),
            )
        })?;
        let file: SampleFile = wincode::deserialize(payload)
            .map_err(|e| CheckError::storage(&self.path, format!("wincode deserialize: {}", e)))?;

        let mut samples = SampleCollection::new();
        for sample in file.samples {
            if samples.insert(sample.index, sample).is_some() {
                return Err(CheckError::storage(
                    &self.path,
                    "duplicate interface index in sample file",
                ));
            }
        }
        tracing::debug!(host = %file.host, samples_count = samples.len(), "previous samples loaded");
        Ok(Some(samples))
    }

    #[instrument(skip(self, samples), fields(store = "samples", operation = "save", samples_count = samples.len()))]
    pub fn save(&self, host: &str, samples: &SampleCollection) -> Result<()> {
        let file = SampleFile {
            host: host.to_string(),
            saved_at: now_secs(),
            samples: samples.values().cloned().collect(),
        };
        let payload = wincode::serialize(&file)
            .map_err(|e| CheckError::storage(&self.path, format!("wincode serialize: {}", e)))?;
        let bytes = blob::with_version_prefix(blob::FILE_VERSION, payload);

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| CheckError::storage(&dir, e))?;
        let mut tmp =
            tempfile::NamedTempFile::new_in(&dir).map_err(|e| CheckError::storage(&dir, e))?;
        tmp.write_all(&bytes)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| CheckError::storage(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| CheckError::storage(&self.path, e.error))?;
        Ok(())
    }
}

pub(crate) fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}
