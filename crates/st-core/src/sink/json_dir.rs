//! JSON directory sink: one file per artifact.

use std::fs;
use std::path::{Path, PathBuf};

use st_common::{Error, Result};
use tracing::debug;

use super::{Artifact, ResultSink};

/// Writes each artifact as `<name>.json` into a directory.
///
/// Writes are idempotent: re-saving an artifact name overwrites the file.
pub struct JsonDirSink {
    dir: PathBuf,
}

impl JsonDirSink {
    /// Create the sink, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ResultSink for JsonDirSink {
    fn save(&mut self, name: &str, artifact: &Artifact<'_>) -> Result<()> {
        let path = self.dir.join(format!("{name}.json"));
        let payload = serde_json::to_string_pretty(&artifact.to_json()).map_err(|e| {
            Error::Sink {
                artifact: name.to_string(),
                message: e.to_string(),
            }
        })?;
        fs::write(&path, payload).map_err(|e| Error::Sink {
            artifact: name.to_string(),
            message: format!("write {}: {e}", path.display()),
        })?;
        debug!(artifact = name, path = %path.display(), "artifact persisted");
        Ok(())
    }
}
