use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{Artifact, Source};
use crate::error::GenomeError;
use crate::fs_util;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    pub artifact: Option<Artifact>,
    pub url: String,
    pub path: Utf8PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub source: Source,
    pub organism: String,
    pub build: String,
    pub release: String,
    pub base_url: String,
    pub decompress: bool,
    pub files: Vec<ManifestFile>,
    pub tx2gene: Option<Utf8PathBuf>,
    pub downloaded_at: String,
    pub tool: String,
}

impl Manifest {
    pub fn stamp() -> (String, String) {
        (
            Utc::now().to_rfc3339(),
            format!("genome-downloader/{}", env!("CARGO_PKG_VERSION")),
        )
    }

    pub fn write(&self, output_dir: &Utf8Path) -> Result<Utf8PathBuf, GenomeError> {
        let path = output_dir.join(MANIFEST_FILE);
        let content = serde_json::to_vec_pretty(self)
            .map_err(|err| GenomeError::Filesystem(err.to_string()))?;
        fs_util::write_bytes_atomic(&path, &content)?;
        Ok(path)
    }

    pub fn read(output_dir: &Utf8Path) -> Result<Self, GenomeError> {
        let path = output_dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(path.as_std_path())
            .map_err(|err| GenomeError::Filesystem(format!("read {path}: {err}")))?;
        serde_json::from_str(&content).map_err(|err| GenomeError::Filesystem(err.to_string()))
    }
}
