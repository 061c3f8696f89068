use camino::Utf8PathBuf;
use serde::Serialize;

use crate::domain::{AnnotationType, Artifact, GenomeType, Source};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    pub url: String,
    pub decompress: bool,
}

impl PlannedFile {
    pub fn data(url: String, decompress: bool) -> Self {
        Self { url, decompress }
    }

    pub fn sidecar(url: String) -> Self {
        Self {
            url,
            decompress: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPlan {
    pub artifact: Artifact,
    pub files: Vec<PlannedFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadPlan {
    pub source: Source,
    pub organism: String,
    pub build: String,
    pub release: String,
    pub base_url: String,
    pub output_dir: Utf8PathBuf,
    pub decompress: bool,
    pub leading_files: Vec<PlannedFile>,
    pub artifacts: Vec<ArtifactPlan>,
    pub build_tx2gene: bool,
}

impl DownloadPlan {
    pub fn artifact(&self, artifact: Artifact) -> Option<&ArtifactPlan> {
        self.artifacts.iter().find(|plan| plan.artifact == artifact)
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.leading_files
            .iter()
            .chain(self.artifacts.iter().flat_map(|plan| plan.files.iter()))
            .map(|file| file.url.as_str())
    }
}

pub type ArtifactHandler<C> = fn(&C) -> ArtifactPlan;

pub fn dispatch<C>(
    handlers: &[(Artifact, ArtifactHandler<C>)],
    context: &C,
    genome_type: GenomeType,
    annotation: AnnotationType,
) -> Vec<ArtifactPlan> {
    genome_type
        .artifacts()
        .iter()
        .chain(annotation.artifacts())
        .filter_map(|artifact| {
            handlers
                .iter()
                .find(|(kind, _)| kind == artifact)
                .map(|(_, handler)| handler(context))
        })
        .collect()
}
