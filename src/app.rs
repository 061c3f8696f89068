use std::time::{Duration, Instant};

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::config::DownloadRequest;
use crate::domain::Source;
use crate::error::GenomeError;
use crate::fetch::Fetcher;
use crate::fs_util;
use crate::manifest::{Manifest, ManifestFile};
use crate::plan::DownloadPlan;
use crate::tx2gene;
use crate::{ensembl, gencode};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadResult {
    pub source: Source,
    pub organism: String,
    pub build: String,
    pub release: String,
    pub output_dir: Utf8PathBuf,
    pub files: Vec<ManifestFile>,
    pub tx2gene: Option<Utf8PathBuf>,
    pub manifest: Option<Utf8PathBuf>,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct LogSink;

impl ProgressSink for LogSink {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => tracing::info!(elapsed = ?elapsed, "{}", event.message),
            None => tracing::info!("{}", event.message),
        }
    }
}

pub struct App<F: Fetcher> {
    fetcher: F,
}

impl<F: Fetcher> App<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn plan(
        &self,
        source: Source,
        request: &DownloadRequest,
        create_root: bool,
    ) -> Result<DownloadPlan, GenomeError> {
        request.validate()?;
        let output_root = fs_util::resolve_output_root(&request.output_dir, create_root)?;
        match source {
            Source::Ensembl => ensembl::plan(request, &self.fetcher, &output_root),
            Source::Gencode => gencode::plan(request, &self.fetcher, &output_root),
        }
    }

    pub fn run(
        &self,
        source: Source,
        request: &DownloadRequest,
        options: RunOptions,
        sink: &dyn ProgressSink,
    ) -> Result<DownloadResult, GenomeError> {
        sink.event(ProgressEvent {
            message: format!("phase=Resolve; {source} {}", request.organism),
            elapsed: None,
        });
        let plan = self.plan(source, request, !options.dry_run)?;
        sink.event(ProgressEvent {
            message: format!(
                "phase=Resolve; build {} release {} -> {}",
                plan.build, plan.release, plan.output_dir
            ),
            elapsed: None,
        });

        if options.dry_run {
            let files = planned_files(&plan);
            return Ok(DownloadResult {
                source,
                organism: plan.organism,
                build: plan.build,
                release: plan.release,
                output_dir: plan.output_dir,
                files,
                tx2gene: None,
                manifest: None,
                dry_run: true,
            });
        }

        fs_util::ensure_dir(&plan.output_dir)?;
        let mut files = Vec::new();
        for file in &plan.leading_files {
            let path = self
                .fetcher
                .download(&file.url, &plan.output_dir, file.decompress)?;
            files.push(ManifestFile {
                artifact: None,
                url: file.url.clone(),
                path,
            });
        }

        for artifact in &plan.artifacts {
            let started = Instant::now();
            let dir = plan.output_dir.join(artifact.artifact.subdir());
            sink.event(ProgressEvent {
                message: format!("phase=Download; {} ({} files)", artifact.artifact, artifact.files.len()),
                elapsed: None,
            });
            for file in &artifact.files {
                let path = self.fetcher.download(&file.url, &dir, file.decompress)?;
                files.push(ManifestFile {
                    artifact: Some(artifact.artifact),
                    url: file.url.clone(),
                    path,
                });
            }
            sink.event(ProgressEvent {
                message: format!("phase=Download; {} done", artifact.artifact),
                elapsed: Some(started.elapsed()),
            });
        }

        let tx2gene = if plan.build_tx2gene {
            sink.event(ProgressEvent {
                message: "phase=Tx2Gene; mapping transcripts to genes".to_string(),
                elapsed: None,
            });
            Some(tx2gene::write_tx2gene(source, &plan.output_dir)?)
        } else {
            None
        };

        let (downloaded_at, tool) = Manifest::stamp();
        let manifest = Manifest {
            source,
            organism: plan.organism.clone(),
            build: plan.build.clone(),
            release: plan.release.clone(),
            base_url: plan.base_url.clone(),
            decompress: plan.decompress,
            files: files.clone(),
            tx2gene: tx2gene.clone(),
            downloaded_at,
            tool,
        };
        let manifest_path = manifest.write(&plan.output_dir)?;

        Ok(DownloadResult {
            source,
            organism: plan.organism,
            build: plan.build,
            release: plan.release,
            output_dir: plan.output_dir,
            files,
            tx2gene,
            manifest: Some(manifest_path),
            dry_run: false,
        })
    }
}

fn planned_files(plan: &DownloadPlan) -> Vec<ManifestFile> {
    let leading = plan.leading_files.iter().map(|file| ManifestFile {
        artifact: None,
        url: file.url.clone(),
        path: plan.output_dir.join(crate::domain::url_file_name(&file.url)),
    });
    let artifacts = plan.artifacts.iter().flat_map(|artifact| {
        artifact.files.iter().map(|file| ManifestFile {
            artifact: Some(artifact.artifact),
            url: file.url.clone(),
            path: plan
                .output_dir
                .join(artifact.artifact.subdir())
                .join(crate::domain::url_file_name(&file.url)),
        })
    });
    leading.chain(artifacts).collect()
}
