use camino::Utf8Path;

use crate::config::DownloadRequest;
use crate::domain::{Artifact, Source, output_basename, paste_url};
use crate::error::GenomeError;
use crate::fetch::Fetcher;
use crate::plan::{ArtifactHandler, ArtifactPlan, DownloadPlan, PlannedFile, dispatch};

pub const BASE_URL: &str = "ftp://ftp.ensembl.org/pub";
pub const GRCH37_BUILD: &str = "GRCh37";
pub const GRCH37_RELEASE: &str = "87";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsemblRelease {
    pub organism: String,
    pub build: String,
    pub release: String,
    pub base_url: String,
    pub release_url: String,
    pub decompress: bool,
}

impl EnsemblRelease {
    fn organism_dir(&self) -> String {
        self.organism.to_lowercase()
    }

    fn prefix(&self) -> String {
        format!("{}.{}", self.organism, self.build)
    }

    fn with_sidecars(&self, dir_url: &str, data: &str) -> Vec<PlannedFile> {
        vec![
            PlannedFile::sidecar(paste_url(&[dir_url, "README"])),
            PlannedFile::sidecar(paste_url(&[dir_url, "CHECKSUMS"])),
            PlannedFile::data(paste_url(&[dir_url, data]), self.decompress),
        ]
    }
}

const HANDLERS: [(Artifact, ArtifactHandler<EnsemblRelease>); 4] = [
    (Artifact::Genome, genome_plan),
    (Artifact::Transcriptome, transcriptome_plan),
    (Artifact::Gtf, gtf_plan),
    (Artifact::Gff, gff_plan),
];

pub fn default_build(organism: &str) -> Option<&'static str> {
    match organism {
        "Homo_sapiens" => Some("GRCh38"),
        "Mus_musculus" => Some("GRCm39"),
        _ => None,
    }
}

pub fn resolve(
    request: &DownloadRequest,
    fetcher: &dyn Fetcher,
) -> Result<EnsemblRelease, GenomeError> {
    request.validate()?;
    let organism = request.organism.replace(' ', "_");
    let build = match &request.build {
        Some(build) => build.clone(),
        None => default_build(&organism)
            .map(str::to_string)
            .ok_or_else(|| GenomeError::MissingBuild(request.organism.clone()))?,
    };

    // GRCh37 is frozen at release 87 on its own mirror.
    let (base_url, release) = if build == GRCH37_BUILD {
        if let Some(requested) = request.release.as_deref().filter(|r| *r != GRCH37_RELEASE) {
            tracing::warn!(requested, "GRCh37 is pinned to Ensembl release {GRCH37_RELEASE}");
        }
        (paste_url(&[BASE_URL, "grch37"]), GRCH37_RELEASE.to_string())
    } else {
        let release = match &request.release {
            Some(release) => release.clone(),
            None => fetcher.latest_release(Source::Ensembl, &request.organism)?,
        };
        (BASE_URL.to_string(), release)
    };
    let release_url = paste_url(&[&base_url, &format!("release-{release}")]);

    Ok(EnsemblRelease {
        organism,
        build,
        release,
        base_url,
        release_url,
        decompress: request.decompress,
    })
}

pub fn plan(
    request: &DownloadRequest,
    fetcher: &dyn Fetcher,
    output_root: &Utf8Path,
) -> Result<DownloadPlan, GenomeError> {
    let resolved = resolve(request, fetcher)?;
    let basename = output_basename(
        &resolved.organism,
        &resolved.build,
        Source::Ensembl,
        &resolved.release,
    );
    let artifacts = dispatch(&HANDLERS, &resolved, request.genome_type, request.annotation);
    Ok(DownloadPlan {
        source: Source::Ensembl,
        output_dir: output_root.join(basename),
        decompress: resolved.decompress,
        leading_files: Vec::new(),
        artifacts,
        build_tx2gene: request.genome_type.includes_transcriptome(),
        base_url: resolved.base_url,
        organism: resolved.organism,
        build: resolved.build,
        release: resolved.release,
    })
}

fn genome_plan(release: &EnsemblRelease) -> ArtifactPlan {
    let dir_url = paste_url(&[&release.release_url, "fasta", &release.organism_dir(), "dna"]);
    // Only the reference-quality assemblies publish a primary assembly.
    let assembly = match default_build(&release.organism) {
        Some(_) => "primary_assembly",
        None => "toplevel",
    };
    let file = format!("{}.dna.{assembly}.fa.gz", release.prefix());
    ArtifactPlan {
        artifact: Artifact::Genome,
        files: release.with_sidecars(&dir_url, &file),
    }
}

fn transcriptome_plan(release: &EnsemblRelease) -> ArtifactPlan {
    let fasta_url = paste_url(&[&release.release_url, "fasta", &release.organism_dir()]);
    let cdna_url = paste_url(&[&fasta_url, "cdna"]);
    let mut files = release.with_sidecars(&cdna_url, &format!("{}.cdna.all.fa.gz", release.prefix()));
    files.push(PlannedFile::data(
        paste_url(&[&fasta_url, "ncrna", &format!("{}.ncrna.fa.gz", release.prefix())]),
        release.decompress,
    ));
    ArtifactPlan {
        artifact: Artifact::Transcriptome,
        files,
    }
}

fn gtf_plan(release: &EnsemblRelease) -> ArtifactPlan {
    let dir_url = paste_url(&[&release.release_url, "gtf", &release.organism_dir()]);
    let file = format!("{}.{}.gtf.gz", release.prefix(), release.release);
    ArtifactPlan {
        artifact: Artifact::Gtf,
        files: release.with_sidecars(&dir_url, &file),
    }
}

fn gff_plan(release: &EnsemblRelease) -> ArtifactPlan {
    let dir_url = paste_url(&[&release.release_url, "gff3", &release.organism_dir()]);
    let file = format!("{}.{}.gff3.gz", release.prefix(), release.release);
    ArtifactPlan {
        artifact: Artifact::Gff,
        files: release.with_sidecars(&dir_url, &file),
    }
}
