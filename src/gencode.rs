use camino::Utf8Path;
use serde::Serialize;

use crate::config::DownloadRequest;
use crate::domain::{Artifact, Source, output_basename, paste_url};
use crate::error::GenomeError;
use crate::fetch::Fetcher;
use crate::plan::{ArtifactHandler, ArtifactPlan, DownloadPlan, PlannedFile, dispatch};

pub const HOST_URL: &str = "ftp://ftp.ebi.ac.uk";
pub const LIFT37_BUILD: &str = "GRCh37";
pub const LAST_GRCM38_RELEASE: u32 = 25;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GencodeUrls {
    pub base_url: String,
    pub readme: String,
    pub md5sums: String,
    pub genome_fasta: String,
    pub transcriptome_fasta: String,
    pub gtf: String,
    pub gff: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GencodeRelease {
    pub organism: String,
    pub build: String,
    pub release: String,
    pub urls: GencodeUrls,
    pub decompress: bool,
}

impl GencodeRelease {
    fn single(&self, artifact: Artifact, url: &str) -> ArtifactPlan {
        ArtifactPlan {
            artifact,
            files: vec![PlannedFile::data(url.to_string(), self.decompress)],
        }
    }
}

const HANDLERS: [(Artifact, ArtifactHandler<GencodeRelease>); 4] = [
    (Artifact::Genome, genome_plan),
    (Artifact::Transcriptome, transcriptome_plan),
    (Artifact::Gtf, gtf_plan),
    (Artifact::Gff, gff_plan),
];

fn genome_plan(release: &GencodeRelease) -> ArtifactPlan {
    release.single(Artifact::Genome, &release.urls.genome_fasta)
}

fn transcriptome_plan(release: &GencodeRelease) -> ArtifactPlan {
    release.single(Artifact::Transcriptome, &release.urls.transcriptome_fasta)
}

fn gtf_plan(release: &GencodeRelease) -> ArtifactPlan {
    release.single(Artifact::Gtf, &release.urls.gtf)
}

fn gff_plan(release: &GencodeRelease) -> ArtifactPlan {
    release.single(Artifact::Gff, &release.urls.gff)
}

pub fn organism_profile(
    organism: &str,
    build: Option<&str>,
) -> Result<(&'static str, String), GenomeError> {
    match organism {
        "Homo sapiens" => Ok(("human", build.unwrap_or("GRCh38").to_string())),
        "Mus musculus" => match build {
            Some(build) => Err(GenomeError::UnsupportedBuild {
                organism: organism.to_string(),
                build: build.to_string(),
            }),
            None => Ok(("mouse", "GRCm38".to_string())),
        },
        other => Err(GenomeError::UnsupportedOrganism {
            provider: Source::Gencode.to_string(),
            organism: other.to_string(),
        }),
    }
}

pub fn release_has_grcm38(release: &str) -> bool {
    release
        .trim_start_matches(['M', 'm'])
        .parse::<u32>()
        .map(|number| number <= LAST_GRCM38_RELEASE)
        .unwrap_or(true)
}

pub fn build_urls(organism_short: &str, build: &str, release: &str) -> GencodeUrls {
    let mut base_url = paste_url(&[
        HOST_URL,
        "pub",
        "databases",
        "gencode/",
        &format!("Gencode_{organism_short}"),
        &format!("release_{release}"),
    ]);
    let (suffix, readme) = if build == LIFT37_BUILD {
        base_url = paste_url(&[&base_url, "GRCh37_mapping"]);
        ("lift37", "_README_GRCh37_mapping.txt")
    } else {
        ("", "_README.TXT")
    };
    let versioned = |tail: &str| paste_url(&[&base_url, &format!("gencode.v{release}{suffix}.{tail}")]);

    GencodeUrls {
        readme: paste_url(&[&base_url, readme]),
        md5sums: paste_url(&[&base_url, "MD5SUMS"]),
        genome_fasta: paste_url(&[&base_url, &format!("{build}.primary_assembly.genome.fa.gz")]),
        transcriptome_fasta: versioned("transcripts.fa.gz"),
        gtf: versioned("annotation.gtf.gz"),
        gff: versioned("annotation.gff3.gz"),
        base_url,
    }
}

pub fn resolve(
    request: &DownloadRequest,
    fetcher: &dyn Fetcher,
) -> Result<GencodeRelease, GenomeError> {
    request.validate()?;
    let (organism_short, build) = organism_profile(&request.organism, request.build.as_deref())?;
    let release = match &request.release {
        Some(release) => release.clone(),
        None => fetcher.latest_release(Source::Gencode, &request.organism)?,
    };
    if organism_short == "mouse" && !release_has_grcm38(&release) {
        tracing::warn!(
            %release,
            "GENCODE mouse releases after M{LAST_GRCM38_RELEASE} are GRCm39; the GRCm38 genome may not exist"
        );
    }
    let urls = build_urls(organism_short, &build, &release);
    Ok(GencodeRelease {
        organism: request.organism.clone(),
        build,
        release,
        urls,
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
        Source::Gencode,
        &resolved.release,
    );
    let artifacts = dispatch(&HANDLERS, &resolved, request.genome_type, request.annotation);
    Ok(DownloadPlan {
        source: Source::Gencode,
        output_dir: output_root.join(basename),
        decompress: resolved.decompress,
        leading_files: vec![
            PlannedFile::sidecar(resolved.urls.readme.clone()),
            PlannedFile::sidecar(resolved.urls.md5sums.clone()),
        ],
        artifacts,
        build_tx2gene: request.genome_type.includes_transcriptome(),
        base_url: resolved.urls.base_url,
        organism: resolved.organism,
        build: resolved.build,
        release: resolved.release,
    })
}
