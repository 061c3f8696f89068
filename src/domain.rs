use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Ensembl,
    Gencode,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Ensembl => "ensembl",
            Source::Gencode => "gencode",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Artifact {
    Genome,
    Transcriptome,
    Gtf,
    Gff,
}

impl Artifact {
    pub fn subdir(&self) -> &'static str {
        match self {
            Artifact::Genome => "genome",
            Artifact::Transcriptome => "transcriptome",
            Artifact::Gtf => "gtf",
            Artifact::Gff => "gff",
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.subdir())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GenomeType {
    #[default]
    All,
    Genome,
    Transcriptome,
    None,
}

impl GenomeType {
    pub fn artifacts(&self) -> &'static [Artifact] {
        match self {
            GenomeType::All => &[Artifact::Genome, Artifact::Transcriptome],
            GenomeType::Genome => &[Artifact::Genome],
            GenomeType::Transcriptome => &[Artifact::Transcriptome],
            GenomeType::None => &[],
        }
    }

    pub fn includes_transcriptome(&self) -> bool {
        self.artifacts().contains(&Artifact::Transcriptome)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationType {
    #[default]
    All,
    Gtf,
    Gff,
    None,
}

impl AnnotationType {
    pub fn artifacts(&self) -> &'static [Artifact] {
        match self {
            AnnotationType::All => &[Artifact::Gtf, Artifact::Gff],
            AnnotationType::Gtf => &[Artifact::Gtf],
            AnnotationType::Gff => &[Artifact::Gff],
            AnnotationType::None => &[],
        }
    }
}

pub fn paste_url(parts: &[&str]) -> String {
    let mut url = String::new();
    for part in parts {
        let trimmed = if url.is_empty() {
            part.trim_end_matches('/')
        } else {
            part.trim_matches('/')
        };
        if trimmed.is_empty() {
            continue;
        }
        if !url.is_empty() {
            url.push('/');
        }
        url.push_str(trimmed);
    }
    url
}

pub fn kebab_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_dash = false;
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

pub fn output_basename(organism: &str, build: &str, source: Source, release: &str) -> String {
    kebab_case(&format!("{organism} {build} {source} {release}"))
}

pub fn url_file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
