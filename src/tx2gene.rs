use std::collections::BTreeSet;
use std::fs;
use std::io::{BufRead, BufReader};

use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::{Artifact, Source};
use crate::error::GenomeError;
use crate::fs_util;

pub const TX2GENE_FILE: &str = "tx2gene.csv";

const FASTA_SUFFIXES: [&str; 4] = [".fa", ".fa.gz", ".fasta", ".fasta.gz"];

pub fn parse_header(source: Source, header: &str) -> Option<(String, String)> {
    match source {
        // ENST00000456328.2 cdna chromosome:GRCh38:1:11869:14409:1 gene:ENSG00000290825.1 ...
        Source::Ensembl => {
            let mut fields = header.split_whitespace();
            let tx = fields.next()?;
            let gene = fields.find_map(|field| field.strip_prefix("gene:"))?;
            Some((tx.to_string(), gene.to_string()))
        }
        // ENST00000456328.2|ENSG00000290825.1|-|-|DDX11L2-202|DDX11L2|1657|lncRNA|
        Source::Gencode => {
            let mut fields = header.split('|');
            let tx = fields.next().filter(|v| !v.is_empty())?;
            let gene = fields.next().filter(|v| !v.is_empty())?;
            Some((tx.trim().to_string(), gene.trim().to_string()))
        }
    }
}

pub fn fasta_files(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, GenomeError> {
    let entries =
        fs::read_dir(dir.as_std_path()).map_err(|err| GenomeError::Tx2Gene(format!("{dir}: {err}")))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| GenomeError::Filesystem(err.to_string()))?;
        let Ok(path) = Utf8PathBuf::from_path_buf(entry.path()) else {
            continue;
        };
        let is_fasta = path
            .file_name()
            .map(|name| FASTA_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
            .unwrap_or(false);
        if is_fasta && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn write_tx2gene(source: Source, output_dir: &Utf8Path) -> Result<Utf8PathBuf, GenomeError> {
    let transcriptome_dir = output_dir.join(Artifact::Transcriptome.subdir());
    let files = fasta_files(&transcriptome_dir)?;
    if files.is_empty() {
        return Err(GenomeError::Tx2Gene(format!(
            "no transcriptome FASTA in {transcriptome_dir}"
        )));
    }

    let mut pairs = BTreeSet::new();
    let mut skipped = 0usize;
    for file in &files {
        tracing::debug!(file = %file, "reading transcript headers");
        let reader = BufReader::new(fs_util::open_maybe_gz(file)?);
        for line in reader.lines() {
            let line = line.map_err(|err| GenomeError::Tx2Gene(format!("{file}: {err}")))?;
            let Some(header) = line.strip_prefix('>') else {
                continue;
            };
            match parse_header(source, header) {
                Some(pair) => {
                    pairs.insert(pair);
                }
                None => skipped += 1,
            }
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "headers without a gene id");
    }
    if pairs.is_empty() {
        return Err(GenomeError::Tx2Gene(format!(
            "no transcript-to-gene pairs in {transcriptome_dir}"
        )));
    }

    let mut csv = String::new();
    for (tx, gene) in &pairs {
        csv.push_str(tx);
        csv.push(',');
        csv.push_str(gene);
        csv.push('\n');
    }
    let path = output_dir.join(TX2GENE_FILE);
    fs_util::write_bytes_atomic(&path, csv.as_bytes())?;
    tracing::info!(path = %path, transcripts = pairs.len(), "wrote tx2gene");
    Ok(path)
}
