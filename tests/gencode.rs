mod common;

use assert_matches::assert_matches;
use camino::Utf8Path;

use genome_downloader::config::DownloadRequest;
use genome_downloader::domain::{AnnotationType, Artifact, GenomeType};
use genome_downloader::error::GenomeError;
use genome_downloader::gencode;

use common::MockFetcher;

#[test]
fn human_defaults_to_grch38() {
    let fetcher = MockFetcher::default();
    let mut request = DownloadRequest::new("Homo sapiens");
    request.release = Some("42".to_string());

    let plan = gencode::plan(&request, &fetcher, Utf8Path::new("/refs")).unwrap();
    assert_eq!(plan.build, "GRCh38");
    assert_eq!(plan.output_dir, "/refs/homo-sapiens-grch38-gencode-42");
    let genome = plan.artifact(Artifact::Genome).unwrap();
    assert_eq!(
        genome.files[0].url,
        "ftp://ftp.ebi.ac.uk/pub/databases/gencode/Gencode_human/release_42/GRCh38.primary_assembly.genome.fa.gz"
    );
    let leading: Vec<&str> = plan.leading_files.iter().map(|f| f.url.as_str()).collect();
    assert_eq!(
        leading,
        vec![
            "ftp://ftp.ebi.ac.uk/pub/databases/gencode/Gencode_human/release_42/_README.TXT",
            "ftp://ftp.ebi.ac.uk/pub/databases/gencode/Gencode_human/release_42/MD5SUMS",
        ]
    );
    assert!(plan.build_tx2gene);
    assert_eq!(fetcher.network_calls(), 0);
}

#[test]
fn grch37_urls_all_carry_mapping_segment() {
    let fetcher = MockFetcher::default();
    let mut request = DownloadRequest::new("Homo sapiens");
    request.build = Some("GRCh37".to_string());
    request.release = Some("42".to_string());

    let plan = gencode::plan(&request, &fetcher, Utf8Path::new("/refs")).unwrap();
    assert!(plan.urls().all(|url| url.contains("/release_42/GRCh37_mapping/")));
    for artifact in [Artifact::Transcriptome, Artifact::Gtf, Artifact::Gff] {
        let file = &plan.artifact(artifact).unwrap().files[0];
        assert!(file.url.contains("gencode.v42lift37."), "{}", file.url);
    }
}

#[test]
fn mouse_build_fails_before_network() {
    let fetcher = MockFetcher::with_latest("M33");
    let mut request = DownloadRequest::new("Mus musculus");
    request.build = Some("GRCm39".to_string());

    assert_matches!(
        gencode::plan(&request, &fetcher, Utf8Path::new("/refs")),
        Err(GenomeError::UnsupportedBuild { .. })
    );
    assert_eq!(fetcher.network_calls(), 0);
}

#[test]
fn mouse_release_is_looked_up() {
    let fetcher = MockFetcher::with_latest("M25");
    let mut request = DownloadRequest::new("Mus musculus");
    request.genome_type = GenomeType::None;
    request.annotation = AnnotationType::Gff;

    let plan = gencode::plan(&request, &fetcher, Utf8Path::new("/refs")).unwrap();
    assert_eq!(plan.release, "M25");
    assert_eq!(plan.output_dir, "/refs/mus-musculus-grcm38-gencode-m25");
    assert_eq!(plan.artifacts.len(), 1);
    assert!(
        plan.artifacts[0].files[0]
            .url
            .ends_with("/Gencode_mouse/release_M25/gencode.vM25.annotation.gff3.gz")
    );
    assert!(!plan.build_tx2gene);
}
