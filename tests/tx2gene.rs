mod common;

use assert_matches::assert_matches;

use genome_downloader::domain::Source;
use genome_downloader::error::GenomeError;
use genome_downloader::tx2gene::{TX2GENE_FILE, fasta_files, write_tx2gene};

use common::temp_root;

#[test]
fn missing_transcriptome_is_an_error() {
    let (_temp, root) = temp_root();
    std::fs::create_dir_all(root.join("transcriptome").as_std_path()).unwrap();
    assert_matches!(
        write_tx2gene(Source::Gencode, &root),
        Err(GenomeError::Tx2Gene(_))
    );
    assert!(!root.join(TX2GENE_FILE).as_std_path().exists());
}

#[test]
fn only_fasta_files_are_read() {
    let (_temp, root) = temp_root();
    let dir = root.join("transcriptome");
    std::fs::create_dir_all(dir.as_std_path()).unwrap();
    std::fs::write(dir.join("README").as_std_path(), b">not|fasta\n").unwrap();
    std::fs::write(
        dir.join("gencode.v42.transcripts.fa").as_std_path(),
        b">ENST1|ENSG1|-\nAC\n>ENST2|ENSG1|-\nGT\n>ENST2|ENSG1|-\nGT\n",
    )
    .unwrap();

    assert_eq!(fasta_files(&dir).unwrap().len(), 1);
    let path = write_tx2gene(Source::Gencode, &root).unwrap();
    assert_eq!(
        std::fs::read_to_string(path.as_std_path()).unwrap(),
        "ENST1,ENSG1\nENST2,ENSG1\n"
    );
}

#[test]
fn headers_without_gene_ids_are_an_error() {
    let (_temp, root) = temp_root();
    let dir = root.join("transcriptome");
    std::fs::create_dir_all(dir.as_std_path()).unwrap();
    std::fs::write(
        dir.join("Homo_sapiens.GRCh38.cdna.all.fa").as_std_path(),
        b">ENST1 cdna\nAC\n>ENST2 cdna chromosome:GRCh38:1:1:10:1\nGT\n",
    )
    .unwrap();

    assert_matches!(
        write_tx2gene(Source::Ensembl, &root),
        Err(GenomeError::Tx2Gene(_))
    );
    assert!(!root.join(TX2GENE_FILE).as_std_path().exists());
}

#[test]
fn malformed_headers_are_skipped() {
    let (_temp, root) = temp_root();
    let dir = root.join("transcriptome");
    std::fs::create_dir_all(dir.as_std_path()).unwrap();
    std::fs::write(
        dir.join("Homo_sapiens.GRCh38.cdna.all.fa").as_std_path(),
        b">ENST2.1 cdna gene:ENSG2.3 gene_biotype:lncRNA\nAC\n\
>ENST9 cdna\nGT\n\
>ENST1.4 cdna chromosome:GRCh38:1:1:10:1 gene:ENSG1.1\nTT\n",
    )
    .unwrap();

    let path = write_tx2gene(Source::Ensembl, &root).unwrap();
    assert_eq!(
        std::fs::read_to_string(path.as_std_path()).unwrap(),
        "ENST1.4,ENSG1.1\nENST2.1,ENSG2.3\n"
    );
}
