#![allow(dead_code)]

use std::io::Write;
use std::sync::Mutex;

use camino::{Utf8Path, Utf8PathBuf};
use flate2::Compression;
use flate2::write::GzEncoder;

use genome_downloader::domain::{Source, url_file_name};
use genome_downloader::error::GenomeError;
use genome_downloader::fetch::Fetcher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCall {
    pub url: String,
    pub dir: Utf8PathBuf,
    pub decompress: bool,
}

#[derive(Default)]
pub struct MockFetcher {
    pub latest: Option<String>,
    pub downloads: Mutex<Vec<DownloadCall>>,
    pub lookups: Mutex<Vec<Source>>,
}

impl MockFetcher {
    pub fn with_latest(release: &str) -> Self {
        Self {
            latest: Some(release.to_string()),
            ..Self::default()
        }
    }

    pub fn download_urls(&self) -> Vec<String> {
        self.downloads
            .lock()
            .unwrap()
            .iter()
            .map(|call| call.url.clone())
            .collect()
    }

    pub fn network_calls(&self) -> usize {
        self.downloads.lock().unwrap().len() + self.lookups.lock().unwrap().len()
    }
}

fn fixture(name: &str) -> &'static [u8] {
    if name.starts_with("gencode.") && name.contains("transcripts") {
        b">ENST00000456328.2|ENSG00000290825.1|-|-|DDX11L2-202|DDX11L2|1657|lncRNA|\nACGT\n>ENST00000450305.2|ENSG00000223972.6|-|-|DDX11L1-201|DDX11L1|632|pseudogene|\nACGT\n"
    } else if name.contains(".cdna.") {
        b">ENST00000456328.2 cdna chromosome:GRCh38:1:11869:14409:1 gene:ENSG00000290825.1 gene_biotype:lncRNA\nACGT\n"
    } else if name.contains(".ncrna.") {
        b">ENST00000516494.1 ncrna chromosome:GRCh38:1:1:100:1 gene:ENSG00000252303.1 gene_biotype:snRNA\nACGT\n"
    } else {
        b"fixture\n"
    }
}

impl Fetcher for MockFetcher {
    fn download(
        &self,
        url: &str,
        output_dir: &Utf8Path,
        decompress: bool,
    ) -> Result<Utf8PathBuf, GenomeError> {
        self.downloads.lock().unwrap().push(DownloadCall {
            url: url.to_string(),
            dir: output_dir.to_path_buf(),
            decompress,
        });
        std::fs::create_dir_all(output_dir.as_std_path()).unwrap();
        let name = url_file_name(url);
        let content = fixture(name);
        match name.strip_suffix(".gz") {
            Some(plain) if decompress => {
                let path = output_dir.join(plain);
                std::fs::write(path.as_std_path(), content).unwrap();
                Ok(path)
            }
            Some(_) => {
                let path = output_dir.join(name);
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(content).unwrap();
                std::fs::write(path.as_std_path(), encoder.finish().unwrap()).unwrap();
                Ok(path)
            }
            None => {
                let path = output_dir.join(name);
                std::fs::write(path.as_std_path(), content).unwrap();
                Ok(path)
            }
        }
    }

    fn latest_release(&self, source: Source, _organism: &str) -> Result<String, GenomeError> {
        self.lookups.lock().unwrap().push(source);
        self.latest
            .clone()
            .ok_or_else(|| GenomeError::ReleaseLookup("mock has no release".to_string()))
    }
}

pub fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    (temp, root)
}
