use std::io::{ErrorKind, Read, Write};
use std::thread;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::config::HttpSettings;
use crate::domain::{Source, url_file_name};
use crate::error::GenomeError;
use crate::fs_util;

const ENSEMBL_SOFTWARE_URL: &str = "https://rest.ensembl.org/info/software?content-type=application/json";
const GENCODE_SITE_URL: &str = "https://www.gencodegenes.org";

pub trait Fetcher: Send + Sync {
    fn download(
        &self,
        url: &str,
        output_dir: &Utf8Path,
        decompress: bool,
    ) -> Result<Utf8PathBuf, GenomeError>;

    fn latest_release(&self, source: Source, organism: &str) -> Result<String, GenomeError>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    settings: HttpSettings,
}

#[derive(Debug, Deserialize)]
struct EnsemblSoftware {
    release: u32,
}

impl HttpFetcher {
    pub fn new(settings: HttpSettings) -> Result<Self, GenomeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("genome-downloader/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| GenomeError::Http(err.to_string()))?,
        );
        // Genome FASTA files run to several GB; only the connect phase is bounded.
        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(settings.connect_timeout)
            .timeout(None::<Duration>)
            .build()
            .map_err(|err| GenomeError::Http(err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn get(&self, url: &str) -> Result<Response, GenomeError> {
        let url = normalize_url(url);
        let response = self.send_with_retries(&url)?;
        if !response.status().is_success() {
            return Err(GenomeError::HttpStatus {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(response)
    }

    fn send_with_retries(&self, url: &str) -> Result<Response, GenomeError> {
        let mut attempt = 0usize;
        loop {
            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if attempt < self.settings.max_retries && is_retryable_status(status) {
                        tracing::debug!(url, status, attempt, "retrying");
                        thread::sleep(self.settings.base_delay * (attempt as u32 + 1));
                        attempt += 1;
                        continue;
                    }
                    return Ok(resp);
                }
                Err(err) => {
                    if attempt < self.settings.max_retries && is_retryable_error(&err) {
                        tracing::debug!(url, error = %err, attempt, "retrying");
                        thread::sleep(self.settings.base_delay * (attempt as u32 + 1));
                        attempt += 1;
                        continue;
                    }
                    return Err(GenomeError::Http(err.to_string()));
                }
            }
        }
    }

    fn ensembl_release(&self) -> Result<String, GenomeError> {
        let info: EnsemblSoftware = self
            .get(ENSEMBL_SOFTWARE_URL)?
            .json()
            .map_err(|err| GenomeError::ReleaseLookup(err.to_string()))?;
        Ok(info.release.to_string())
    }

    fn gencode_release(&self, organism: &str) -> Result<String, GenomeError> {
        let page = match organism {
            "Homo sapiens" => "human",
            "Mus musculus" => "mouse",
            other => {
                return Err(GenomeError::UnsupportedOrganism {
                    provider: Source::Gencode.to_string(),
                    organism: other.to_string(),
                });
            }
        };
        let html = self
            .get(&format!("{GENCODE_SITE_URL}/{page}/"))?
            .text()
            .map_err(|err| GenomeError::ReleaseLookup(err.to_string()))?;
        parse_gencode_release(&html)
    }
}

impl Fetcher for HttpFetcher {
    fn download(
        &self,
        url: &str,
        output_dir: &Utf8Path,
        decompress: bool,
    ) -> Result<Utf8PathBuf, GenomeError> {
        fs_util::ensure_dir(output_dir)?;
        let destination = output_dir.join(url_file_name(url));
        tracing::info!(url, destination = %destination, "downloading");

        let mut response = self.get(url)?;
        let mut temp = fs_util::temp_file_in(output_dir)?;
        copy_body(&mut response, temp.as_file_mut(), url)?;
        fs_util::persist(temp, &destination)?;

        if decompress && destination.extension() == Some("gz") {
            return fs_util::gunzip(&destination);
        }
        Ok(destination)
    }

    fn latest_release(&self, source: Source, organism: &str) -> Result<String, GenomeError> {
        let release = match source {
            Source::Ensembl => self.ensembl_release()?,
            Source::Gencode => self.gencode_release(organism)?,
        };
        tracing::info!(%source, organism, %release, "resolved latest release");
        Ok(release)
    }
}

// Read failures are network errors; write failures belong to the local disk.
pub fn copy_body(
    reader: &mut impl Read,
    writer: &mut impl Write,
    url: &str,
) -> Result<u64, GenomeError> {
    let mut buffer = vec![0u8; 64 * 1024];
    let mut total = 0u64;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(GenomeError::Http(format!("{url}: {err}"))),
        };
        writer
            .write_all(&buffer[..read])
            .map_err(|err| GenomeError::Filesystem(format!("write body of {url}: {err}")))?;
        total += read as u64;
    }
    writer
        .flush()
        .map_err(|err| GenomeError::Filesystem(format!("write body of {url}: {err}")))?;
    Ok(total)
}

// Both repositories mirror their FTP trees over HTTPS.
pub fn normalize_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("ftp://") {
        return format!("https://{rest}");
    }
    url.to_string()
}

pub fn parse_gencode_release(html: &str) -> Result<String, GenomeError> {
    let pattern = Regex::new(r"Release\s+(M?\d+)")
        .map_err(|err| GenomeError::ReleaseLookup(err.to_string()))?;
    pattern
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|value| value.as_str().to_string())
        .ok_or_else(|| {
            GenomeError::ReleaseLookup("no release number on GENCODE page".to_string())
        })
}

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
