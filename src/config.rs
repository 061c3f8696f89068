use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Args;

use crate::domain::{AnnotationType, GenomeType};
use crate::error::GenomeError;

#[derive(Debug, Clone, Args)]
pub struct DownloadArgs {
    #[arg(long, help = "Organism name, e.g. \"Homo sapiens\"")]
    pub organism: String,

    #[arg(long, help = "Genome build, e.g. GRCh38")]
    pub build: Option<String>,

    #[arg(long, help = "Release version (defaults to the latest available)")]
    pub release: Option<String>,

    #[arg(long = "type", value_enum, default_value_t = GenomeType::All)]
    pub genome_type: GenomeType,

    #[arg(long, value_enum, default_value_t = AnnotationType::All)]
    pub annotation: AnnotationType,

    #[arg(long, default_value = ".")]
    pub output_dir: Utf8PathBuf,

    #[arg(long)]
    pub decompress: bool,

    #[arg(long, help = "Resolve and print the download plan without fetching")]
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub organism: String,
    pub build: Option<String>,
    pub release: Option<String>,
    pub genome_type: GenomeType,
    pub annotation: AnnotationType,
    pub output_dir: Utf8PathBuf,
    pub decompress: bool,
}

impl DownloadRequest {
    pub fn new(organism: impl Into<String>) -> Self {
        Self {
            organism: organism.into(),
            build: None,
            release: None,
            genome_type: GenomeType::All,
            annotation: AnnotationType::All,
            output_dir: Utf8PathBuf::from("."),
            decompress: false,
        }
    }

    pub fn validate(&self) -> Result<(), GenomeError> {
        if self.genome_type == GenomeType::None && self.annotation == AnnotationType::None {
            return Err(GenomeError::NothingSelected);
        }
        Ok(())
    }
}

impl From<DownloadArgs> for DownloadRequest {
    fn from(args: DownloadArgs) -> Self {
        Self {
            organism: args.organism.trim().to_string(),
            build: non_empty(args.build),
            release: non_empty(args.release),
            genome_type: args.genome_type,
            annotation: args.annotation,
            output_dir: args.output_dir,
            decompress: args.decompress,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub const RETRIES_ENV: &str = "GENOME_DOWNLOADER_RETRIES";

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub max_retries: usize,
    pub base_delay: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            max_retries: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl HttpSettings {
    pub fn from_env() -> Self {
        Self::with_retries(std::env::var(RETRIES_ENV).ok().as_deref())
    }

    pub fn with_retries(value: Option<&str>) -> Self {
        let mut settings = Self::default();
        if let Some(value) = value {
            match value.trim().parse::<usize>() {
                Ok(retries) => settings.max_retries = retries,
                Err(_) => tracing::warn!(value, "ignoring invalid {RETRIES_ENV}"),
            }
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn both_selectors_none_is_rejected() {
        let mut request = DownloadRequest::new("Homo sapiens");
        request.genome_type = GenomeType::None;
        request.annotation = AnnotationType::None;
        assert_matches!(request.validate(), Err(GenomeError::NothingSelected));

        request.annotation = AnnotationType::Gtf;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn blank_build_is_treated_as_missing() {
        let args = DownloadArgs {
            organism: " Homo sapiens ".to_string(),
            build: Some("  ".to_string()),
            release: Some("42".to_string()),
            genome_type: GenomeType::Genome,
            annotation: AnnotationType::None,
            output_dir: Utf8PathBuf::from("out"),
            decompress: true,
            dry_run: false,
        };
        let request = DownloadRequest::from(args);
        assert_eq!(request.organism, "Homo sapiens");
        assert_eq!(request.build, None);
        assert_eq!(request.release.as_deref(), Some("42"));
    }

    #[test]
    fn retries_override_from_environment() {
        assert_eq!(HttpSettings::with_retries(Some("5")).max_retries, 5);
        assert_eq!(HttpSettings::with_retries(Some(" 0 ")).max_retries, 0);
        assert_eq!(HttpSettings::with_retries(Some("abc")).max_retries, 3);
        assert_eq!(HttpSettings::with_retries(None).max_retries, 3);

        // SAFETY: no other test in this crate reads or writes this variable.
        unsafe { std::env::set_var(RETRIES_ENV, "7") };
        assert_eq!(HttpSettings::from_env().max_retries, 7);
        unsafe { std::env::set_var(RETRIES_ENV, "-1") };
        assert_eq!(HttpSettings::from_env().max_retries, 3);
        unsafe { std::env::remove_var(RETRIES_ENV) };
        assert_eq!(HttpSettings::from_env().max_retries, 3);
    }
}
