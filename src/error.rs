use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GenomeError {
    #[error("'type' or 'annotation' are required")]
    #[diagnostic(help("pass --type or --annotation with a value other than 'none'"))]
    NothingSelected,

    #[error("organism not supported by {provider}: {organism}")]
    UnsupportedOrganism { provider: String, organism: String },

    #[error("'build' is only supported for Homo sapiens (got {build} for {organism})")]
    UnsupportedBuild { organism: String, build: String },

    #[error("no default build for {0}; pass --build")]
    MissingBuild(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("{url} returned status {status}")]
    HttpStatus { status: u16, url: String },

    #[error("failed to resolve latest release: {0}")]
    ReleaseLookup(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("decompression failed: {0}")]
    Decompress(String),

    #[error("tx2gene failed: {0}")]
    Tx2Gene(String),
}

impl GenomeError {
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            GenomeError::NothingSelected
                | GenomeError::UnsupportedOrganism { .. }
                | GenomeError::UnsupportedBuild { .. }
                | GenomeError::MissingBuild(_)
        )
    }
}
