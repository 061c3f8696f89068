use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read};

use camino::{Utf8Path, Utf8PathBuf};
use flate2::read::MultiGzDecoder;
use tempfile::{Builder, NamedTempFile};

use crate::error::GenomeError;

pub fn ensure_dir(path: &Utf8Path) -> Result<(), GenomeError> {
    fs::create_dir_all(path.as_std_path())
        .map_err(|err| GenomeError::Filesystem(format!("create {path}: {err}")))
}

pub fn resolve_output_root(path: &Utf8Path, create: bool) -> Result<Utf8PathBuf, GenomeError> {
    if create {
        ensure_dir(path)?;
    }
    if path.as_std_path().is_dir() {
        let canonical = fs::canonicalize(path.as_std_path())
            .map_err(|err| GenomeError::Filesystem(format!("resolve {path}: {err}")))?;
        return Utf8PathBuf::from_path_buf(canonical)
            .map_err(|_| GenomeError::Filesystem(format!("non UTF-8 path: {path}")));
    }
    if path.as_std_path().exists() {
        return Err(GenomeError::Filesystem(format!("not a directory: {path}")));
    }
    let cwd = std::env::current_dir().map_err(|err| GenomeError::Filesystem(err.to_string()))?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|_| GenomeError::Filesystem("non UTF-8 working directory".to_string()))?;
    Ok(cwd.join(path))
}

pub fn temp_file_in(dir: &Utf8Path) -> Result<NamedTempFile, GenomeError> {
    Builder::new()
        .prefix(".genome-dl")
        .tempfile_in(dir.as_std_path())
        .map_err(|err| GenomeError::Filesystem(err.to_string()))
}

pub fn persist(temp: NamedTempFile, destination: &Utf8Path) -> Result<(), GenomeError> {
    if destination.as_std_path().exists() {
        fs::remove_file(destination.as_std_path())
            .map_err(|err| GenomeError::Filesystem(err.to_string()))?;
    }
    temp.persist(destination.as_std_path())
        .map_err(|err| GenomeError::Filesystem(err.to_string()))?;
    Ok(())
}

pub fn write_bytes_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), GenomeError> {
    let parent = path
        .parent()
        .ok_or_else(|| GenomeError::Filesystem(format!("invalid destination path: {path}")))?;
    ensure_dir(parent)?;
    let mut temp = temp_file_in(parent)?;
    io::Write::write_all(temp.as_file_mut(), content)
        .map_err(|err| GenomeError::Filesystem(err.to_string()))?;
    persist(temp, path)
}

pub fn gunzip(path: &Utf8Path) -> Result<Utf8PathBuf, GenomeError> {
    let target = path.with_extension("");
    let parent = path
        .parent()
        .ok_or_else(|| GenomeError::Filesystem(format!("invalid path: {path}")))?;
    tracing::info!(source = %path, target = %target, "decompressing");

    let mut decoder = MultiGzDecoder::new(BufReader::new(open(path)?));
    let temp = temp_file_in(parent)?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        io::copy(&mut decoder, &mut writer)
            .map_err(|err| GenomeError::Decompress(format!("{path}: {err}")))?;
        io::Write::flush(&mut writer).map_err(|err| GenomeError::Filesystem(err.to_string()))?;
    }
    persist(temp, &target)?;
    fs::remove_file(path.as_std_path()).map_err(|err| GenomeError::Filesystem(err.to_string()))?;
    Ok(target)
}

pub fn open_maybe_gz(path: &Utf8Path) -> Result<Box<dyn Read>, GenomeError> {
    let file = BufReader::new(open(path)?);
    if path.extension() == Some("gz") {
        Ok(Box::new(MultiGzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

fn open(path: &Utf8Path) -> Result<File, GenomeError> {
    File::open(path.as_std_path())
        .map_err(|err| GenomeError::Filesystem(format!("open {path}: {err}")))
}
