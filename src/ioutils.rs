use std::path::Path;

use crate::error::{Error, Result};

/// Creates `dest_path` and all of its parents. An existing directory is fine.
pub fn create_dir_all<P: AsRef<Path>>(dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    std::fs::create_dir_all(dest_path).map_err(|source| Error::DirectoryCreate {
        path: dest_path.display().to_string(),
        source,
    })
}

/// Writes `content` to `dest_path`, creating missing parent directories.
pub fn write_file<P: AsRef<Path>>(content: &[u8], dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    if let Some(parent) = dest_path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::write(dest_path, content).map_err(|source| Error::FileWrite {
        path: dest_path.display().to_string(),
        source,
    })
}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    log::debug!("Loading content from '{}'", path.display());
    std::fs::read(path)
        .map_err(|source| Error::FileRead { path: path.display().to_string(), source })
}

pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path)
        .map_err(|source| Error::FileRead { path: path.display().to_string(), source })
}

/// Decodes a YAML document into `T`, naming `origin` in the error.
pub fn parse_yaml<T: serde::de::DeserializeOwned>(content: &[u8], origin: &str) -> Result<T> {
    serde_yaml::from_slice(content)
        .map_err(|source| Error::StructuredDataDecode { origin: origin.to_string(), source })
}
