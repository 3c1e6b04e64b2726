//! Settings file loading

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::ext::PathExt;
use crate::ioutils::read_to_string;

/// Settings file mirroring the dotted flag names, e.g. `dockerfile.tpl`
/// becomes
///
/// ```yaml
/// dockerfile:
///   tpl: Dockerfile.tpl
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub dockerfile: DockerfileSettings,
    pub variants: VariantsSettings,
    pub out: OutputSettings,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DockerfileSettings {
    pub tpl: Option<PathBuf>,
    pub tpldir: Vec<PathBuf>,
    pub var: IndexMap<String, String>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct VariantsSettings {
    pub def: Option<PathBuf>,
    pub cfg: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    pub dir: Option<PathBuf>,
    pub fmt: Option<String>,
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().absolutize()?;
        log::debug!("Loading flags from configuration file '{}'", path.display());

        let content = read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .map_err(|source| Error::ConfigParse { path: path.display().to_string(), source })
    }
}
