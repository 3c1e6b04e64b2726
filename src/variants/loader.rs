use std::path::{Path, PathBuf};

use log::{debug, error, trace};
use serde::Deserialize;
use serde_yaml::Value;

use super::variant::Variant;
use crate::constants::REQUIRED_STRUCTURE;
use crate::error::{Error, Result};
use crate::ioutils::{parse_yaml, read_file};
use crate::renderer::{Template, TemplateRenderer};

#[derive(Debug, Default, Deserialize)]
struct VariantsDocument {
    #[serde(default)]
    variants: Option<Vec<Variant>>,
}

/// The variants of one run together with the files they were loaded from.
#[derive(Debug)]
pub struct VariantSet {
    pub variants: Vec<Variant>,
    pub definition_file: PathBuf,
    pub config_file: Option<PathBuf>,
}

impl VariantSet {
    /// Loads and verifies the variants of `definition_file`.
    ///
    /// Without a `config_file` the definition is plain YAML. With one, the
    /// definition is compiled as a template and rendered against the config
    /// before it is decoded.
    pub fn load<P: AsRef<Path>>(definition_file: P, config_file: Option<P>) -> Result<Self> {
        Self::load_with_fragments(definition_file, config_file, &[])
    }

    /// Like [`VariantSet::load`], making the fragments of `fragment_dirs`
    /// available to a templated definition.
    pub fn load_with_fragments<P: AsRef<Path>>(
        definition_file: P,
        config_file: Option<P>,
        fragment_dirs: &[PathBuf],
    ) -> Result<Self> {
        let definition_file = definition_file.as_ref().to_path_buf();
        let config_file = config_file
            .map(|path| path.as_ref().to_path_buf())
            .filter(|path| !path.as_os_str().is_empty());

        let variants = match &config_file {
            None => load_plain(&definition_file)?,
            Some(config_file) => load_templated(&definition_file, config_file, fragment_dirs)?,
        };

        let set = Self { variants, definition_file, config_file };
        set.verify()?;
        Ok(set)
    }

    /// Fails when the set is empty or a variant lacks a required attribute.
    ///
    /// Every missing attribute of every variant is logged; the returned error
    /// names the first one.
    pub fn verify(&self) -> Result<()> {
        if self.variants.is_empty() {
            return Err(Error::EmptyVariantSet {
                path: self.definition_file.display().to_string(),
            });
        }

        let mut first = None;
        for (index, variant) in self.variants.iter().enumerate() {
            if let Some(field) = variant.missing_field() {
                let err = Error::MissingRequiredField {
                    index: index + 1,
                    variant: variant.name.clone(),
                    field,
                };
                error!("{err}\n{REQUIRED_STRUCTURE}");
                first.get_or_insert(err);
            }
        }

        first.map_or(Ok(()), Err)
    }

    /// Logs every variant as YAML.
    pub fn dump(&self) {
        let yaml: String =
            self.variants.iter().map(|variant| variant.to_yaml(false) + "\n").collect();
        debug!("Building Dockerfiles for variants:\n\n{yaml}");
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

fn load_plain(definition_file: &Path) -> Result<Vec<Variant>> {
    debug!("Loading variants from '{}'", definition_file.display());
    let content = read_file(definition_file)?;
    decode_variants(&content, &definition_file.display().to_string())
}

fn load_templated(
    definition_file: &Path,
    config_file: &Path,
    fragment_dirs: &[PathBuf],
) -> Result<Vec<Variant>> {
    debug!("Loading variant config from '{}'", config_file.display());
    debug!("Variants ('{}') will be treated as template", definition_file.display());

    let config: Value =
        parse_yaml(&read_file(config_file)?, &config_file.display().to_string())?;
    let config = match config {
        Value::Null => Value::Mapping(Default::default()),
        config => config,
    };

    let template = Template::compile(definition_file, fragment_dirs)?;
    let rendered = template.execute(&config)?;
    trace!("Rendered variants definition:\n{}", String::from_utf8_lossy(&rendered));

    decode_variants(&rendered, &definition_file.display().to_string())
}

/// Decodes a variants document. An empty document has no variants.
fn decode_variants(content: &[u8], origin: &str) -> Result<Vec<Variant>> {
    let value: Value = parse_yaml(content, origin)?;
    if value.is_null() {
        return Ok(Vec::new());
    }
    let document: VariantsDocument = serde_yaml::from_value(value)
        .map_err(|source| Error::StructuredDataDecode { origin: origin.to_string(), source })?;
    Ok(document.variants.unwrap_or_default())
}
