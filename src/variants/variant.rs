use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};

/// The `image` attribute of a variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    pub name: Option<String>,
    pub tag: Option<String>,
}

/// One unit of output generation.
///
/// `name` and `image` are lifted out of the decoded mapping; every other key
/// stays in `data` and is handed to the main template as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variant {
    pub name: Option<String>,
    pub image: Option<Image>,
    pub data: Mapping,
}

impl<'de> Deserialize<'de> for Variant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut data = Mapping::deserialize(deserializer)?;

        let name = match data.shift_remove("name") {
            Some(value) => scalar_to_string(value, "name").map_err(D::Error::custom)?,
            None => None,
        };
        let image = match data.shift_remove("image") {
            Some(value) => image_from_value(value).map_err(D::Error::custom)?,
            None => None,
        };

        Ok(Self { name, image, data })
    }
}

impl Variant {
    /// First required attribute this variant lacks, checked in the order
    /// `image`, `image.name`, `image.tag`.
    pub fn missing_field(&self) -> Option<&'static str> {
        match &self.image {
            None => Some("image"),
            Some(Image { name: None, .. }) => Some("image.name"),
            Some(Image { tag: None, .. }) => Some("image.tag"),
            Some(_) => None,
        }
    }

    /// Name used to identify the variant in log messages.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Writes the normalized `image` mapping and the `name` into the data
    /// bag, replacing keys of the same name.
    pub fn inject_image(&mut self) {
        if let Some(Image { name: Some(name), tag: Some(tag) }) = &self.image {
            let mut image = Mapping::new();
            image.insert("name".into(), name.as_str().into());
            image.insert("tag".into(), tag.as_str().into());
            self.data.insert("image".into(), Value::Mapping(image));
        }
        if let Some(name) = &self.name {
            self.data.insert("name".into(), name.as_str().into());
        }
    }

    /// The render context of this variant.
    pub fn context(&self) -> Value {
        Value::Mapping(self.data.clone())
    }

    /// Serializes the variant as YAML for debugging. With `data_only` only the
    /// data bag is written, otherwise `name` and `image` lead.
    pub fn to_yaml(&self, data_only: bool) -> String {
        let mut out = Mapping::new();
        if !data_only {
            if let Some(name) = &self.name {
                out.insert("name".into(), name.as_str().into());
            }
            if let Some(image) = &self.image {
                let mut mapping = Mapping::new();
                if let Some(name) = &image.name {
                    mapping.insert("name".into(), name.as_str().into());
                }
                if let Some(tag) = &image.tag {
                    mapping.insert("tag".into(), tag.as_str().into());
                }
                out.insert("image".into(), Value::Mapping(mapping));
            }
        }
        for (key, value) in &self.data {
            out.insert(key.clone(), value.clone());
        }

        serde_yaml::to_string(&out).unwrap_or_else(|err| {
            log::warn!("Could not marshal variant '{}' for debugging: {err}", self.label());
            String::new()
        })
    }
}

fn image_from_value(value: Value) -> Result<Option<Image>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Mapping(mut mapping) => {
            let name = match mapping.shift_remove("name") {
                Some(value) => scalar_to_string(value, "image.name")?,
                None => None,
            };
            let tag = match mapping.shift_remove("tag") {
                Some(value) => scalar_to_string(value, "image.tag")?,
                None => None,
            };
            Ok(Some(Image { name, tag }))
        }
        Value::Tagged(tagged) => image_from_value(tagged.value),
        _ => Err("attribute 'image' must be a mapping".to_string()),
    }
}

/// Accepts strings, numbers and booleans; `null` counts as absent.
fn scalar_to_string(value: Value, field: &str) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Tagged(tagged) => scalar_to_string(tagged.value, field),
        Value::Sequence(_) | Value::Mapping(_) => {
            Err(format!("attribute '{field}' must be a scalar value"))
        }
    }
}
