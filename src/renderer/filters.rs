use log::warn;
use minijinja::value::Rest;
use minijinja::{Environment, Error, ErrorKind, Value};
use regex::Regex;

// Re-export all the case conversion functions
pub use cruet::case::{
    camel::to_camel_case, kebab::to_kebab_case, pascal::to_pascal_case,
    screaming_snake::to_screaming_snake_case, snake::to_snake_case, train::to_train_case,
};

/// Registers the function library on `env`.
///
/// Data conversion helpers follow helm's naming and are available both as
/// functions (`toYaml(x)`) and filters (`x | toYaml`).
pub fn register_filters(env: &mut Environment<'_>) {
    env.add_filter("camel_case", to_camel_case);
    env.add_filter("kebab_case", to_kebab_case);
    env.add_filter("pascal_case", to_pascal_case);
    env.add_filter("screaming_snake_case", to_screaming_snake_case);
    env.add_filter("snake_case", to_snake_case);
    env.add_filter("train_case", to_train_case);
    env.add_filter("regex", regex_filter);

    env.add_filter("quote", quote);
    env.add_filter("squote", squote);
    env.add_filter("nindent", nindent);
    env.add_function("quote", quote);
    env.add_function("squote", squote);
    env.add_function("nindent", nindent);
    env.add_function("required", required);

    env.add_filter("toYaml", to_yaml);
    env.add_filter("fromYaml", from_yaml);
    env.add_filter("fromYamlArray", from_yaml_array);
    env.add_filter("toJson", to_json);
    env.add_filter("fromJson", from_json);
    env.add_filter("fromJsonArray", from_json_array);
    env.add_filter("toToml", to_toml);
    env.add_function("toYaml", to_yaml);
    env.add_function("fromYaml", from_yaml);
    env.add_function("fromYamlArray", from_yaml_array);
    env.add_function("toJson", to_json);
    env.add_function("fromJson", from_json);
    env.add_function("fromJsonArray", from_json_array);
    env.add_function("toToml", to_toml);

    env.add_function("mergeOverwriteAppendSlice", merge_overwrite_append_slice);
    env.add_function("mustMergeOverwriteAppendSlice", must_merge_overwrite_append_slice);
}

/// Custom regex filter for template processing.
///
/// Tests if a string matches a given regular expression pattern.
///
/// # Returns
/// * `bool` - True if the string matches the pattern, false otherwise
pub fn regex_filter(val: &str, re: &str) -> bool {
    match Regex::new(re) {
        Ok(re) => re.is_match(val),
        Err(err) => {
            warn!("Invalid regex '{re}': {err}");
            false
        }
    }
}

/// Serializes `value` as YAML without the trailing newline. Errors are
/// swallowed into an empty string.
pub fn to_yaml(value: Value) -> String {
    serde_yaml::to_string(&value)
        .map(|yaml| yaml.trim_end_matches('\n').to_string())
        .unwrap_or_default()
}

/// Parses a YAML mapping. A parse error is reported under the `Error` key.
pub fn from_yaml(source: &str) -> Value {
    if source.trim().is_empty() {
        return Value::from_serialize(serde_yaml::Mapping::new());
    }
    match serde_yaml::from_str::<serde_yaml::Mapping>(source) {
        Ok(mapping) => Value::from_serialize(&mapping),
        Err(err) => error_mapping(err.to_string()),
    }
}

/// Parses a YAML sequence. A parse error becomes the only element.
pub fn from_yaml_array(source: &str) -> Value {
    match serde_yaml::from_str::<Vec<serde_yaml::Value>>(source) {
        Ok(items) => Value::from_serialize(&items),
        Err(err) => Value::from(vec![Value::from(err.to_string())]),
    }
}

/// Serializes `value` as compact JSON, or an empty string on error.
pub fn to_json(value: Value) -> String {
    serde_json::to_string(&value).unwrap_or_default()
}

/// Parses a JSON object. A parse error is reported under the `Error` key.
pub fn from_json(source: &str) -> Value {
    match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(source) {
        Ok(object) => Value::from_serialize(&object),
        Err(err) => error_mapping(err.to_string()),
    }
}

/// Parses a JSON array. A parse error becomes the only element.
pub fn from_json_array(source: &str) -> Value {
    match serde_json::from_str::<Vec<serde_json::Value>>(source) {
        Ok(items) => Value::from_serialize(&items),
        Err(err) => Value::from(vec![Value::from(err.to_string())]),
    }
}

/// Serializes `value` as TOML; on error the error message is returned.
pub fn to_toml(value: Value) -> String {
    toml::to_string(&value).unwrap_or_else(|err| err.to_string())
}

/// Deep merges `sources` into `target`: mappings are merged key by key,
/// sequences are appended and non-empty scalars overwrite. Returns an
/// empty string when any argument is not a mapping.
pub fn merge_overwrite_append_slice(target: Value, sources: Rest<Value>) -> Value {
    must_merge_overwrite_append_slice(target, sources).unwrap_or_else(|_| Value::from(""))
}

/// Like [`merge_overwrite_append_slice`] but fails on invalid arguments.
pub fn must_merge_overwrite_append_slice(
    target: Value,
    sources: Rest<Value>,
) -> Result<Value, Error> {
    let mut merged = as_json_object(&target)?;
    for source in sources.iter() {
        merge_json(&mut merged, as_json_object(source)?);
    }
    Ok(Value::from_serialize(&merged))
}

/// Fails with `message` when `value` is undefined, none or an empty string.
pub fn required(message: &str, value: Value) -> Result<Value, Error> {
    let missing = value.is_undefined()
        || value.is_none()
        || value.as_str().is_some_and(str::is_empty);
    if missing {
        Err(Error::new(ErrorKind::InvalidOperation, message.to_string()))
    } else {
        Ok(value)
    }
}

/// Wraps the value in double quotes, escaping as needed.
pub fn quote(value: Value) -> String {
    format!("{:?}", stringify(&value))
}

/// Wraps the value in single quotes.
pub fn squote(value: Value) -> String {
    format!("'{}'", stringify(&value))
}

/// Indents every line by `width` spaces and prepends a newline.
pub fn nindent(value: Value, width: usize) -> String {
    let pad = " ".repeat(width);
    let indented = stringify(&value).replace('\n', &format!("\n{pad}"));
    format!("\n{pad}{indented}")
}

fn stringify(value: &Value) -> String {
    if value.is_undefined() || value.is_none() {
        String::new()
    } else {
        value.to_string()
    }
}

fn error_mapping(message: String) -> Value {
    let mut mapping = serde_yaml::Mapping::new();
    mapping.insert("Error".into(), message.into());
    Value::from_serialize(&mapping)
}

fn as_json_object(value: &Value) -> Result<serde_json::Value, Error> {
    let json = serde_json::to_value(value).map_err(|err| {
        Error::new(ErrorKind::InvalidOperation, "cannot convert value for merging").with_source(err)
    })?;
    if json.is_object() {
        Ok(json)
    } else {
        Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("cannot merge {}, only mappings can be merged", value.kind()),
        ))
    }
}

fn merge_json(target: &mut serde_json::Value, source: serde_json::Value) {
    match (target, source) {
        (serde_json::Value::Object(target), serde_json::Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (serde_json::Value::Array(target), serde_json::Value::Array(source)) => {
            target.extend(source);
        }
        (target, source) => {
            if !is_empty_json(&source) {
                *target = source;
            }
        }
    }
}

fn is_empty_json(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Array(a) => a.is_empty(),
        serde_json::Value::Object(o) => o.is_empty(),
    }
}
