use indexmap::IndexMap;
use log::{debug, warn};
use serde_yaml::{Mapping, Value};

use super::variant::Variant;

/// Applies `key=value` overrides to the data bag of `variant`, in order.
///
/// A key may be scoped to a single variant with a `<variant name>:` prefix,
/// the rest is a dot separated path into the data bag. A key with more than
/// one `:` is not scoped; the part after the last `:` is its path. Intermediate
/// mappings are created as needed; an override whose path runs into a
/// scalar is dropped with a warning.
pub fn apply_overrides(variant: &mut Variant, overrides: &IndexMap<String, String>) {
    'overrides: for (key, value) in overrides {
        let parts: Vec<&str> = key.split(':').collect();
        let path = match parts.as_slice() {
            [scope, path] => {
                if variant.name.as_deref() != Some(*scope) {
                    debug!(
                        "Skip adding value '{key}' to variant '{}' as names do not match",
                        variant.label()
                    );
                    continue;
                }
                *path
            }
            // Only a single `:` scopes a key; otherwise the last part is the path.
            parts => parts.last().copied().unwrap_or(key.as_str()),
        };

        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else { continue };

        let mut current: &mut Mapping = &mut variant.data;
        for segment in parents {
            let entry = current
                .entry(Value::from(*segment))
                .or_insert(Value::Mapping(Mapping::new()));
            match entry {
                Value::Mapping(mapping) => current = mapping,
                _ => {
                    warn!(
                        "Please check the path of the additional variable '{key}'. \
                         The key path '{path}' is invalid for variant '{}'",
                        variant.name.as_deref().unwrap_or("<unnamed>")
                    );
                    continue 'overrides;
                }
            }
        }

        let previous = current.insert(Value::from(*last), Value::from(value.as_str()));
        if let Some(previous) = previous {
            warn!("Overriding variant value '{}' of '{path}' with '{value}'", display(&previous));
        }
        debug!("Adding variable '{path}' with value '{value}'");
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|yaml| yaml.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(yaml: &str) -> Variant {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn overrides(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn sets_top_level_and_nested_values() {
        let mut v = variant("name: slim\nbuild: {args: {a: 1}}\n");
        apply_overrides(&mut v, &overrides(&[("version", "3"), ("build.args.b", "2")]));

        assert_eq!(v.data.get("version"), Some(&Value::from("3")));
        let args = v.data["build"]["args"].as_mapping().unwrap();
        assert_eq!(args.get("a").and_then(Value::as_i64), Some(1));
        assert_eq!(args.get("b"), Some(&Value::from("2")));
    }

    #[test]
    fn creates_missing_intermediate_mappings() {
        let mut v = variant("name: slim\n");
        apply_overrides(&mut v, &overrides(&[("labels.team.owner", "ops")]));
        assert_eq!(v.data["labels"]["team"]["owner"], Value::from("ops"));
    }

    #[test]
    fn scoped_keys_only_touch_the_named_variant() {
        let mut slim = variant("name: slim\n");
        let mut full = variant("name: full\n");
        let mut unnamed = variant("base: x\n");
        let scoped = overrides(&[("slim:extra", "yes")]);

        apply_overrides(&mut slim, &scoped);
        apply_overrides(&mut full, &scoped);
        apply_overrides(&mut unnamed, &scoped);

        assert_eq!(slim.data.get("extra"), Some(&Value::from("yes")));
        assert!(full.data.get("extra").is_none());
        assert!(unnamed.data.get("extra").is_none());
    }

    #[test]
    fn scalar_on_the_path_drops_the_override() {
        let mut v = variant("name: slim\nbase: debian\n");
        apply_overrides(&mut v, &overrides(&[("base.version", "12"), ("after", "ok")]));
        assert_eq!(v.data.get("base"), Some(&Value::from("debian")));
        assert_eq!(v.data.get("after"), Some(&Value::from("ok")));
    }

    #[test]
    fn keys_with_several_colons_apply_to_every_variant() {
        let mut slim = variant("name: slim\n");
        let mut full = variant("name: full\n");
        let keys = overrides(&[("slim:build:mode", "fast")]);

        apply_overrides(&mut slim, &keys);
        apply_overrides(&mut full, &keys);

        for v in [&slim, &full] {
            assert_eq!(v.data.get("mode"), Some(&Value::from("fast")));
            assert!(v.data.get("build:mode").is_none());
        }
    }

    #[test]
    fn later_overrides_win() {
        let mut v = variant("name: slim\n");
        apply_overrides(&mut v, &overrides(&[("tag", "a"), ("slim:tag", "b")]));
        assert_eq!(v.data.get("tag"), Some(&Value::from("b")));
    }
}
