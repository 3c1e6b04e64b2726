//! Named sub-template definitions.
//!
//! A template source may declare any number of top-level blocks
//!
//! ```text
//! {% define "name" %}...{% enddefine %}
//! ```
//!
//! Each block becomes its own template inside the environment, callable with
//! `include("name", data)` or `{% include "name" %}`. The blocks are cut out
//! of the source before it is handed to minijinja, which has no notion of
//! `define`.

use minijinja::{Environment, Error, ErrorKind};
use regex::Regex;
use std::sync::LazyLock;

static DEFINE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\{%(?P<trim_left>-?)\s*(?:define\s+(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')|(?P<end>enddefine))\s*(?P<trim_right>-?)%\}"#,
    )
    .expect("define tag pattern is valid")
});

/// A template source with its definitions separated out.
#[derive(Debug, Default, PartialEq)]
pub struct SplitSource {
    /// Everything outside of `define` blocks.
    pub body: String,
    /// `(name, source)` of every definition, in source order.
    pub definitions: Vec<(String, String)>,
}

/// Separates the `define` blocks of `source` from its body.
///
/// Trim markers (`{%-`, `-%}`) on the tags strip the adjacent whitespace
/// like any other block tag.
pub fn split_definitions(template_name: &str, source: &str) -> Result<SplitSource, Error> {
    let mut split = SplitSource::default();
    let mut cursor = 0;
    let mut trim_next = false;
    let mut open: Option<String> = None;

    for caps in DEFINE_TAG.captures_iter(source) {
        let Some(tag) = caps.get(0) else { continue };
        let mut chunk = &source[cursor..tag.start()];
        if trim_next {
            chunk = chunk.trim_start();
        }
        if !caps["trim_left"].is_empty() {
            chunk = chunk.trim_end();
        }

        let is_end = caps.name("end").is_some();
        match (open.take(), is_end) {
            (None, false) => {
                split.body.push_str(chunk);
                let name = caps.name("dq").or_else(|| caps.name("sq")).map_or("", |m| m.as_str());
                if name.is_empty() {
                    return Err(syntax_error(template_name, "define requires a non-empty name"));
                }
                open = Some(name.to_string());
            }
            (Some(name), true) => split.definitions.push((name, chunk.to_string())),
            (Some(name), false) => {
                return Err(syntax_error(
                    template_name,
                    &format!("unexpected define inside of define \"{name}\""),
                ));
            }
            (None, true) => {
                return Err(syntax_error(template_name, "unexpected enddefine"));
            }
        }

        cursor = tag.end();
        trim_next = !caps["trim_right"].is_empty();
    }

    if let Some(name) = open {
        return Err(syntax_error(
            template_name,
            &format!("unexpected end of template, missing enddefine for \"{name}\""),
        ));
    }

    let rest = &source[cursor..];
    split.body.push_str(if trim_next { rest.trim_start() } else { rest });
    Ok(split)
}

/// Adds `source` to `env` under `name`, registering its definitions as
/// templates of their own first.
pub fn register_source(env: &mut Environment<'_>, name: &str, source: &str) -> Result<(), Error> {
    let SplitSource { body, definitions } = split_definitions(name, source)?;
    for (definition, definition_source) in definitions {
        log::trace!("Registering definition '{definition}' from '{name}'");
        env.add_template_owned(definition, definition_source)?;
    }
    env.add_template_owned(name.to_string(), body)
}

fn syntax_error(template_name: &str, detail: &str) -> Error {
    Error::new(ErrorKind::SyntaxError, format!("{detail} (in {template_name})"))
}
