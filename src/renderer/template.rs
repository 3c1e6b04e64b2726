use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use log::debug;
use minijinja::value::ValueKind;
use minijinja::{escape_formatter, AutoEscape, Environment, Output, State, Value};
use walkdir::WalkDir;

use super::definitions::register_source;
use super::filters::register_filters;
use super::inclusion::{wire_inclusion_functions, InclusionContext, InclusionGuard};
use super::interface::TemplateRenderer;
use crate::constants::{FRAGMENT_GLOB, NO_VALUE_PLACEHOLDER};
use crate::error::{Error, Result};
use crate::ext::PathExt;
use crate::ioutils::read_to_string;

/// A compiled template: a root body plus every named sub-template of its
/// compilation unit.
pub struct Template {
    /// Name of the root body, the base name of the primary file.
    name: String,
    env: Environment<'static>,
    inclusion: InclusionContext,
}

impl Template {
    /// Compiles `source_file` together with the `*.tpl` fragments of every
    /// directory in `fragment_dirs`.
    ///
    /// Fragments are loaded in the given directory order before the primary
    /// file so its body can rely on the definitions they provide.
    pub fn compile<P: AsRef<Path>>(source_file: P, fragment_dirs: &[PathBuf]) -> Result<Self> {
        let source_file = source_file.as_ref().absolutize()?;
        let mut template = Self::empty(source_file.base_name()?);

        for dir in fragment_dirs {
            template.add_fragment_dir(dir)?;
        }

        debug!("Parsing template '{}'", source_file.display());
        let source = read_to_string(&source_file)?;
        let name = template.name.clone();
        template.add_source(&name, &source, &source_file.display().to_string())?;
        Ok(template)
    }

    /// Compiles an in-memory template source named `name`.
    pub fn compile_str(name: &str, source: &str) -> Result<Self> {
        let mut template = Self::empty(name);
        template.add_source(name, source, name)?;
        Ok(template)
    }

    fn empty(name: &str) -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        env.set_formatter(placeholder_formatter);
        register_filters(&mut env);

        let inclusion = InclusionContext::new(name);
        wire_inclusion_functions(&mut env, &inclusion);

        Self { name: name.to_string(), env, inclusion }
    }

    /// Parses every fragment file of `dir` into this template. A directory
    /// without fragments is not an error.
    pub fn add_fragment_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        debug!("Including templates from '{}'", dir.display());

        let resolved = dir.canonicalize().map_err(|source| Error::PathResolution {
            path: dir.display().to_string(),
            source,
        })?;
        let matcher = fragment_matcher();

        let mut loaded = 0;
        for entry in WalkDir::new(&resolved)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| matcher.is_match(e.file_name()))
        {
            let path = entry.path();
            let name = path.base_name()?;
            debug!("Adding template: {name}");
            let source = read_to_string(path)?;
            self.add_source(name, &source, &path.display().to_string())?;
            loaded += 1;
        }

        if loaded == 0 {
            debug!("No templates matching '{FRAGMENT_GLOB}' in '{}'", dir.display());
        }
        Ok(())
    }

    fn add_source(&mut self, name: &str, source: &str, origin: &str) -> Result<()> {
        register_source(&mut self.env, name, source).map_err(|source| Error::TemplateParse {
            name: origin.to_string(),
            source,
        })
    }

    /// Whether a (sub-)template called `name` is part of this template.
    pub fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// Guard tracking the inclusion depth of this template's sub-templates.
    pub fn inclusion_guard(&self) -> &InclusionGuard {
        self.inclusion.guard()
    }
}

impl TemplateRenderer for Template {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, context: &serde_yaml::Value) -> Result<Vec<u8>> {
        debug!("Rendering template '{}'", self.name);
        self.env
            .get_template(&self.name)
            .and_then(|template| template.render(context))
            .map(String::into_bytes)
            .map_err(|source| Error::TemplateExecution { name: self.name.clone(), source })
    }
}

fn fragment_matcher() -> GlobMatcher {
    Glob::new(FRAGMENT_GLOB)
        .expect("fragment glob is a valid pattern")
        .compile_matcher()
}

/// Prints unresolved values (undefined or none) as a visible placeholder
/// and booleans in lowercase.
fn placeholder_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> std::result::Result<(), minijinja::Error> {
    let literal = if value.is_undefined() || value.is_none() {
        NO_VALUE_PLACEHOLDER
    } else if value.kind() == ValueKind::Bool {
        if value.is_true() { "true" } else { "false" }
    } else {
        return escape_formatter(out, state, value);
    };
    out.write_str(literal).map_err(|_| {
        minijinja::Error::new(minijinja::ErrorKind::WriteFailure, "failed to write output")
    })
}
