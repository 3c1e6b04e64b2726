use crate::{
    cli::Args,
    config::Settings,
    constants::defaults,
    error::Result,
};
use indexmap::IndexMap;
use std::path::PathBuf;

/// Settings of a single run, resolved from flags, environment variables, the
/// settings file and the built-in defaults, in that order of precedence.
#[derive(Debug, PartialEq)]
pub struct RunContext {
    dockerfile_template: PathBuf,
    fragment_dirs: Vec<PathBuf>,
    overrides: IndexMap<String, String>,
    variants_definition: PathBuf,
    variants_config: Option<PathBuf>,
    output_dir: PathBuf,
    output_format: String,
    debug: bool,
}

impl RunContext {
    /// Resolves the run settings, loading the settings file named by
    /// `--config` if any.
    pub fn resolve(args: &Args) -> Result<Self> {
        let settings = match &args.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        Ok(Self::from_parts(args, settings))
    }

    pub fn from_parts(args: &Args, settings: Settings) -> Self {
        let Settings { dockerfile, variants, out } = settings;

        let fragment_dirs = if args.dockerfile_tpldir.is_empty() {
            dockerfile.tpldir
        } else {
            args.dockerfile_tpldir.clone()
        };

        let mut overrides = dockerfile.var;
        overrides.extend(args.dockerfile_var.iter().cloned());

        Self {
            dockerfile_template: args
                .dockerfile_tpl
                .clone()
                .or(dockerfile.tpl)
                .unwrap_or_else(|| defaults::DOCKERFILE_TEMPLATE.into()),
            fragment_dirs,
            overrides,
            variants_definition: args
                .variants_def
                .clone()
                .or(variants.def)
                .unwrap_or_else(|| defaults::VARIANTS_DEFINITION.into()),
            variants_config: args
                .variants_cfg
                .clone()
                .or(variants.cfg)
                .filter(|path| !path.as_os_str().is_empty()),
            output_dir: args
                .out_dir
                .clone()
                .or(out.dir)
                .unwrap_or_else(|| defaults::OUTPUT_DIR.into()),
            output_format: args
                .out_fmt
                .clone()
                .or(out.fmt)
                .unwrap_or_else(|| defaults::OUTPUT_FORMAT.into()),
            debug: args.debug,
        }
    }

    pub fn dockerfile_template(&self) -> &PathBuf {
        &self.dockerfile_template
    }

    pub fn fragment_dirs(&self) -> &[PathBuf] {
        &self.fragment_dirs
    }

    pub fn overrides(&self) -> &IndexMap<String, String> {
        &self.overrides
    }

    pub fn variants_definition(&self) -> &PathBuf {
        &self.variants_definition
    }

    pub fn variants_config(&self) -> Option<&PathBuf> {
        self.variants_config.as_ref()
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub fn output_format(&self) -> &str {
        &self.output_format
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DockerfileSettings, OutputSettings, VariantsSettings};

    #[test]
    fn falls_back_to_defaults() {
        let context = RunContext::from_parts(&Args::default(), Settings::default());
        assert_eq!(context.dockerfile_template(), &PathBuf::from("Dockerfile.tpl"));
        assert_eq!(context.variants_definition(), &PathBuf::from("variants.yml"));
        assert_eq!(context.variants_config(), None);
        assert_eq!(context.output_dir(), &PathBuf::from("dockerfiles"));
        assert_eq!(context.output_format(), "Dockerfile.{{ image.name }}.{{ image.tag }}");
        assert!(context.fragment_dirs().is_empty());
        assert!(context.overrides().is_empty());
    }

    #[test]
    fn flags_win_over_the_settings_file() {
        let args = Args {
            out_dir: Some("from-flag".into()),
            dockerfile_var: vec![("shared".into(), "flag".into())],
            ..Args::default()
        };
        let settings = Settings {
            dockerfile: DockerfileSettings {
                tpl: Some("from-file.tpl".into()),
                tpldir: vec!["templates".into()],
                var: [("shared".to_string(), "file".to_string()), ("only".to_string(), "file".to_string())]
                    .into_iter()
                    .collect(),
            },
            variants: VariantsSettings { def: None, cfg: Some("cfg.yml".into()) },
            out: OutputSettings { dir: Some("from-file".into()), fmt: None },
        };

        let context = RunContext::from_parts(&args, settings);
        assert_eq!(context.output_dir(), &PathBuf::from("from-flag"));
        assert_eq!(context.dockerfile_template(), &PathBuf::from("from-file.tpl"));
        assert_eq!(context.fragment_dirs(), &[PathBuf::from("templates")]);
        assert_eq!(context.variants_config(), Some(&PathBuf::from("cfg.yml")));
        assert_eq!(context.overrides().get("shared").map(String::as_str), Some("flag"));
        assert_eq!(context.overrides().get("only").map(String::as_str), Some("file"));
    }

    #[test]
    fn empty_config_path_disables_templated_variants() {
        let args = Args { variants_cfg: Some(PathBuf::new()), ..Args::default() };
        let context = RunContext::from_parts(&args, Settings::default());
        assert_eq!(context.variants_config(), None);
    }
}
