use crate::constants::verbosity;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// CLI arguments for Dockerfile Templater.
///
/// Every option except `--config`, `--verbose` and `--debug` can also be set
/// through a `DTPL_*` environment variable or the settings file.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None, help_template = HELP_TEMPLATE)]
pub struct Args {
    /// Path to the Dockerfile template [default: Dockerfile.tpl]
    #[arg(short = 't', long = "dockerfile.tpl", env = "DTPL_DOCKERFILE_TPL")]
    pub dockerfile_tpl: Option<PathBuf>,

    /// Directory containing includable template definitions (repeatable).
    #[arg(
        short = 'd',
        long = "dockerfile.tpldir",
        env = "DTPL_DOCKERFILE_TPLDIR",
        value_delimiter = ','
    )]
    pub dockerfile_tpldir: Vec<PathBuf>,

    /// Additional variable or variable override, optionally scoped to a
    /// variant with `<variant>:key=value` (repeatable).
    #[arg(
        short = 'a',
        long = "dockerfile.var",
        env = "DTPL_DOCKERFILE_VAR",
        value_delimiter = ',',
        value_name = "KEY=VALUE",
        value_parser = parse_key_value
    )]
    pub dockerfile_var: Vec<(String, String)>,

    /// Path to the variants definition, treated as a template when
    /// `--variants.cfg` is set [default: variants.yml]
    #[arg(short = 'i', long = "variants.def", env = "DTPL_VARIANTS_DEF")]
    pub variants_def: Option<PathBuf>,

    /// Path to the variants configuration yml.
    #[arg(short = 'g', long = "variants.cfg", env = "DTPL_VARIANTS_CFG")]
    pub variants_cfg: Option<PathBuf>,

    /// Directory to write generated Dockerfiles to [default: dockerfiles]
    #[arg(short = 'o', long = "out.dir", env = "DTPL_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Name format for generated Dockerfiles, a template rendered against
    /// each variant [default: Dockerfile.{{ image.name }}.{{ image.tag }}]
    #[arg(short = 'f', long = "out.fmt", env = "DTPL_OUT_FMT")]
    pub out_fmt: Option<String>,

    /// Settings file (yaml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (`-v`, `-vv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output the processed variants as yml.
    #[arg(short = 'y', long)]
    pub debug: bool,
}

/// Parses a `KEY=VALUE` pair. The value may contain further `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid KEY=VALUE: no `=` found in `{raw}`")),
    }
}

/// Parse command line arguments.
pub fn get_args() -> Args {
    Args::parse()
}

/// Map `-v` counts to the appropriate log level. `--debug` raises the level
/// to at least debug.
pub fn get_log_level_from_verbose(verbose_count: u8, debug: bool) -> LevelFilter {
    let level = match verbose_count {
        verbosity::OFF => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    };
    if debug {
        level.max(LevelFilter::Debug)
    } else {
        level
    }
}
