pub mod args;
pub mod context;
pub mod runner;

pub use args::{get_args, get_log_level_from_verbose, parse_key_value, Args};
pub use context::RunContext;
pub use runner::{run, Runner};
