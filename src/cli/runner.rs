use crate::{
    cli::{context::RunContext, Args},
    constants::OUTPUT_FILE_TEMPLATE,
    error::Result,
    renderer::Template,
    template::DockerfileProcessor,
    variants::VariantSet,
};
use std::path::PathBuf;

/// Main CLI runner that orchestrates the Dockerfile generation workflow
pub struct Runner {
    context: RunContext,
}

impl Runner {
    pub fn new(context: RunContext) -> Self {
        Self { context }
    }

    /// Loads the variants, compiles the templates and writes one Dockerfile
    /// per variant.
    ///
    /// # Returns
    /// * `Result<Vec<PathBuf>>` - The written files, in variant order
    pub fn run(self) -> Result<Vec<PathBuf>> {
        let context = &self.context;

        let mut variants = VariantSet::load_with_fragments(
            context.variants_definition(),
            context.variants_config(),
            context.fragment_dirs(),
        )?;
        if context.debug() {
            variants.dump();
        }

        let engine = Template::compile(context.dockerfile_template(), context.fragment_dirs())?;
        let file_name_format = Template::compile_str(OUTPUT_FILE_TEMPLATE, context.output_format())?;

        let processor = DockerfileProcessor::new(
            &engine,
            &file_name_format,
            context.output_dir(),
            context.overrides(),
        )
        .with_debug(context.debug());

        processor.render_all(&mut variants.variants)
    }
}

/// Main entry point for CLI execution
pub fn run(args: Args) -> Result<()> {
    let context = RunContext::resolve(&args)?;
    let written = Runner::new(context).run()?;
    log::debug!("Generated {} Dockerfile(s)", written.len());
    Ok(())
}
