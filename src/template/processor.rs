use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::Result;
use crate::ext::PathExt;
use crate::ioutils::{create_dir_all, write_file};
use crate::renderer::TemplateRenderer;
use crate::variants::{apply_overrides, Variant};

use super::operation::TemplateOperation;

pub struct DockerfileProcessor<'a> {
    /// Dependencies
    engine: &'a dyn TemplateRenderer,
    file_name_format: &'a dyn TemplateRenderer,

    /// Other
    output_root: PathBuf,
    overrides: &'a IndexMap<String, String>,
    debug: bool,
}

impl<'a> DockerfileProcessor<'a> {
    pub fn new<P: AsRef<Path>>(
        engine: &'a dyn TemplateRenderer,
        file_name_format: &'a dyn TemplateRenderer,
        output_root: P,
        overrides: &'a IndexMap<String, String>,
    ) -> Self {
        Self {
            engine,
            file_name_format,
            output_root: output_root.as_ref().to_path_buf(),
            overrides,
            debug: false,
        }
    }

    /// Logs the adjusted data of every variant when overrides are applied.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Renders every variant in order and writes its Dockerfile.
    ///
    /// Stops at the first failure; files written for earlier variants stay
    /// on disk.
    ///
    /// # Returns
    /// * `Result<Vec<PathBuf>>` - The written files, in variant order
    pub fn render_all(&self, variants: &mut [Variant]) -> Result<Vec<PathBuf>> {
        self.handle_operation(&self.prepare_output_dir())?;

        let mut written = Vec::with_capacity(variants.len());
        for variant in variants.iter_mut() {
            let operation = self.process(variant)?;
            self.handle_operation(&operation)?;
            written.push(operation.target_path().clone());
        }
        Ok(written)
    }

    /// The operation creating the output directory.
    pub fn prepare_output_dir(&self) -> TemplateOperation {
        TemplateOperation::CreateDirectory {
            target: self.output_root.clone(),
            target_exists: self.output_root.is_dir(),
        }
    }

    /// Prepares the data of `variant` and renders its Dockerfile.
    ///
    /// Injects the `image` and `name` keys, applies the overrides, resolves
    /// the output file name and executes the main template.
    ///
    /// # Returns
    /// * `Result<TemplateOperation>` - The write to perform
    pub fn process(&self, variant: &mut Variant) -> Result<TemplateOperation> {
        variant.inject_image();
        apply_overrides(variant, self.overrides);

        if self.debug && !self.overrides.is_empty() {
            log::debug!("Adjusted variant:\n\n{}", variant.to_yaml(true));
        }

        let context = variant.context();
        let file_name = self.file_name_format.execute(&context)?;
        let target = self
            .output_root
            .join(String::from_utf8_lossy(&file_name).as_ref())
            .absolutize()?;

        let content = self.engine.execute(&context)?;
        let target_exists = target.exists();
        Ok(TemplateOperation::Write { target, content, target_exists })
    }

    fn handle_operation(&self, operation: &TemplateOperation) -> Result<()> {
        log::debug!("Handling file operation: {}", operation.target_path().display());
        match operation {
            TemplateOperation::Write { target, content, .. } => write_file(content, target)?,
            TemplateOperation::CreateDirectory { target, target_exists } => {
                if *target_exists {
                    log::debug!("{}", operation.get_message());
                    return Ok(());
                }
                create_dir_all(target)?;
            }
        }
        log::info!("{}", operation.get_message());
        Ok(())
    }
}
