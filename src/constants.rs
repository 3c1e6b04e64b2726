//! Constants used throughout the templater

/// Maximum simultaneous nesting depth of a single sub-template name.
pub const RECURSION_LIMIT: usize = 1000;

/// What the engine prints for an unresolved value.
pub const NO_VALUE_PLACEHOLDER: &str = "<no value>";

/// Fragment files loaded from template directories.
pub const FRAGMENT_GLOB: &str = "*.tpl";

/// Template name used for the output file name format.
pub const OUTPUT_FILE_TEMPLATE: &str = "OutputFile";

/// Layout every variant has to follow, printed when validation fails.
pub const REQUIRED_STRUCTURE: &str = "Required Structure:

variants:

   - name: <VARIANT_NAME>
     image:
       name: <IMAGE_NAME>
       tag: <IMAGE_TAG>
";

/// Default values of the CLI flags
pub mod defaults {
    pub const DOCKERFILE_TEMPLATE: &str = "Dockerfile.tpl";
    pub const VARIANTS_DEFINITION: &str = "variants.yml";
    pub const OUTPUT_DIR: &str = "dockerfiles";
    pub const OUTPUT_FORMAT: &str = "Dockerfile.{{ image.name }}.{{ image.tag }}";
}

/// Exit codes
pub mod exit_codes {
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const DEBUG: u8 = 1;
    pub const TRACE: u8 = 2;
}
