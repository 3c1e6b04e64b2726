use std::path::PathBuf;

/// A filesystem change produced while rendering variants.
#[derive(Debug)]
pub enum TemplateOperation {
    Write { target: PathBuf, content: Vec<u8>, target_exists: bool },
    CreateDirectory { target: PathBuf, target_exists: bool },
}

impl TemplateOperation {
    /// Returns the target path for this operation, used for error context.
    pub fn target_path(&self) -> &PathBuf {
        match self {
            TemplateOperation::Write { target, .. } => target,
            TemplateOperation::CreateDirectory { target, .. } => target,
        }
    }

    /// Gets a message describing the operation and its status.
    ///
    /// # Returns
    /// * `String` - A descriptive message about the operation
    pub fn get_message(&self) -> String {
        match self {
            TemplateOperation::CreateDirectory { target, target_exists } => {
                if *target_exists {
                    format!("Skipping directory creation '{}' (already exists)", target.display())
                } else {
                    format!("Creating directory '{}'", target.display())
                }
            }

            TemplateOperation::Write { target, target_exists, .. } => {
                if *target_exists {
                    format!("Writing to '{}' (overwriting existing file)", target.display())
                } else {
                    format!("Writing to '{}'", target.display())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_directory_skips_when_exists() {
        let target = PathBuf::from("/tmp/dockerfiles");
        let expected =
            format!("Skipping directory creation '{}' (already exists)", target.display());
        let op = TemplateOperation::CreateDirectory { target, target_exists: true };
        assert_eq!(op.get_message(), expected);
    }

    #[test]
    fn create_directory_message_when_missing() {
        let target = PathBuf::from("/tmp/dockerfiles");
        let expected = format!("Creating directory '{}'", target.display());
        let op = TemplateOperation::CreateDirectory { target, target_exists: false };
        assert_eq!(op.get_message(), expected);
    }

    #[test]
    fn write_operation_overwrite_message() {
        let target = PathBuf::from("/tmp/dockerfiles/Dockerfile.app.v1");
        let expected =
            format!("Writing to '{}' (overwriting existing file)", target.display());
        let op = TemplateOperation::Write { target, content: Vec::new(), target_exists: true };
        assert_eq!(op.get_message(), expected);
    }

    #[test]
    fn write_operation_basic_message() {
        let target = PathBuf::from("/tmp/dockerfiles/Dockerfile.app.v1");
        let expected = format!("Writing to '{}'", target.display());
        let op = TemplateOperation::Write {
            target: target.clone(),
            content: b"FROM scratch".to_vec(),
            target_exists: false,
        };
        assert_eq!(op.get_message(), expected);
        assert_eq!(op.target_path(), &target);
    }
}
