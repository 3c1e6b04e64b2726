use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Extension trait for Path to resolve and name template sources
pub trait PathExt {
    /// Makes the path absolute against the current working directory
    /// without touching the file system.
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - The absolute path
    /// * `Err(Error::PathResolution)` - If the current directory is unavailable
    ///
    /// # Examples
    /// ```
    /// use templater::ext::PathExt;
    /// use std::path::Path;
    ///
    /// assert!(Path::new("Dockerfile.tpl").absolutize().unwrap().is_absolute());
    /// ```
    fn absolutize(&self) -> Result<PathBuf>;

    /// Returns the last component of the path as UTF-8, which is the name
    /// templates loaded from this path are registered under.
    ///
    /// # Examples
    /// ```
    /// use templater::ext::PathExt;
    /// use std::path::Path;
    ///
    /// let path = Path::new("templates/base.tpl");
    /// assert_eq!(path.base_name().unwrap(), "base.tpl");
    /// ```
    fn base_name(&self) -> Result<&str>;
}

impl PathExt for Path {
    fn absolutize(&self) -> Result<PathBuf> {
        std::path::absolute(self).map_err(|source| Error::PathResolution {
            path: self.display().to_string(),
            source,
        })
    }

    fn base_name(&self) -> Result<&str> {
        self.file_name().and_then(|name| name.to_str()).ok_or_else(|| {
            Error::PathResolution {
                path: self.display().to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "path has no valid UTF-8 file name",
                ),
            }
        })
    }
}
