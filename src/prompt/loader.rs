//! Fragment Loader - Resolve fragment references to text
//!
//! A reference is either `builtin:<path>` (embedded in the binary) or a
//! filesystem path, relative paths being resolved against a base directory.

use std::path::{Path, PathBuf};

use super::builtin::{BUILTIN_PREFIX, builtin_fragment};
use crate::error::{Result, RoodaError};

/// Loads fragment text relative to one base directory
#[derive(Debug, Clone)]
pub struct FragmentLoader {
    base_dir: PathBuf,
}

impl FragmentLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Load the text behind `reference`.
    ///
    /// # Errors
    /// * `EmptyFragmentReference` for `""`
    /// * `BuiltinFragmentNotFound` for an unknown `builtin:` reference
    /// * `FragmentFileNotFound` with the resolved absolute path otherwise
    pub fn load(&self, reference: &str) -> Result<String> {
        if reference.is_empty() {
            return Err(RoodaError::EmptyFragmentReference);
        }

        if reference.starts_with(BUILTIN_PREFIX) {
            return builtin_fragment(reference)
                .map(str::to_string)
                .ok_or_else(|| RoodaError::BuiltinFragmentNotFound(reference.to_string()));
        }

        let resolved = self.resolve(reference);
        if !resolved.is_file() {
            return Err(RoodaError::FragmentFileNotFound {
                reference: reference.to_string(),
                resolved,
            });
        }
        log::debug!("Loading fragment {}", resolved.display());
        Ok(std::fs::read_to_string(&resolved)?)
    }

    /// Absolute path a filesystem reference resolves to.
    pub fn resolve(&self, reference: &str) -> PathBuf {
        let joined = self.base_dir.join(reference);
        std::path::absolute(&joined).unwrap_or(joined)
    }
}

/// Load one fragment reference against `base_dir`.
pub fn load_fragment(reference: &str, base_dir: &Path) -> Result<String> {
    FragmentLoader::new(base_dir).load(reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_builtin() {
        let content = load_fragment("builtin:fragments/act/emit_success.md", Path::new(".")).unwrap();
        assert!(content.contains("<promise>SUCCESS</promise>"));
    }

    #[test]
    fn test_load_builtin_not_found() {
        let err = load_fragment("builtin:fragments/nope.md", Path::new(".")).unwrap_err();
        assert!(matches!(err, RoodaError::BuiltinFragmentNotFound(_)));
        assert_eq!(err.to_string(), "built-in fragment not found: builtin:fragments/nope.md");
    }

    #[test]
    fn test_load_relative_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("prompts")).unwrap();
        fs::write(temp_dir.path().join("prompts/custom.md"), "# Custom\nDo the thing.").unwrap();

        let loader = FragmentLoader::new(temp_dir.path());
        assert_eq!(loader.load("prompts/custom.md").unwrap(), "# Custom\nDo the thing.");
    }

    #[test]
    fn test_load_absolute_file_ignores_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("abs.md");
        fs::write(&path, "absolute").unwrap();

        let content = load_fragment(&path.to_string_lossy(), Path::new("/somewhere/else")).unwrap();
        assert_eq!(content, "absolute");
    }

    #[test]
    fn test_missing_file_reports_resolved_path() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_fragment("missing.md", temp_dir.path()).unwrap_err();
        match err {
            RoodaError::FragmentFileNotFound { reference, resolved } => {
                assert_eq!(reference, "missing.md");
                assert!(resolved.is_absolute());
                assert!(resolved.ends_with("missing.md"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_directory_is_not_a_fragment() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("dir.md")).unwrap();
        let err = load_fragment("dir.md", temp_dir.path()).unwrap_err();
        assert!(matches!(err, RoodaError::FragmentFileNotFound { .. }));
    }

    #[test]
    fn test_empty_reference() {
        let err = load_fragment("", Path::new(".")).unwrap_err();
        assert!(matches!(err, RoodaError::EmptyFragmentReference));
    }
}
