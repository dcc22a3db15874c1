//! Project-root anchoring and glob matching for file paths.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::ModelError;
use crate::normalizer::{clean, normalize_path, path_to_slash, unify_separators};

/// `*` stays within one path segment; `**` is the only recursive marker.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// The project root that relative paths and globs are anchored at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePath {
    root: PathBuf,
}

impl FilePath {
    /// Creates a resolver anchored at `root`.
    ///
    /// A relative root is made absolute against the current directory, so
    /// globs and call-site paths anchored by the same root always agree.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is relative and the current directory
    /// cannot be read.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref();
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };
        Ok(Self {
            root: clean(Path::new(&path_to_slash(&root))),
        })
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a file path against the root.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        normalize_path(&self.root, path)
    }

    /// Resolves a [`Path`] against the root.
    #[must_use]
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        self.resolve(&path.to_string_lossy())
    }
}

/// A path glob anchored at the project root.
///
/// The glob is compiled once at construction and reused for all match calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGlob {
    raw: String,
    compiled: Pattern,
}

impl PathGlob {
    /// Compiles `pattern`, anchoring it at the root of `paths` unless it is
    /// absolute. `.` and `..` are resolved lexically.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is empty or has invalid glob syntax.
    pub fn new(pattern: &str, paths: &FilePath) -> Result<Self, ModelError> {
        if pattern.trim().is_empty() {
            return Err(ModelError::EmptyGlob);
        }
        let unified = unify_separators(pattern);
        let anchored = if Path::new(&unified).is_absolute() {
            PathBuf::from(&unified)
        } else {
            let root = Pattern::escape(&path_to_slash(paths.root()));
            Path::new(&root).join(&unified)
        };
        let anchored = path_to_slash(&clean(&anchored));
        let compiled = Pattern::new(&anchored).map_err(|e| ModelError::InvalidGlob {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            raw: pattern.to_string(),
            compiled,
        })
    }

    /// Tests whether an already resolved absolute path matches.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        self.compiled
            .matches_with(&path_to_slash(path), MATCH_OPTIONS)
    }

    /// Returns the pattern as configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the anchored pattern actually matched against.
    #[must_use]
    pub fn anchored(&self) -> &str {
        self.compiled.as_str()
    }
}

/// Tests a path against a list of globs.
#[must_use]
pub fn any_matches(globs: &[PathGlob], path: &Path) -> bool {
    globs.iter().any(|g| g.matches(path))
}
