//! Expansion of command-line paths into the list of files to check
//!
//! Files named directly are always checked unless excluded. Directories are
//! walked with gitignore support and only files with a configured extension
//! are picked up.

use crate::types::GlobPattern;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during file walking
#[derive(Debug, Error)]
pub enum FileWalkerError {
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },

    #[error("No such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Reason why a file was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Path matched an `excluded_files` pattern
    ExcludedByPattern,
    /// File extension is not one of `file_extensions`
    UnknownExtension,
}

/// Result of file walking - either a file to check or a skipped file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkResult {
    File(PathBuf),
    Skipped { path: PathBuf, reason: SkipReason },
}

/// Expands paths into stylesheet files
#[derive(Debug, Clone)]
pub struct FileWalker {
    extensions: Vec<String>,
    exclude_set: GlobSet,
}

impl FileWalker {
    /// Creates a new FileWalker
    ///
    /// # Arguments
    /// * `extensions` - Extensions picked up inside directories, with the dot
    /// * `exclude` - Patterns of files never checked
    pub fn new(extensions: &[String], exclude: &[GlobPattern]) -> Result<Self, FileWalkerError> {
        // Always exclude .git directory, merging with user-provided excludes
        let mut exclude_patterns = Vec::from(exclude);
        exclude_patterns.push(GlobPattern::new("**/.git/**"));

        Ok(Self {
            extensions: extensions.iter().map(|ext| ext.to_ascii_lowercase()).collect(),
            exclude_set: Self::build_globset(&exclude_patterns)?,
        })
    }

    /// Builds a GlobSet from patterns
    fn build_globset(patterns: &[GlobPattern]) -> Result<GlobSet, FileWalkerError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern.as_str()).map_err(|e| FileWalkerError::InvalidGlob {
                pattern: pattern.as_str().to_string(),
                source: e,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| FileWalkerError::InvalidGlob {
            pattern: "<globset>".to_string(),
            source: e,
        })
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(".").unwrap_or(path);
        self.exclude_set.is_match(relative)
    }

    fn has_extension(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        let name = name.to_ascii_lowercase();
        self.extensions
            .iter()
            .any(|ext| name.len() > ext.len() && name.ends_with(ext.as_str()))
    }

    /// Expands `paths` into the files to check, in a stable order
    ///
    /// Paths keep their command-line order; files found inside a directory
    /// are sorted by path.
    ///
    /// # Errors
    ///
    /// Returns `FileWalkerError::NotFound` for a path that does not exist.
    pub fn expand(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>, FileWalkerError> {
        let mut files = Vec::new();
        for result in self.expand_with_skip_info(paths)? {
            match result {
                WalkResult::File(path) => files.push(path),
                WalkResult::Skipped { path, reason } => {
                    tracing::debug!(path = %path.display(), ?reason, "skipped");
                }
            }
        }
        Ok(files)
    }

    /// Like [`expand`](Self::expand), also reporting skipped files
    pub fn expand_with_skip_info(&self, paths: &[PathBuf]) -> Result<Vec<WalkResult>, FileWalkerError> {
        let mut results = Vec::new();

        for path in paths {
            if path.is_file() {
                results.push(self.classify(path.clone(), false));
            } else if path.is_dir() {
                let mut found = self.walk_dir(path)?;
                found.sort_by(|a, b| result_path(a).cmp(result_path(b)));
                results.extend(found);
            } else {
                return Err(FileWalkerError::NotFound(path.clone()));
            }
        }

        Ok(results)
    }

    fn walk_dir(&self, root: &Path) -> Result<Vec<WalkResult>, FileWalkerError> {
        let walker = WalkBuilder::new(root)
            .hidden(false) // Don't skip hidden files by default
            .git_ignore(true) // Respect .gitignore
            .build();

        let mut results = Vec::new();
        for entry in walker {
            let entry = entry?;
            // Only process files (not directories)
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            results.push(self.classify(entry.into_path(), true));
        }
        Ok(results)
    }

    fn classify(&self, path: PathBuf, check_extension: bool) -> WalkResult {
        if self.is_excluded(&path) {
            return WalkResult::Skipped {
                path,
                reason: SkipReason::ExcludedByPattern,
            };
        }
        if check_extension && !self.has_extension(&path) {
            return WalkResult::Skipped {
                path,
                reason: SkipReason::UnknownExtension,
            };
        }
        WalkResult::File(path)
    }
}

fn result_path(result: &WalkResult) -> &Path {
    match result {
        WalkResult::File(path) => path,
        WalkResult::Skipped { path, .. } => path,
    }
}
