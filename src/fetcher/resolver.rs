//! Output root resolution

use super::{FetcherError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Selected catalog root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoot {
    pub path: PathBuf,
    /// True when no candidate existed and the fallback was created
    pub is_fallback: bool,
}

/// Picks the catalog root from an ordered list of candidates
#[derive(Debug, Clone)]
pub struct RootResolver {
    candidates: Vec<PathBuf>,
    fallback: PathBuf,
}

impl RootResolver {
    pub fn new(candidates: Vec<PathBuf>, fallback: impl Into<PathBuf>) -> Self {
        Self {
            candidates,
            fallback: fallback.into(),
        }
    }

    /// First existing candidate, if any
    pub fn find_existing(&self) -> Option<&Path> {
        self.candidates
            .iter()
            .map(PathBuf::as_path)
            .find(|path| path.exists())
    }

    /// Resolve the root, creating the fallback when no candidate exists.
    ///
    /// Only fails if the fallback directory cannot be created.
    pub fn resolve(&self) -> Result<ResolvedRoot> {
        if let Some(path) = self.find_existing() {
            info!("Found asset catalog: {}", path.display());
            return Ok(ResolvedRoot {
                path: path.to_path_buf(),
                is_fallback: false,
            });
        }

        let cwd = std::env::current_dir()
            .map(|cwd| cwd.display().to_string())
            .unwrap_or_else(|e| format!("<unavailable: {e}>"));
        warn!(
            "No asset catalog found among {} candidates (working directory: {})",
            self.candidates.len(),
            cwd
        );
        info!("Creating fallback catalog: {}", self.fallback.display());

        fs::create_dir_all(&self.fallback).map_err(|e| FetcherError::at(&self.fallback, e))?;

        Ok(ResolvedRoot {
            path: self.fallback.clone(),
            is_fallback: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_existing_candidate_wins() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        let second = tmp.path().join("second");
        let third = tmp.path().join("third");
        fs::create_dir_all(&second).unwrap();
        fs::create_dir_all(&third).unwrap();

        let resolver = RootResolver::new(
            vec![missing, second.clone(), third],
            tmp.path().join("fallback"),
        );
        let root = resolver.resolve().unwrap();

        assert_eq!(root.path, second);
        assert!(!root.is_fallback);
        assert!(!tmp.path().join("fallback").exists());
    }

    #[test]
    fn test_fallback_created_when_nothing_exists() {
        let tmp = TempDir::new().unwrap();
        let fallback = tmp.path().join("deep").join("Assets.xcassets");

        let resolver = RootResolver::new(vec![tmp.path().join("nope")], fallback.clone());
        let root = resolver.resolve().unwrap();

        assert_eq!(root.path, fallback);
        assert!(root.is_fallback);
        assert!(fallback.is_dir());
    }

    #[test]
    fn test_empty_candidate_list_uses_fallback() {
        let tmp = TempDir::new().unwrap();
        let fallback = tmp.path().join("fallback");

        let root = RootResolver::new(Vec::new(), fallback.clone())
            .resolve()
            .unwrap();

        assert_eq!(root.path, fallback);
        assert!(root.is_fallback);
    }

    #[test]
    fn test_fallback_that_exists_is_reused() {
        let tmp = TempDir::new().unwrap();
        let fallback = tmp.path().join("fallback");
        fs::create_dir_all(&fallback).unwrap();
        fs::write(fallback.join("keep.txt"), b"x").unwrap();

        let root = RootResolver::new(Vec::new(), fallback.clone())
            .resolve()
            .unwrap();

        assert!(root.is_fallback);
        assert!(fallback.join("keep.txt").exists());
    }
}
