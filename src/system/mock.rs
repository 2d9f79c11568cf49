//! Mock system implementation for testing

use super::System;
use std::collections::{HashMap, HashSet};
use std::env::VarError;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// In-memory implementation of System trait for testing
///
/// `MockSystem` provides an in-memory filesystem and environment,
/// perfect for fast, isolated unit tests without side effects.
///
/// Clones share the same underlying state, so a `MockSystem` can be
/// handed to several collaborators and observed from the test.
///
/// # Example
/// ```
/// use fetchtree::system::{MockSystem, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_env("HOME", "/home/user")
///     .with_file("/test/file.txt", b"Hello, world!")
///     .with_dir("/test/subdir");
///
/// assert_eq!(system.env_var("HOME").unwrap(), "/home/user");
/// assert!(system.exists(Path::new("/test/file.txt")));
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    env_vars: HashMap<String, String>,
    current_dir: PathBuf,
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
}

impl MockSystem {
    /// Create a new `MockSystem` with an empty root directory
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                env_vars: HashMap::new(),
                current_dir: PathBuf::from("/"),
                files: HashMap::new(),
                dirs: HashSet::from([PathBuf::from("/")]),
            })),
        }
    }

    /// Set an environment variable (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_env(self, key: &str, value: &str) -> Self {
        self.write_state(|state| {
            state.env_vars.insert(key.to_owned(), value.to_owned());
        });
        self
    }

    /// Set the current working directory (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_current_dir<P: AsRef<Path>>(self, dir: P) -> Self {
        self.write_state(|state| {
            let dir = dir.as_ref().to_path_buf();
            Self::insert_dir_chain(&mut state.dirs, &dir);
            state.current_dir = dir;
        });
        self
    }

    /// Add a directory, creating all parents (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_dir<P: AsRef<Path>>(self, path: P) -> Self {
        self.write_state(|state| {
            Self::insert_dir_chain(&mut state.dirs, path.as_ref());
        });
        self
    }

    /// Add a file with contents, creating parent directories (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> Self {
        self.write_state(|state| {
            let path = path.as_ref().to_path_buf();
            if let Some(parent) = path.parent() {
                Self::insert_dir_chain(&mut state.dirs, parent);
            }
            state.files.insert(path, contents.to_vec());
        });
        self
    }

    fn insert_dir_chain(dirs: &mut HashSet<PathBuf>, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            dirs.insert(current.clone());
        }
    }

    fn write_state<F: FnOnce(&mut MockSystemState)>(&self, f: F) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        f(&mut state);
    }

    fn read_state<T, F: FnOnce(&MockSystemState) -> T>(&self, f: F) -> T {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        f(&state)
    }
}

impl Default for MockSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    fn env_var(&self, key: &str) -> Result<String, VarError> {
        self.read_state(|state| state.env_vars.get(key).cloned().ok_or(VarError::NotPresent))
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.read_state(|state| state.current_dir.clone()))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.read_state(|state| state.files.get(path).cloned());
        let bytes = bytes.ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{}", path.display()))
        })?;
        String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let parent_exists = path
            .parent()
            .is_none_or(|parent| self.read_state(|state| state.dirs.contains(parent)));
        if !parent_exists {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("parent directory missing for {}", path.display()),
            ));
        }
        self.write_state(|state| {
            state.files.insert(path.to_path_buf(), contents.to_vec());
        });
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.write_state(|state| {
            Self::insert_dir_chain(&mut state.dirs, path);
        });
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.read_state(|state| state.files.contains_key(path) || state.dirs.contains(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.read_state(|state| state.files.contains_key(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read_state(|state| state.dirs.contains(path))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        self.read_state(|state| {
            if !state.dirs.contains(path) {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{}", path.display()),
                ));
            }

            let mut entries: Vec<PathBuf> = state
                .files
                .keys()
                .chain(state.dirs.iter())
                .filter(|entry| entry.parent() == Some(path))
                .cloned()
                .collect();
            entries.sort();
            entries.dedup();
            Ok(entries)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_creates_parent_dirs() {
        let system = MockSystem::new().with_file("/a/b/c.txt", b"x");

        assert!(system.is_dir(Path::new("/a")));
        assert!(system.is_dir(Path::new("/a/b")));
        assert!(system.is_file(Path::new("/a/b/c.txt")));
    }

    #[test]
    fn test_read_dir_lists_direct_children_only() {
        let system = MockSystem::new()
            .with_file("/work/a/file.txt", b"x")
            .with_dir("/work/b");

        let entries = system.read_dir(Path::new("/work")).unwrap();
        assert_eq!(
            entries,
            vec![PathBuf::from("/work/a"), PathBuf::from("/work/b")]
        );
    }

    #[test]
    fn test_read_dir_missing_path_errors() {
        let system = MockSystem::new();
        assert!(system.read_dir(Path::new("/nope")).is_err());
    }

    #[test]
    fn test_clones_share_state() {
        let system = MockSystem::new();
        let alias = system.clone();

        alias.create_dir_all(Path::new("/shared")).unwrap();
        assert!(system.is_dir(Path::new("/shared")));
    }

    #[test]
    fn test_write_requires_parent_dir() {
        let system = MockSystem::new();
        assert!(system.write(Path::new("/missing/file.txt"), b"x").is_err());

        let system = system.with_dir("/present");
        assert!(system.write(Path::new("/present/file.txt"), b"x").is_ok());
        assert_eq!(
            system.read_to_string(Path::new("/present/file.txt")).unwrap(),
            "x"
        );
    }
}
