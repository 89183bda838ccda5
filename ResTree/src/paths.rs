//! Logical game paths and on-disk full paths
//!
//! A [`GamePath`] is the in-game identifier a resource is requested under,
//! independent of any redirection. A [`FullPath`] is where the resource is
//! actually read from; it may be empty, rooted (a real file) or a non-rooted
//! value such as an unredirected game path.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Normalize separators to forward slashes and lowercase, as the game does
fn normalize_game_path(path: &str) -> String {
    path.trim()
        .replace('\\', "/")
        .trim_start_matches('/')
        .to_ascii_lowercase()
}

/// A logical in-game resource path (e.g. `chara/equipment/e0001/model/c0101e0001_top.mdl`)
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct GamePath(String);

impl GamePath {
    /// Create a game path, normalizing separators and case
    pub fn new(path: impl AsRef<str>) -> Self {
        Self(normalize_game_path(path.as_ref()))
    }

    /// The empty game path
    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty path segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Last path segment
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// File name without its extension
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        name.rsplit_once('.').map_or(name, |(stem, _)| stem)
    }

    /// Lowercase extension without the dot, if any
    pub fn extension(&self) -> Option<&str> {
        self.file_name().rsplit_once('.').map(|(_, ext)| ext)
    }
}

impl From<String> for GamePath {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl From<&str> for GamePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<GamePath> for String {
    fn from(path: GamePath) -> Self {
        path.0
    }
}

impl fmt::Display for GamePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved on-disk path, possibly empty
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FullPath(String);

impl FullPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The empty path, used for unresolved or redacted resources
    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Whether this is an absolute or rooted filesystem path
    pub fn is_rooted(&self) -> bool {
        !self.is_empty() && self.as_path().has_root()
    }

    /// Whether the path points at something on disk
    pub fn exists(&self) -> bool {
        !self.is_empty() && self.as_path().exists()
    }
}

impl From<&GamePath> for FullPath {
    fn from(path: &GamePath) -> Self {
        Self(path.as_str().to_string())
    }
}

impl From<PathBuf> for FullPath {
    fn from(path: PathBuf) -> Self {
        Self(path.to_string_lossy().into_owned())
    }
}

impl From<&str> for FullPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl fmt::Display for FullPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve `.` and `..` components without touching the filesystem
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if !matches!(
                    normalized.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Check whether `path` lies inside `root` (or is `root` itself)
///
/// Both sides are made absolute and normalized lexically first, so
/// `root/../elsewhere` is correctly reported as outside.
pub fn is_within(root: &Path, path: &Path) -> bool {
    if root.as_os_str().is_empty() {
        return false;
    }
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalize_lexically(&path).starts_with(normalize_lexically(&root))
}

/// Expand a leading `~` to the home directory
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest)),
        Err(_) => path.to_path_buf(),
    }
}
