//! Error types for `ResTree`
//!
//! Tree construction itself never fails: invalid characters, missing
//! collections and ambiguous paths are recorded as data. Errors only come
//! from the edges, loading world dumps and configuration files.

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `ResTree` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ==================== World Dump Errors ====================
    /// Two characters in a world dump share the same object index.
    #[error("duplicate object index {index} in world dump")]
    DuplicateObjectIndex {
        /// The repeated object index.
        index: u16,
    },

    /// A character is assigned to a collection the dump does not define.
    #[error("character {index} is assigned to unknown collection '{collection}'")]
    UnknownCollection {
        /// Object index of the character.
        index: u16,
        /// The collection name that could not be found.
        collection: String,
    },

    /// The default collection named by the dump does not exist.
    #[error("default collection '{0}' is not defined")]
    UnknownDefaultCollection(String),

    /// A resource graph references a character that is not in the object table.
    #[error("resources recorded for unknown object index {index}")]
    ResourcesForUnknownCharacter {
        /// The object index the resources were recorded for.
        index: u16,
    },

    /// A resource graph has two records with the same raw resource key.
    #[error("duplicate resource key {key} for object index {index}")]
    DuplicateResourceKey {
        /// Object index of the owning character.
        index: u16,
        /// The repeated key, rendered as text.
        key: String,
    },

    // ==================== Configuration Errors ====================
    /// The platform configuration directory could not be determined.
    #[error("could not determine configuration directory")]
    ConfigDirNotFound,

    /// The configured mod directory is not a directory.
    #[error("mod directory is not a directory: {path}")]
    ModDirectoryInvalid {
        /// The configured path.
        path: PathBuf,
    },
}

/// A specialized Result type for `ResTree` operations.
pub type Result<T> = std::result::Result<T, Error>;
