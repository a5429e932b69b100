//! # Configuration
//!
//! [`JsonStoreOptions`] is a passive value object supplied by the hosting
//! application. The host decides where records live and how they are
//! rendered; the store only consumes the decision.
//!
//! Serialization policy for the records themselves (field naming, null
//! handling, enum representation) belongs on the record type via serde
//! attributes, not here. The only serializer choice the store owns is
//! pretty vs compact output.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Host-supplied options for a [`JsonStore`](crate::JsonStore).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct JsonStoreOptions {
    /// Directory holding the backing files. An absolute path is used as-is;
    /// a relative path is joined to the host's content root at store
    /// construction.
    pub file_store_path: PathBuf,

    /// Pretty-print the backing file instead of writing compact JSON.
    pub pretty: bool,
}

impl Default for JsonStoreOptions {
    fn default() -> Self {
        Self {
            file_store_path: PathBuf::from("."),
            pretty: false,
        }
    }
}

impl JsonStoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_store_path = path.into();
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Resolve the storage directory against the host's content root.
    pub fn resolve_root(&self, content_root: &Path) -> PathBuf {
        if self.file_store_path.is_absolute() {
            self.file_store_path.clone()
        } else {
            content_root.join(&self.file_store_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = JsonStoreOptions::default();
        assert_eq!(options.file_store_path, PathBuf::from("."));
        assert!(!options.pretty);
    }

    #[test]
    fn test_relative_path_joins_content_root() {
        let options = JsonStoreOptions::new().with_file_store_path("stores/app");
        assert_eq!(
            options.resolve_root(Path::new("/srv/content")),
            PathBuf::from("/srv/content/stores/app")
        );
    }

    #[test]
    fn test_absolute_path_wins_over_content_root() {
        let options = JsonStoreOptions::new().with_file_store_path("/var/lib/app");
        assert_eq!(
            options.resolve_root(Path::new("/srv/content")),
            PathBuf::from("/var/lib/app")
        );
    }
}
