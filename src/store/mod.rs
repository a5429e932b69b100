//! # Record store
//!
//! [`JsonStore`] persists a homogeneous collection of records as a single
//! JSON array in one UTF-8 file, keyed by a caller-supplied extraction
//! function.
//!
//! ## Storage model
//!
//! - **Whole-file rewrite**: every mutation loads the full collection,
//!   applies the change in memory, and rewrites the file in full. There is
//!   no in-memory cache between calls; `list` always reflects the file as
//!   it is on disk.
//! - **Atomic replace**: the rewrite goes to a uuid-named temp file in the
//!   same directory and is renamed over the backing file, so readers see
//!   either the old or the new contents, never a truncated file.
//! - **Order**: replacing an existing key keeps the record's position;
//!   inserting a new key appends at the end.
//!
//! ## Concurrency discipline
//!
//! Mutations (`upsert`/`delete` and their suspending variants) hold the
//! store's write lock across the whole load-modify-persist sequence, so
//! concurrent in-process writers never lose updates. Reads take no lock.
//! The lock is shared by every store opened on the same resolved file path
//! (see [`crate::lock`]); writers in *other processes* are not coordinated.
//!
//! ## Storage layout
//!
//! ```text
//! <resolved store dir>/
//! └── <CollectionName>.json    # one serialized array of records
//! ```

use crate::config::JsonStoreOptions;
use crate::error::{Result, StoreError};
use crate::lock::{self, WriteLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

type KeyFn<T, K> = Box<dyn Fn(&T) -> K + Send + Sync>;

/// A file-backed collection of `T` records, uniquely keyed by `K`.
///
/// The key is extracted by a function bound at construction; key uniqueness
/// is enforced by the upsert logic, not by the type system.
pub struct JsonStore<T, K> {
    file_path: PathBuf,
    pretty: bool,
    key_of: KeyFn<T, K>,
    write_lock: WriteLock,
}

/// Last path segment of the type name, generic arguments stripped.
fn collection_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl<T, K> JsonStore<T, K>
where
    T: Serialize + DeserializeOwned,
    K: PartialEq,
{
    /// Open a store whose backing file is named after the record type
    /// (`Widget` records live in `Widget.json`).
    ///
    /// Creates the storage directory and seeds the file with an empty array
    /// if it does not exist yet; an already-populated file is left alone.
    pub fn open<F>(
        content_root: impl AsRef<Path>,
        options: &JsonStoreOptions,
        key_of: F,
    ) -> Result<Self>
    where
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::open_named(collection_name::<T>(), content_root, options, key_of)
    }

    /// Open a store with an explicit collection name (backing file
    /// `<name>.json`). Use this when the file name must stay stable across
    /// renames of the record type.
    pub fn open_named<F>(
        name: &str,
        content_root: impl AsRef<Path>,
        options: &JsonStoreOptions,
        key_of: F,
    ) -> Result<Self>
    where
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        let dir = options.resolve_root(content_root.as_ref());
        fs::create_dir_all(&dir).map_err(|source| StoreError::Init {
            path: dir.clone(),
            source,
        })?;

        let file_path = dir.join(format!("{}.json", name));
        if !file_path.exists() {
            fs::write(&file_path, "[]").map_err(|source| StoreError::Init {
                path: file_path.clone(),
                source,
            })?;
        }

        let write_lock = lock::for_path(&file_path);
        Ok(Self {
            file_path,
            pretty: options.pretty,
            key_of: Box::new(key_of),
            write_lock,
        })
    }

    /// Path of the backing file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Read the full collection from disk.
    ///
    /// Every call re-reads the backing file, so edits made by external
    /// actors are visible on the next call.
    pub fn list(&self) -> Result<Vec<T>> {
        let contents = fs::read_to_string(&self.file_path)?;
        serde_json::from_str(&contents).map_err(StoreError::Corrupt)
    }

    /// Suspending variant of [`list`](Self::list).
    pub async fn list_async(&self) -> Result<Vec<T>> {
        let contents = tokio::fs::read_to_string(&self.file_path).await?;
        serde_json::from_str(&contents).map_err(StoreError::Corrupt)
    }

    /// Find the record with the given key, if any.
    pub fn get(&self, key: &K) -> Result<Option<T>> {
        let items = self.list()?;
        Ok(items.into_iter().find(|item| (self.key_of)(item) == *key))
    }

    /// Suspending variant of [`get`](Self::get).
    pub async fn get_async(&self, key: &K) -> Result<Option<T>> {
        let items = self.list_async().await?;
        Ok(items.into_iter().find(|item| (self.key_of)(item) == *key))
    }

    /// Insert `item`, or replace the existing record with the same key.
    ///
    /// A replaced record keeps its position in the collection; a new record
    /// is appended at the end. After a successful return the collection
    /// contains exactly one record with this key.
    ///
    /// Must not be called from inside an async runtime; use
    /// [`upsert_async`](Self::upsert_async) there.
    pub fn upsert(&self, item: T) -> Result<()> {
        let _guard = self.write_lock.blocking_lock();
        let mut items = self.list()?;
        self.apply_upsert(&mut items, item);
        self.persist(&items)
    }

    /// Suspending variant of [`upsert`](Self::upsert).
    pub async fn upsert_async(&self, item: T) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.list_async().await?;
        self.apply_upsert(&mut items, item);
        self.persist_async(&items).await
    }

    /// Remove the record matching `item`'s key.
    ///
    /// Deleting a key that is not in the collection is a hard error
    /// ([`StoreError::NotFound`]); the backing file is left untouched.
    ///
    /// Must not be called from inside an async runtime; use
    /// [`delete_async`](Self::delete_async) there.
    pub fn delete(&self, item: &T) -> Result<()> {
        let _guard = self.write_lock.blocking_lock();
        let mut items = self.list()?;
        self.apply_delete(&mut items, item)?;
        self.persist(&items)
    }

    /// Suspending variant of [`delete`](Self::delete).
    pub async fn delete_async(&self, item: &T) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.list_async().await?;
        self.apply_delete(&mut items, item)?;
        self.persist_async(&items).await
    }

    fn apply_upsert(&self, items: &mut Vec<T>, item: T) {
        let key = (self.key_of)(&item);
        match items.iter().position(|existing| (self.key_of)(existing) == key) {
            Some(index) => items[index] = item,
            None => items.push(item),
        }
    }

    fn apply_delete(&self, items: &mut Vec<T>, item: &T) -> Result<()> {
        let key = (self.key_of)(item);
        match items.iter().position(|existing| (self.key_of)(existing) == key) {
            Some(index) => {
                items.remove(index);
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn serialize(&self, items: &[T]) -> Result<String> {
        let serialized = if self.pretty {
            serde_json::to_string_pretty(items)
        } else {
            serde_json::to_string(items)
        };
        serialized.map_err(StoreError::Corrupt)
    }

    fn tmp_path(&self) -> PathBuf {
        let dir = self.file_path.parent().unwrap_or_else(|| Path::new("."));
        dir.join(format!(".{}.tmp", Uuid::new_v4()))
    }

    // Atomic write: temp file in the same directory, then rename over the
    // backing file.
    fn persist(&self, items: &[T]) -> Result<()> {
        let serialized = self.serialize(items)?;
        let tmp_path = self.tmp_path();
        if let Err(err) = fs::write(&tmp_path, &serialized) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&tmp_path, &self.file_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }
        Ok(())
    }

    async fn persist_async(&self, items: &[T]) -> Result<()> {
        let serialized = self.serialize(items)?;
        let tmp_path = self.tmp_path();
        if let Err(err) = tokio::fs::write(&tmp_path, &serialized).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(err.into());
        }
        if let Err(err) = tokio::fs::rename(&tmp_path, &self.file_path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(err.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_name_strips_module_path() {
        struct Widget;
        assert_eq!(collection_name::<Widget>(), "Widget");
    }

    #[test]
    fn test_collection_name_strips_generics() {
        assert_eq!(collection_name::<Vec<String>>(), "Vec");
    }
}
