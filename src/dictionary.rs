//! Dictionary Module
//!
//! The associative store that ties the key index to the record log.
//!
//! ## Responsibilities
//! - Own the backing file from construction to close
//! - Insert-if-absent: append the encoded value, then index its offset
//! - Lookup by key, or by raw offset bypassing the index
//! - Delete a temporary backing file on close

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::vec;

use tempfile::TempPath;

use crate::codec::{JsonCodec, ValueCodec};
use crate::config::{Backing, Config, OpenMode, SharePolicy};
use crate::error::{FdictError, Result};
use crate::index::KeyIndex;
use crate::storage::{backing, RecordLog};
use crate::Offset;

/// Disk-backed dictionary: keys and offsets in memory, values on disk
///
/// ## Concurrency Model
/// None. Every operation takes `&mut self` or `&self` and runs to
/// completion on the calling thread. Share an instance across threads only
/// behind a caller-provided lock.
///
/// ## Lifecycle
/// The file handle is acquired by the constructor and released once by
/// [`close`](Self::close) or drop, whichever comes first. Closing never
/// fails; problems while releasing the file are logged and dropped.
pub struct FileDictionary<T, C = JsonCodec<T>> {
    /// Open file state (`None` once closed)
    state: Option<OpenState>,

    /// Key → offset of the first record written under that key
    index: KeyIndex,

    /// Value encoder/decoder
    codec: C,

    /// Backing file path (kept after close for diagnostics)
    path: PathBuf,

    /// Whether the backing file is deleted on close
    temporary: bool,

    _marker: PhantomData<fn() -> T>,
}

/// Everything released on close
struct OpenState {
    log: RecordLog,
    temp_path: Option<TempPath>,
    share: SharePolicy,
}

impl<T> FileDictionary<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    /// Dictionary over a private temporary file, deleted on close
    pub fn temporary() -> Result<Self> {
        Self::open_with(Config::default(), JsonCodec::new())
    }

    /// Dictionary over a caller-named file, left on disk on close
    pub fn open(path: impl AsRef<Path>, mode: OpenMode, share: SharePolicy) -> Result<Self> {
        let config = Config::named(path.as_ref(), mode, share);
        Self::open_with(config, JsonCodec::new())
    }
}

impl<T, C: ValueCodec<T>> FileDictionary<T, C> {
    /// Dictionary over a private temporary file using a custom codec
    pub fn temporary_with_codec(codec: C) -> Result<Self> {
        Self::open_with(Config::default(), codec)
    }

    /// Open a dictionary as described by `config`
    pub fn open_with(config: Config, codec: C) -> Result<Self> {
        config.validate()?;

        let (state, path) = match config.backing {
            Backing::Temporary { dir, prefix } => {
                let (file, temp_path) = backing::create_temporary(dir.as_deref(), &prefix)?;
                let path = temp_path.to_path_buf();
                let state = OpenState {
                    log: RecordLog::new(file, &path),
                    temp_path: Some(temp_path),
                    share: SharePolicy::ReadWrite,
                };
                (state, path)
            }
            Backing::Named { path, mode, share } => {
                let file = backing::open_named(&path, mode, share)?;
                let state = OpenState {
                    log: RecordLog::new(file, &path),
                    temp_path: None,
                    share,
                };
                (state, path)
            }
        };

        let temporary = state.temp_path.is_some();
        tracing::debug!(
            "Opened dictionary at {} (temporary: {})",
            path.display(),
            temporary
        );

        Ok(Self {
            state: Some(state),
            index: KeyIndex::new(),
            codec,
            path,
            temporary,
            _marker: PhantomData,
        })
    }

    /// Add a value under `key` if the key is absent
    ///
    /// Returns `false` and writes nothing when the key is already present:
    /// the first value stored under a key is the one that stays.
    pub fn try_add(&mut self, key: &str, value: &T) -> Result<bool> {
        let state = self.state.as_mut().ok_or(FdictError::Closed)?;

        if self.index.contains(key) {
            return Ok(false);
        }

        let text = self.codec.encode(value)?;
        let offset = state.log.append(text.as_bytes())?;
        self.index.insert(key, offset);

        tracing::trace!(key, offset, "added value");
        Ok(true)
    }

    /// Get the value stored under `key`
    ///
    /// `Ok(None)` when the key was never added.
    pub fn try_get_value(&mut self, key: &str) -> Result<Option<T>> {
        if self.state.is_none() {
            return Err(FdictError::Closed);
        }

        match self.index.get(key) {
            Some(offset) => self.get_value(offset).map(Some),
            None => Ok(None),
        }
    }

    /// Decode the record at an arbitrary offset, bypassing the index
    ///
    /// Combine with [`indexes`](Self::indexes) to walk every stored value.
    pub fn get_value(&mut self, offset: Offset) -> Result<T> {
        let state = self.state.as_mut().ok_or(FdictError::Closed)?;
        let text = state.log.read_text_at(offset)?;

        self.codec.decode(&text).map_err(|e| match e {
            FdictError::Serialization(reason) => FdictError::CorruptRecord { offset, reason },
            other => other,
        })
    }

    /// Iterate over `(offset, value)` for every key, in insertion order
    pub fn values(&mut self) -> Values<'_, T, C> {
        let offsets = self.index.offsets().into_iter();
        Values {
            dictionary: self,
            offsets,
        }
    }
}

impl<T, C> FileDictionary<T, C> {
    /// Check whether `key` has been added
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains(key)
    }

    /// Snapshot of all keys
    pub fn keys(&self) -> std::collections::HashSet<String> {
        self.index.keys()
    }

    /// Snapshot of all record offsets reachable from the index, ascending
    pub fn indexes(&self) -> Vec<Offset> {
        self.index.offsets()
    }

    /// Number of keys added
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if the backing file is deleted on close
    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_none()
    }

    /// Borrow the codec
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Release the backing file
    ///
    /// Temporary files are deleted. Safe to call any number of times; only
    /// the first call does anything. Never fails: errors while unlocking or
    /// deleting are logged at `warn` and discarded. Keys and offsets stay
    /// queryable afterwards, value reads return [`FdictError::Closed`].
    pub fn close(&mut self) {
        let Some(OpenState {
            log,
            temp_path,
            share,
        }) = self.state.take()
        else {
            return;
        };

        let file = log.into_file();
        backing::release_lock(&file, share);
        drop(file);

        if let Some(temp_path) = temp_path {
            match temp_path.close() {
                Ok(()) => tracing::debug!("Deleted temporary file {}", self.path.display()),
                Err(e) => tracing::warn!(
                    "Ignoring error while deleting {}: {}",
                    self.path.display(),
                    e
                ),
            }
        }

        tracing::debug!("Closed dictionary at {}", self.path.display());
    }
}

impl<T, C> Drop for FileDictionary<T, C> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T, C> fmt::Debug for FileDictionary<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileDictionary")
            .field("path", &self.path)
            .field("len", &self.index.len())
            .field("temporary", &self.temporary)
            .field("closed", &self.state.is_none())
            .finish()
    }
}

/// Iterator returned by [`FileDictionary::values`]
pub struct Values<'a, T, C> {
    dictionary: &'a mut FileDictionary<T, C>,
    offsets: vec::IntoIter<Offset>,
}

impl<T, C: ValueCodec<T>> Iterator for Values<'_, T, C> {
    type Item = (Offset, Result<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.offsets.next()?;
        Some((offset, self.dictionary.get_value(offset)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.offsets.size_hint()
    }
}
