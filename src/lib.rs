//! # fdict
//!
//! A disk-backed dictionary: a string key maps to a value of any
//! serializable type, the value bytes live in an append-only file and only
//! a key → offset index is kept in memory.
//!
//! - Insert-if-absent: the first value stored under a key stays
//! - Lookup by key, or by raw record offset
//! - Private temporary backing file, or a caller-named one
//! - Type-preserving records through an explicit codec
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     FileDictionary<T, C>                     │
//! │         (try_add / try_get_value / get_value / close)        │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │                              │
//!                ▼                              ▼
//!   ┌─────────────────────────┐    ┌──────────────────────────┐
//!   │        KeyIndex          │    │      ValueCodec<T>       │
//!   │   (key → offset, RAM)    │    │ (JsonCodec/RegistryCodec)│
//!   └─────────────────────────┘    └────────────┬─────────────┘
//!                                               │ text
//!                                               ▼
//!                                  ┌──────────────────────────┐
//!                                  │        RecordLog          │
//!                                  │ ([varint len][text] ...)  │
//!                                  └──────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use fdict::FileDictionary;
//!
//! # fn main() -> fdict::Result<()> {
//! let mut dict: FileDictionary<i32> = FileDictionary::temporary()?;
//! assert!(dict.try_add("a", &42)?);
//! assert!(!dict.try_add("a", &99)?);
//! assert_eq!(dict.try_get_value("a")?, Some(42));
//! dict.close();
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod index;
pub mod storage;
pub mod dictionary;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use codec::{JsonCodec, RegistryCodec, TypeTagged, ValueCodec};
pub use config::{Backing, Config, OpenMode, SharePolicy};
pub use dictionary::FileDictionary;
pub use error::{FdictError, Result};

#[doc(hidden)]
pub use serde_json as __serde_json;

/// Byte position of a record in the backing file
pub type Offset = u64;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of fdict
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
