//! Index Module
//!
//! In-memory mapping from key to record offset.
//!
//! ## Responsibilities
//! - Track which keys have been inserted and where their record starts
//! - First insert wins: an existing key is never re-pointed
//! - Hand out snapshot copies of keys and offsets
//!
//! ## Data Structure Choice
//! A plain `HashMap<String, Offset>`: insertion order is irrelevant and
//! offsets already encode it. No interior locking; the owner serializes access.

mod key_index;

pub use key_index::KeyIndex;
