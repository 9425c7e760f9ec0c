//! Storage Module
//!
//! Append-only record log addressed by byte offset.
//!
//! ## Responsibilities
//! - Append records at end of file and report where each one starts
//! - Read back exactly one record given only its offset
//! - Acquire the backing file (temporary or caller-named)
//!
//! ## File Format
//! No header, no magic number, no trailer. Records sit back to back in
//! insertion order:
//! ```text
//! ┌────────────────────────────────────────┐
//! │ Record 1 (offset 0)                    │
//! │ ┌──────────────┬─────────────────────┐ │
//! │ │ Len (varint) │ UTF-8 text (Len)    │ │
//! │ └──────────────┴─────────────────────┘ │
//! ├────────────────────────────────────────┤
//! │ Record 2 (offset = end of record 1)    │
//! │ ┌──────────────┬─────────────────────┐ │
//! │ │ Len (varint) │ UTF-8 text (Len)    │ │
//! │ └──────────────┴─────────────────────┘ │
//! └────────────────────────────────────────┘
//! ```
//! The text is a codec envelope, see [`crate::codec`].

pub mod backing;
mod record_log;
pub mod varint;

pub use record_log::{RecordLog, RecordScan};
