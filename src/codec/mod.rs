//! Codec Module
//!
//! Turns values into the self-describing text stored in each record.
//!
//! ## Envelope Format
//! ```text
//! {"$type": "<type tag>", "$value": <JSON payload>}
//! ```
//! The tag names the concrete type that was written. Decoders check it
//! before touching the payload, so a record can only ever come back as a
//! type its codec knows about; nothing is resolved dynamically by name.
//!
//! The payload is decoded straight from its JSON text, so integers outside
//! the `i64`/`u64` range and floats come back exactly. NaN and infinity have
//! no JSON form; encoding refuses them, and every encode is decoded once
//! before it is handed out so a record that could not be read back is
//! never written.
//!
//! ## Codecs
//! - [`JsonCodec`]: one static type per dictionary. Use a serde enum to
//!   store a closed set of variants; the variant survives the round trip.
//! - [`RegistryCodec`]: boxed trait objects whose concrete types are
//!   registered up front under explicit tags.

mod finite;
mod json;
mod registry;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{FdictError, Result};

pub use finite::ensure_finite;
pub use json::JsonCodec;
pub use registry::{RegistryCodec, TypeTagged};

/// Serialize / deserialize capability used by a dictionary
pub trait ValueCodec<T> {
    /// Encode a value as envelope text
    fn encode(&self, value: &T) -> Result<String>;

    /// Decode envelope text produced by `encode`
    fn decode(&self, text: &str) -> Result<T>;
}

/// Borrowing envelope, used on the write path
#[derive(Serialize)]
pub(crate) struct EnvelopeRef<'a, V: ?Sized> {
    #[serde(rename = "$type")]
    pub type_tag: &'a str,
    #[serde(rename = "$value")]
    pub value: &'a V,
}

/// Owned envelope with an undecoded payload, used on the read path
#[derive(Deserialize)]
pub(crate) struct Envelope {
    #[serde(rename = "$type")]
    pub type_tag: String,
    #[serde(rename = "$value")]
    pub value: Box<RawValue>,
}

impl Envelope {
    pub(crate) fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Reject an encoding whose decode failed
pub(crate) fn unreadable(e: FdictError) -> FdictError {
    FdictError::Serialization(format!("value would not decode back: {}", e))
}

/// Read only the type tag of a record, without decoding the payload
pub fn peek_type_tag(text: &str) -> Result<String> {
    Ok(Envelope::parse(text)?.type_tag)
}
