//! JSON codec for a single static value type

use std::any::type_name;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{FdictError, Result};

use super::{ensure_finite, unreadable, Envelope, EnvelopeRef, ValueCodec};

/// Codec for any `T: Serialize + DeserializeOwned`
///
/// The tag defaults to `std::any::type_name::<T>()`. That name is not
/// guaranteed stable across compiler versions, so files meant to outlive
/// the binary should pin a tag with [`JsonCodec::with_tag`].
pub struct JsonCodec<T> {
    tag: Cow<'static, str>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
    /// Codec tagged with the Rust type name of `T`
    pub fn new() -> Self {
        Self::with_tag(type_name::<T>())
    }

    /// Codec with an explicit, stable tag
    pub fn with_tag(tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tag: tag.into(),
            _marker: PhantomData,
        }
    }

    /// The tag written into every record
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonCodec<T> {
    fn clone(&self) -> Self {
        Self::with_tag(self.tag.clone())
    }
}

impl<T> fmt::Debug for JsonCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonCodec").field("tag", &self.tag).finish()
    }
}

impl<T> ValueCodec<T> for JsonCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Result<String> {
        ensure_finite(value)?;
        let envelope = EnvelopeRef {
            type_tag: &self.tag,
            value,
        };
        let text = serde_json::to_string(&envelope)?;

        self.decode(&text).map_err(unreadable)?;
        Ok(text)
    }

    fn decode(&self, text: &str) -> Result<T> {
        let envelope = Envelope::parse(text)?;
        if envelope.type_tag != self.tag {
            return Err(FdictError::TypeMismatch {
                expected: self.tag.to_string(),
                found: envelope.type_tag,
            });
        }
        Ok(serde_json::from_str(envelope.value.get())?)
    }
}
